use crate::error::{PinbumpError, Result};
use reqwest::blocking::{Client, Response};
use std::time::Duration;
use url::Url;

/// Upper bound on a single API response body.
pub const MAX_RESPONSE_BYTES: usize = 5 * 1024 * 1024;

pub fn build_client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(15))
        .user_agent(concat!("pinbump/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(PinbumpError::from)
}

/// Parse an endpoint base URL, accepting only http and https.
pub fn validate_endpoint(raw: &str) -> Result<Url> {
    let parsed = Url::parse(raw)
        .map_err(|_| PinbumpError::ProjectValidation(format!("Invalid endpoint URL: {raw}")))?;

    match parsed.scheme() {
        "https" | "http" => Ok(parsed),
        scheme => Err(PinbumpError::ProjectValidation(format!(
            "Unsupported endpoint scheme: {scheme}"
        ))),
    }
}

/// Join path segments onto a base URL without dropping the base's own path.
pub fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    {
        let mut path = url.path_segments_mut().map_err(|_| {
            PinbumpError::ProjectValidation(format!("Endpoint cannot be a base URL: {base}"))
        })?;
        path.pop_if_empty();
        path.extend(segments);
    }
    Ok(url)
}

/// Read a successful response body, rejecting non-2xx statuses and oversized bodies.
pub fn read_body(response: Response) -> Result<String> {
    let status = response.status();
    if !status.is_success() {
        return Err(PinbumpError::Resolution(format!(
            "HTTP {} from {}",
            status,
            response.url()
        )));
    }

    let text = response.text()?;
    if text.len() > MAX_RESPONSE_BYTES {
        return Err(PinbumpError::Resolution(
            "response exceeded 5MB limit".to_string(),
        ));
    }
    Ok(text)
}
