use crate::error::{PinbumpError, Result};
use crate::remote::http;
use crate::repository::{RemoteVersionInfo, SourceKind, VersionSource};
use crate::utils::verbose;
use crate::version::VersionString;
use jiff::Timestamp;
use reqwest::blocking::Client;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";
const RELEASES_PER_PAGE: &str = "10";

/// Primary source: the project's release listing on GitHub.
pub struct GitHubReleasesSource {
    client: Client,
    api_base: Url,
    repository: String,
    token: Option<String>,
    label: String,
}

#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    html_url: String,
}

impl GitHubReleasesSource {
    pub fn new(
        client: Client,
        api_base: Url,
        repository: &str,
        token: Option<String>,
    ) -> Result<Self> {
        let repository = repository.trim().trim_matches('/');
        let valid = repository.split('/').count() == 2
            && repository.split('/').all(|part| !part.is_empty());
        if !valid {
            return Err(PinbumpError::ProjectValidation(format!(
                "Release repository must look like 'owner/name', got '{repository}'"
            )));
        }

        Ok(Self {
            client,
            api_base,
            label: format!("GitHub releases ({repository})"),
            repository: repository.to_string(),
            token,
        })
    }

    fn fetch_releases(&self) -> Result<Vec<Release>> {
        let (owner, name) = self
            .repository
            .split_once('/')
            .unwrap_or((self.repository.as_str(), ""));
        let mut url = http::endpoint(&self.api_base, &["repos", owner, name, "releases"])?;
        url.query_pairs_mut().append_pair("per_page", RELEASES_PER_PAGE);

        verbose::log(format!("Fetching: {url}"));

        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let body = http::read_body(request.send()?)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// The listing is newest-first; only the first entry counts.
    fn latest_from(releases: Vec<Release>) -> Result<RemoteVersionInfo> {
        let release = releases
            .into_iter()
            .next()
            .ok_or_else(|| PinbumpError::Resolution("release list is empty".to_string()))?;

        let version = VersionString::from_tag(&release.tag_name).ok_or_else(|| {
            PinbumpError::Resolution(format!(
                "release tag '{}' is not a numeric version",
                release.tag_name
            ))
        })?;

        let published_at = release
            .published_at
            .as_deref()
            .and_then(|raw| raw.parse::<Timestamp>().ok());

        Ok(RemoteVersionInfo {
            version,
            source: SourceKind::Primary,
            notes: release.body.unwrap_or_default(),
            published_at,
            info_url: release.html_url,
        })
    }
}

impl VersionSource for GitHubReleasesSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn resolve(&self) -> Result<RemoteVersionInfo> {
        Self::latest_from(self.fetch_releases()?)
    }
}
