use crate::error::{PinbumpError, Result};
use crate::remote::http;
use crate::repository::{RemoteVersionInfo, SourceKind, VersionSource};
use crate::utils::verbose;
use crate::version::VersionString;
use reqwest::blocking::Client;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_NUGET_INDEX: &str = "https://api.nuget.org/v3-flatcontainer";
const NUGET_GALLERY: &str = "https://www.nuget.org/packages";

/// Fallback source: the NuGet flat-container version index.
pub struct NuGetIndexSource {
    client: Client,
    index_base: Url,
    package: String,
    label: String,
}

#[derive(Debug, Deserialize)]
struct VersionIndex {
    #[serde(default)]
    versions: Vec<String>,
}

impl NuGetIndexSource {
    pub fn new(client: Client, index_base: Url, package: &str) -> Self {
        Self {
            client,
            index_base,
            label: format!("NuGet index ({package})"),
            package: package.to_string(),
        }
    }

    fn fetch_index(&self) -> Result<VersionIndex> {
        let id = self.package.to_lowercase();
        let url = http::endpoint(&self.index_base, &[id.as_str(), "index.json"])?;

        verbose::log(format!("Fetching: {url}"));

        let body = http::read_body(self.client.get(url).send()?)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// The index is ascending; only the last entry counts.
    fn latest_from(package: &str, index: VersionIndex) -> Result<RemoteVersionInfo> {
        let raw = index
            .versions
            .last()
            .ok_or_else(|| PinbumpError::Resolution("version index is empty".to_string()))?;

        let version = VersionString::parse(raw).ok_or_else(|| {
            PinbumpError::Resolution(format!("index entry '{raw}' is not a numeric version"))
        })?;

        Ok(RemoteVersionInfo {
            info_url: format!("{NUGET_GALLERY}/{package}/{version}"),
            version,
            source: SourceKind::Fallback,
            notes: String::new(),
            published_at: None,
        })
    }
}

impl VersionSource for NuGetIndexSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn resolve(&self) -> Result<RemoteVersionInfo> {
        Self::latest_from(&self.package, self.fetch_index()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<RemoteVersionInfo> {
        let index: VersionIndex = serde_json::from_str(json).unwrap();
        NuGetIndexSource::latest_from("CounterStrikeSharp.API", index)
    }

    #[test]
    fn takes_last_entry() {
        let info = parse(r#"{"versions": ["1.0.140", "1.0.149", "1.0.150"]}"#).unwrap();
        assert_eq!(info.version.as_str(), "1.0.150");
        assert_eq!(info.source, SourceKind::Fallback);
        assert!(info.notes.is_empty());
        assert!(info.published_at.is_none());
        assert_eq!(
            info.info_url,
            "https://www.nuget.org/packages/CounterStrikeSharp.API/1.0.150"
        );
    }

    #[test]
    fn empty_index_fails() {
        assert!(matches!(
            parse(r#"{"versions": []}"#),
            Err(PinbumpError::Resolution(_))
        ));
        assert!(parse("{}").is_err());
    }

    #[test]
    fn prerelease_tail_is_malformed() {
        assert!(parse(r#"{"versions": ["1.0.150", "1.0.151-beta"]}"#).is_err());
    }

    #[test]
    #[ignore] // Requires network access
    fn fetches_live_index() {
        let client = http::build_client().unwrap();
        let base = http::validate_endpoint(DEFAULT_NUGET_INDEX).unwrap();
        let source = NuGetIndexSource::new(client, base, "CounterStrikeSharp.API");
        let info = source.resolve().unwrap();
        println!("Latest package: {}", info.version);
    }
}
