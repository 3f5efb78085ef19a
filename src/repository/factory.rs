use crate::error::Result;
use crate::remote::{GitHubReleasesSource, NuGetIndexSource, http};
use crate::repository::{RemoteVersionResolver, VersionSource};

/// Endpoint settings for the default source chain.
#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub package: String,
    pub release_repo: String,
    pub github_api: String,
    pub nuget_index: String,
    pub github_token: Option<String>,
}

pub struct SourceFactory;

impl SourceFactory {
    /// Release listing first, package index second.
    pub fn create_resolver(settings: &SourceSettings) -> Result<RemoteVersionResolver> {
        let client = http::build_client()?;

        let primary = GitHubReleasesSource::new(
            client.clone(),
            http::validate_endpoint(&settings.github_api)?,
            &settings.release_repo,
            settings.github_token.clone(),
        )?;
        let fallback = NuGetIndexSource::new(
            client,
            http::validate_endpoint(&settings.nuget_index)?,
            &settings.package,
        );

        let sources: Vec<Box<dyn VersionSource>> = vec![Box::new(primary), Box::new(fallback)];
        Ok(RemoteVersionResolver::new(sources))
    }
}
