pub mod github_releases;
pub mod http;
pub mod nuget_index;

pub use github_releases::GitHubReleasesSource;
pub use nuget_index::NuGetIndexSource;
