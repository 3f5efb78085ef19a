pub mod dotnet_execution;
pub mod manifest_updater;
pub mod project_scanner;
pub mod version_extractor;

pub mod update;

pub use dotnet_execution::{DotnetExecutionAgent, PackageManager};
pub use manifest_updater::{ManifestUpdater, UpdateOutcome};
pub use project_scanner::{ProjectInfo, ProjectScannerAgent};
pub use version_extractor::VersionExtractor;
