use crate::remote::github_releases::DEFAULT_GITHUB_API;
use crate::remote::nuget_index::DEFAULT_NUGET_INDEX;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pinbump",
    about = "Check and bump the pinned version of one dependency in a .NET project manifest",
    version
)]
pub struct Cli {
    /// Path to the project directory (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    pub path: PathBuf,

    /// Manifest to update (defaults to the single *.csproj in the project directory)
    #[arg(short, long, env = "PINBUMP_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Package identifier whose version is tracked
    #[arg(long, env = "PINBUMP_PACKAGE", default_value = "CounterStrikeSharp.API")]
    pub package: String,

    /// GitHub repository (owner/name) whose releases are checked first
    #[arg(
        long,
        env = "PINBUMP_RELEASE_REPO",
        default_value = "roflmuffin/CounterStrikeSharp"
    )]
    pub release_repo: String,

    /// Base URL of the GitHub API
    #[arg(long, env = "PINBUMP_GITHUB_API", default_value = DEFAULT_GITHUB_API)]
    pub github_api: String,

    /// Base URL of the NuGet flat-container index, used when releases are unavailable
    #[arg(long, env = "PINBUMP_NUGET_INDEX", default_value = DEFAULT_NUGET_INDEX)]
    pub nuget_index: String,

    /// Package manager executable
    #[arg(long, env = "PINBUMP_DOTNET", default_value = "dotnet")]
    pub dotnet: PathBuf,

    /// Only report the pinned and latest versions; never modify anything
    #[arg(long)]
    pub check_only: bool,

    /// Update to the latest version without prompting
    #[arg(long)]
    pub update_to_latest: bool,

    /// Pin this exact version instead of the latest one
    #[arg(long, value_name = "VERSION")]
    pub target_version: Option<String>,

    /// Re-apply the update even when the pinned version is already current
    #[arg(long)]
    pub force: bool,

    /// What to do with a backup left by an interrupted run
    #[arg(long, value_enum, default_value_t = StaleBackupPolicy::Ask)]
    pub stale_backup: StaleBackupPolicy,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StaleBackupPolicy {
    /// Prompt for restore, discard or abort
    Ask,
    /// Copy the backup over the manifest, then delete it
    Restore,
    /// Delete the backup and keep the manifest as it is
    Discard,
}
