use thiserror::Error;

#[derive(Error, Debug)]
pub enum PinbumpError {
    #[error("Project validation failed: {0}")]
    ProjectValidation(String),

    #[error("Could not resolve the latest version: {0}")]
    Resolution(String),

    #[error("Failed to rewrite manifest: {0}")]
    Mutation(String),

    #[error("Build failed with the new version: {0}")]
    Build(String),

    #[error("Package manager command failed: {0}")]
    PackageManager(String),

    #[error("Rollback failed: {0}")]
    Rollback(String),

    #[error("Stale backup found: {0}")]
    StaleBackup(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Operation cancelled by user")]
    UserCancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Pattern error: {0}")]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, PinbumpError>;
