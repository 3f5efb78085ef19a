use crate::error::Result;
use crate::utils::ManifestPatterns;
use crate::utils::verbose;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads the version currently pinned for the tracked package.
pub struct VersionExtractor {
    manifest_path: PathBuf,
    patterns: ManifestPatterns,
}

impl VersionExtractor {
    pub fn new<P: AsRef<Path>>(manifest_path: P, package: &str) -> Result<Self> {
        Ok(Self {
            manifest_path: manifest_path.as_ref().to_path_buf(),
            patterns: ManifestPatterns::for_package(package)?,
        })
    }

    /// `None` when the manifest is missing, unreadable, or has no matching entry.
    pub fn current_version(&self) -> Option<String> {
        match fs::read_to_string(&self.manifest_path) {
            Ok(content) => self.patterns.find_version(&content),
            Err(e) => {
                verbose::log(format!(
                    "Cannot read {}: {e}",
                    self.manifest_path.display()
                ));
                None
            }
        }
    }

    pub fn patterns(&self) -> &ManifestPatterns {
        &self.patterns
    }
}
