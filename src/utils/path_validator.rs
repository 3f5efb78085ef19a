use crate::error::{PinbumpError, Result};
use std::path::{Path, PathBuf};

/// Path checks for the project directory and the manifest inside it.
pub struct PathValidator;

impl PathValidator {
    /// Canonicalise the project directory, refusing files and system directories.
    pub fn validate_project_dir(path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();

        let canonical = path.canonicalize().map_err(|e| {
            PinbumpError::ProjectValidation(format!("Invalid path '{}': {e}", path.display()))
        })?;

        if !canonical.is_dir() {
            return Err(PinbumpError::ProjectValidation(format!(
                "Path '{}' is not a directory",
                canonical.display()
            )));
        }

        const FORBIDDEN: &[&str] = &["/etc", "/sys", "/proc", "/dev", "/boot"];

        for forbidden in FORBIDDEN {
            let forbidden_path = Path::new(forbidden);
            let canonical_forbidden = forbidden_path
                .canonicalize()
                .unwrap_or_else(|_| forbidden_path.to_path_buf());

            if canonical.starts_with(forbidden_path) || canonical.starts_with(&canonical_forbidden)
            {
                return Err(PinbumpError::ProjectValidation(format!(
                    "Access to system directory '{}' is not allowed",
                    forbidden
                )));
            }
        }

        Ok(canonical)
    }

    /// Resolve the manifest path and make sure it is a regular file under `project_dir`.
    /// Relative manifest paths are taken relative to the project directory.
    pub fn validate_manifest(
        manifest: impl AsRef<Path>,
        project_dir: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        let manifest = manifest.as_ref();
        let project_dir = project_dir.as_ref();
        let joined = if manifest.is_absolute() {
            manifest.to_path_buf()
        } else {
            project_dir.join(manifest)
        };

        let canonical = joined.canonicalize().map_err(|e| {
            PinbumpError::ProjectValidation(format!(
                "Manifest '{}' is not accessible: {e}",
                joined.display()
            ))
        })?;

        if !canonical.is_file() {
            return Err(PinbumpError::ProjectValidation(format!(
                "Manifest '{}' is not a file",
                canonical.display()
            )));
        }

        let canonical_base = project_dir.canonicalize()?;
        if !canonical.starts_with(&canonical_base) {
            return Err(PinbumpError::ProjectValidation(
                "Manifest is outside the project directory".to_string(),
            ));
        }

        Ok(canonical)
    }
}
