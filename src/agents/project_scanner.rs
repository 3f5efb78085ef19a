use crate::error::{PinbumpError, Result};
use crate::utils::PathValidator;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix appended to the manifest path for the pre-mutation snapshot.
pub const BACKUP_SUFFIX: &str = ".backup";

/// ProjectScannerAgent locates the manifest and any leftover backup
pub struct ProjectScannerAgent {
    project_path: PathBuf,
    manifest: Option<PathBuf>,
}

impl ProjectScannerAgent {
    pub fn new<P: AsRef<Path>>(project_path: P, manifest: Option<PathBuf>) -> Self {
        Self {
            project_path: project_path.as_ref().to_path_buf(),
            manifest,
        }
    }

    /// Validates the project structure
    pub fn validate(&self) -> Result<ProjectInfo> {
        let project_path = PathValidator::validate_project_dir(&self.project_path)?;

        let manifest_path = match &self.manifest {
            Some(manifest) => PathValidator::validate_manifest(manifest, &project_path)?,
            None => {
                let discovered = Self::discover_manifest(&project_path)?;
                PathValidator::validate_manifest(discovered, &project_path)?
            }
        };

        let backup_path = backup_path_for(&manifest_path);
        let has_stale_backup = backup_path.exists();

        Ok(ProjectInfo {
            project_path,
            manifest_path,
            backup_path,
            has_stale_backup,
        })
    }

    /// The single `*.csproj` in the project directory.
    fn discover_manifest(project_path: &Path) -> Result<PathBuf> {
        let mut candidates: Vec<PathBuf> = fs::read_dir(project_path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("csproj"))
            })
            .collect();
        candidates.sort();

        match candidates.len() {
            0 => Err(PinbumpError::ProjectValidation(format!(
                "No *.csproj manifest found in '{}'; pass --manifest",
                project_path.display()
            ))),
            1 => Ok(candidates.remove(0)),
            n => Err(PinbumpError::ProjectValidation(format!(
                "Found {n} *.csproj manifests in '{}'; pass --manifest to pick one",
                project_path.display()
            ))),
        }
    }
}

/// `<manifest-path>.backup`
pub fn backup_path_for(manifest_path: &Path) -> PathBuf {
    let mut raw: OsString = manifest_path.as_os_str().to_owned();
    raw.push(BACKUP_SUFFIX);
    PathBuf::from(raw)
}

#[derive(Debug, Clone)]
pub struct ProjectInfo {
    pub project_path: PathBuf,
    pub manifest_path: PathBuf,
    pub backup_path: PathBuf,
    pub has_stale_backup: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn discovers_single_manifest() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Plugin.csproj"), "<Project />").unwrap();
        fs::write(dir.path().join("README.md"), "docs").unwrap();

        let info = ProjectScannerAgent::new(dir.path(), None).validate().unwrap();
        assert!(info.manifest_path.ends_with("Plugin.csproj"));
        assert!(info.backup_path.ends_with("Plugin.csproj.backup"));
        assert!(!info.has_stale_backup);
    }

    #[test]
    fn rejects_ambiguous_manifests() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("A.csproj"), "<Project />").unwrap();
        fs::write(dir.path().join("B.csproj"), "<Project />").unwrap();

        let err = ProjectScannerAgent::new(dir.path(), None)
            .validate()
            .unwrap_err();
        assert!(matches!(err, PinbumpError::ProjectValidation(_)));

        let info = ProjectScannerAgent::new(dir.path(), Some(PathBuf::from("B.csproj")))
            .validate()
            .unwrap();
        assert!(info.manifest_path.ends_with("B.csproj"));
    }

    #[test]
    fn reports_missing_manifest() {
        let dir = tempdir().unwrap();
        assert!(ProjectScannerAgent::new(dir.path(), None).validate().is_err());
        assert!(
            ProjectScannerAgent::new(dir.path(), Some(PathBuf::from("Missing.csproj")))
                .validate()
                .is_err()
        );
    }

    #[test]
    fn detects_stale_backup() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Plugin.csproj"), "<Project />").unwrap();
        fs::write(dir.path().join("Plugin.csproj.backup"), "<Project />").unwrap();

        let info = ProjectScannerAgent::new(dir.path(), None).validate().unwrap();
        assert!(info.has_stale_backup);
    }
}
