use crate::agents::dotnet_execution::PackageManager;
use crate::agents::project_scanner::backup_path_for;
use crate::agents::version_extractor::VersionExtractor;
use crate::error::{PinbumpError, Result};
use crate::utils::verbose;
use crate::version::{Comparison, VersionComparator};
use colored::Colorize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Snapshot of the manifest held for the duration of one mutation.
///
/// The backup file exists from `begin` until `commit` or `rollback`. Dropping an
/// unfinished transaction restores the snapshot.
pub struct ManifestTransaction {
    manifest_path: PathBuf,
    backup_path: PathBuf,
    snapshot: Vec<u8>,
    finished: bool,
}

impl ManifestTransaction {
    pub fn begin<P: AsRef<Path>>(manifest_path: P) -> Result<Self> {
        let manifest_path = manifest_path.as_ref().to_path_buf();
        if !manifest_path.is_file() {
            return Err(PinbumpError::Mutation(format!(
                "manifest '{}' does not exist",
                manifest_path.display()
            )));
        }

        let backup_path = backup_path_for(&manifest_path);
        if backup_path.exists() {
            return Err(PinbumpError::StaleBackup(format!(
                "'{}' already exists; restore or discard it first",
                backup_path.display()
            )));
        }

        let snapshot = fs::read(&manifest_path)?;
        fs::write(&backup_path, &snapshot)?;
        verbose::log(format!("Snapshot written to {}", backup_path.display()));

        Ok(Self {
            manifest_path,
            backup_path,
            snapshot,
            finished: false,
        })
    }

    pub fn snapshot(&self) -> &[u8] {
        &self.snapshot
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// Put the snapshot back into the manifest while keeping the transaction open.
    pub fn reset(&self) -> Result<()> {
        fs::write(&self.manifest_path, &self.snapshot)?;
        Ok(())
    }

    /// Keep the mutated manifest and drop the backup.
    pub fn commit(mut self) -> Result<()> {
        self.finished = true;
        fs::remove_file(&self.backup_path)?;
        Ok(())
    }

    /// Restore the manifest byte-for-byte and drop the backup.
    pub fn rollback(mut self) -> Result<()> {
        self.finished = true;
        self.restore_snapshot()
    }

    fn restore_snapshot(&self) -> Result<()> {
        let contents = match fs::read(&self.backup_path) {
            Ok(contents) => contents,
            Err(e) => {
                verbose::log(format!(
                    "Backup unreadable ({e}); restoring from memory instead"
                ));
                self.snapshot.clone()
            }
        };

        fs::write(&self.manifest_path, contents)
            .map_err(|e| PinbumpError::Rollback(format!("could not rewrite manifest: {e}")))?;

        if self.backup_path.exists() {
            fs::remove_file(&self.backup_path).map_err(|e| {
                PinbumpError::Rollback(format!(
                    "manifest restored but '{}' could not be removed: {e}",
                    self.backup_path.display()
                ))
            })?;
        }
        Ok(())
    }
}

impl Drop for ManifestTransaction {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(e) = self.restore_snapshot() {
                eprintln!("{} {}", "Rollback failed:".red().bold(), e);
            }
        }
    }
}

/// How the new version got into the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationMethod {
    PackageManager,
    TextSubstitution,
}

impl fmt::Display for MutationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationMethod::PackageManager => f.write_str("package manager"),
            MutationMethod::TextSubstitution => f.write_str("text substitution"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    pub version: String,
    pub method: MutationMethod,
    pub warnings: Vec<String>,
}

/// ManifestUpdater pins a new version and proves it builds, or leaves the manifest untouched
pub struct ManifestUpdater<'a> {
    manifest_path: PathBuf,
    package: String,
    extractor: VersionExtractor,
    package_manager: &'a dyn PackageManager,
}

impl<'a> ManifestUpdater<'a> {
    pub fn new<P: AsRef<Path>>(
        manifest_path: P,
        package: &str,
        package_manager: &'a dyn PackageManager,
    ) -> Result<Self> {
        let manifest_path = manifest_path.as_ref().to_path_buf();
        Ok(Self {
            extractor: VersionExtractor::new(&manifest_path, package)?,
            manifest_path,
            package: package.to_string(),
            package_manager,
        })
    }

    /// Snapshot, rewrite, restore, build; commit on success, roll back on any failure.
    pub fn apply(&self, target: &str) -> Result<UpdateOutcome> {
        let transaction = ManifestTransaction::begin(&self.manifest_path)?;
        println!(
            "   {} {}",
            "Backup created:".dimmed(),
            transaction.backup_path().display()
        );

        let mut warnings = Vec::new();
        match self.mutate_and_verify(&transaction, target, &mut warnings) {
            Ok(method) => {
                if let Err(e) = transaction.commit() {
                    let warning = format!("update applied but backup could not be removed: {e}");
                    println!("{} {}", "⚠".yellow(), warning.yellow());
                    warnings.push(warning);
                }
                Ok(UpdateOutcome {
                    version: target.to_string(),
                    method,
                    warnings,
                })
            }
            Err(err) => {
                self.abort(transaction);
                Err(err)
            }
        }
    }

    fn mutate_and_verify(
        &self,
        transaction: &ManifestTransaction,
        target: &str,
        warnings: &mut Vec<String>,
    ) -> Result<MutationMethod> {
        let method = self.rewrite(transaction, target)?;
        println!(
            "{}",
            format!("✓ Manifest now pins {} via {}", target, method).green()
        );

        println!("   Restoring dependencies...");
        if let Err(e) = self.package_manager.restore() {
            let warning = format!("dependency restore reported a problem: {e}");
            println!("{} {}", "⚠".yellow(), warning.yellow());
            warnings.push(warning);
        }

        println!("   Building in Release configuration...");
        self.package_manager
            .build_release()
            .map_err(|e| PinbumpError::Build(e.to_string()))?;
        println!("{}", "✓ Build succeeded".green());

        Ok(method)
    }

    fn rewrite(&self, transaction: &ManifestTransaction, target: &str) -> Result<MutationMethod> {
        match self.rewrite_with_package_manager(target) {
            Ok(()) => return Ok(MutationMethod::PackageManager),
            Err(e) => {
                println!(
                    "{} {}",
                    "⚠ Package manager update failed, falling back to text substitution:".yellow(),
                    e
                );
            }
        }

        // remove may have succeeded before add failed
        transaction.reset()?;

        let original = String::from_utf8(transaction.snapshot().to_vec()).map_err(|_| {
            PinbumpError::Mutation("manifest is not valid UTF-8 text".to_string())
        })?;

        let updated = self
            .extractor
            .patterns()
            .replace_version(&original, target)
            .ok_or_else(|| {
                PinbumpError::Mutation(format!(
                    "no reference to '{}' found in '{}'",
                    self.package,
                    self.manifest_path.display()
                ))
            })?;

        fs::write(&self.manifest_path, updated)?;
        Ok(MutationMethod::TextSubstitution)
    }

    fn rewrite_with_package_manager(&self, target: &str) -> Result<()> {
        self.package_manager.remove_package(&self.package)?;
        self.package_manager.add_package(&self.package, target)?;

        let pinned = self.extractor.current_version();
        let matches = pinned.as_deref() == Some(target)
            || VersionComparator::compare(pinned.as_deref(), Some(target)) == Comparison::Same;
        if !matches {
            return Err(PinbumpError::Mutation(format!(
                "manifest pins {} after the package manager ran",
                pinned.as_deref().unwrap_or("nothing")
            )));
        }
        Ok(())
    }

    fn abort(&self, transaction: ManifestTransaction) {
        println!("{}", "Rolling back manifest...".yellow());
        match transaction.rollback() {
            Ok(()) => {
                println!("{}", "✓ Manifest restored from backup".green());
                if let Err(e) = self.package_manager.restore() {
                    println!(
                        "{} {}",
                        "⚠ Dependency restore after rollback failed:".yellow(),
                        e
                    );
                }
            }
            Err(e) => {
                eprintln!("{} {}", "Rollback failed:".red().bold(), e);
            }
        }
    }
}
