use crate::error::{PinbumpError, Result};
use crate::utils::verbose;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::Duration;

/// Lines of stderr/stdout kept in error messages.
const OUTPUT_TAIL_LINES: usize = 15;

/// Package-manager operations the updater relies on. Success is the command's exit status.
pub trait PackageManager {
    fn remove_package(&self, package: &str) -> Result<()>;

    fn add_package(&self, package: &str, version: &str) -> Result<()>;

    fn restore(&self) -> Result<()>;

    fn build_release(&self) -> Result<()>;
}

/// DotnetExecutionAgent runs `dotnet` against one manifest
pub struct DotnetExecutionAgent {
    program: PathBuf,
    project_path: PathBuf,
    manifest_path: PathBuf,
}

impl DotnetExecutionAgent {
    pub fn new<P: AsRef<Path>>(program: P, project_path: P, manifest_path: P) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            project_path: project_path.as_ref().to_path_buf(),
            manifest_path: manifest_path.as_ref().to_path_buf(),
        }
    }

    fn manifest_arg(&self) -> String {
        self.manifest_path.to_string_lossy().into_owned()
    }

    /// Run a dotnet command with a spinner; output is echoed only in verbose mode.
    fn execute_dotnet_command(&self, args: &[&str]) -> Result<()> {
        let display = format!("{} {}", self.program.display(), args.join(" "));
        verbose::log(format!("Executing: {display}"));

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("   {spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message(display.clone());

        let output = Command::new(&self.program)
            .current_dir(&self.project_path)
            .args(args)
            .output();
        spinner.finish_and_clear();

        let output = output.map_err(|e| {
            PinbumpError::PackageManager(format!("Failed to spawn '{display}': {e}"))
        })?;

        if verbose::enabled() {
            for line in String::from_utf8_lossy(&output.stdout).lines() {
                eprintln!("[VERBOSE]   {line}");
            }
        }

        if !output.status.success() {
            return Err(PinbumpError::PackageManager(format!(
                "'{}' exited with code {}{}",
                display,
                output.status.code().unwrap_or(-1),
                Self::output_tail(&output)
            )));
        }

        Ok(())
    }

    fn output_tail(output: &Output) -> String {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let text = if stderr.trim().is_empty() { stdout } else { stderr };

        let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        if lines.is_empty() {
            return String::new();
        }
        let start = lines.len().saturating_sub(OUTPUT_TAIL_LINES);
        format!("\n{}", lines[start..].join("\n"))
    }
}

impl PackageManager for DotnetExecutionAgent {
    fn remove_package(&self, package: &str) -> Result<()> {
        let manifest = self.manifest_arg();
        self.execute_dotnet_command(&["remove", &manifest, "package", package])
    }

    fn add_package(&self, package: &str, version: &str) -> Result<()> {
        let manifest = self.manifest_arg();
        self.execute_dotnet_command(&["add", &manifest, "package", package, "--version", version])
    }

    fn restore(&self) -> Result<()> {
        let manifest = self.manifest_arg();
        self.execute_dotnet_command(&["restore", &manifest])
    }

    fn build_release(&self) -> Result<()> {
        let manifest = self.manifest_arg();
        self.execute_dotnet_command(&["build", &manifest, "-c", "Release"])
    }
}
