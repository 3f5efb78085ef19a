use crate::agents::update::planner::{PlanWarning, UpdatePlan};
use crate::error::{PinbumpError, Result};
use crate::version::{Comparison, VersionString};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// What the operator picked when the flags did not settle the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorChoice {
    Latest,
    Custom(String),
}

/// What to do with a backup left behind by an interrupted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleBackupAction {
    Restore,
    Discard,
}

/// Prompts shown when a decision cannot be derived from flags.
///
/// Reads from stdin by default; tests supply their own reader.
pub struct UpdateInteraction {
    input: Box<dyn BufRead>,
}

impl UpdateInteraction {
    pub fn new() -> Self {
        Self::with_input(Box::new(io::BufReader::new(io::stdin())))
    }

    pub fn with_input(input: Box<dyn BufRead>) -> Self {
        Self { input }
    }

    /// Ask whether to apply the latest version, pin a custom one, or abort.
    pub fn choose_target(
        &mut self,
        plan: &UpdatePlan,
        warning: Option<PlanWarning>,
    ) -> Result<OperatorChoice> {
        if let Some(warning) = warning {
            println!("\n{} {}", "⚠ Warning:".yellow().bold(), warning);
        }

        println!(
            "\n{} {} {} {}",
            "Pinned:".dimmed(),
            plan.current_version.as_deref().unwrap_or("unknown").red(),
            "Target:".dimmed(),
            plan.target_version.green().bold()
        );
        println!("  [l] {}", target_label(plan));
        println!("  [c] enter a custom version");
        println!("  [a] abort");

        let answer = self.ask("Choose an option [l/c/a]: ")?;
        match answer.to_lowercase().as_str() {
            "l" | "latest" | "y" | "yes" => Ok(OperatorChoice::Latest),
            "c" | "custom" => {
                let version = self.ask("Version to pin: ")?;
                if VersionString::parse(&version).is_none() {
                    return Err(PinbumpError::InvalidInput(format!(
                        "'{version}' is not a dot-separated numeric version"
                    )));
                }
                Ok(OperatorChoice::Custom(version))
            }
            "a" | "abort" | "q" | "quit" | "n" | "no" => Err(PinbumpError::UserCancelled),
            other => Err(PinbumpError::InvalidInput(format!(
                "unrecognised choice '{other}'"
            ))),
        }
    }

    /// Ask whether to restore or discard a leftover backup.
    pub fn choose_stale_backup_action(&mut self, backup_path: &Path) -> Result<StaleBackupAction> {
        println!(
            "\n{} {}",
            "⚠ Found a backup from an interrupted run:".yellow().bold(),
            backup_path.display()
        );
        println!("  [r] restore it over the manifest");
        println!("  [d] discard it and keep the current manifest");
        println!("  [a] abort");

        let answer = self.ask("Choose an option [r/d/a]: ")?;
        match answer.to_lowercase().as_str() {
            "r" | "restore" => Ok(StaleBackupAction::Restore),
            "d" | "discard" => Ok(StaleBackupAction::Discard),
            "a" | "abort" | "q" | "quit" => Err(PinbumpError::UserCancelled),
            other => Err(PinbumpError::InvalidInput(format!(
                "unrecognised choice '{other}'"
            ))),
        }
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        print!("{}", prompt.bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PinbumpError::InvalidInput(
                "no answer available on standard input".to_string(),
            ));
        }
        Ok(line.trim().to_string())
    }
}

fn target_label(plan: &UpdatePlan) -> String {
    match plan.comparison {
        Comparison::Older => format!("downgrade to {}", plan.target_version),
        Comparison::Unknown => format!("pin {}", plan.target_version),
        Comparison::Newer | Comparison::Same => format!("update to {}", plan.target_version),
    }
}

impl Default for UpdateInteraction {
    fn default() -> Self {
        Self::new()
    }
}
