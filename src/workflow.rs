use crate::agents::update::{
    OperatorChoice, PlanDecision, PlanRequest, StaleBackupAction, UpdateInteraction, UpdatePlan,
    UpdatePlanner,
};
use crate::agents::{
    DotnetExecutionAgent, ManifestUpdater, PackageManager, ProjectInfo, ProjectScannerAgent,
    UpdateOutcome, VersionExtractor,
};
use crate::cli::StaleBackupPolicy;
use crate::error::{PinbumpError, Result};
use crate::repository::factory::SourceSettings;
use crate::repository::{RemoteVersionInfo, RemoteVersionResolver, SourceFactory};
use crate::version::{Comparison, VersionString};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

const NOTES_EXCERPT_LINES: usize = 12;
const NOTES_EXCERPT_CHARS: usize = 800;

/// Everything one invocation needs, taken from the command line.
#[derive(Debug, Clone)]
pub struct WorkflowOptions {
    pub project_path: PathBuf,
    pub manifest: Option<PathBuf>,
    pub dotnet: PathBuf,
    pub stale_backup: StaleBackupPolicy,
    pub request: PlanRequest,
    pub sources: SourceSettings,
}

/// How a run ended without error.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Reported,
    UpToDate,
    Updated(UpdateOutcome),
    Cancelled,
}

/// Execute the check/update workflow against the real sources and `dotnet`
pub fn execute(options: &WorkflowOptions) -> Result<()> {
    println!(
        "{}",
        format!("Checking {} for updates...", options.sources.package)
            .cyan()
            .bold()
    );

    println!("\n{}", "1. Validating project structure...".yellow());
    let scanner = ProjectScannerAgent::new(&options.project_path, options.manifest.clone());
    let project_info = scanner.validate()?;
    println!(
        "{} {}",
        "✓ Manifest:".green(),
        project_info.manifest_path.display()
    );

    let resolver = SourceFactory::create_resolver(&options.sources)?;
    let package_manager = DotnetExecutionAgent::new(
        options.dotnet.as_path(),
        project_info.project_path.as_path(),
        project_info.manifest_path.as_path(),
    );
    let mut interaction = UpdateInteraction::new();

    run(
        options,
        &project_info,
        &resolver,
        &package_manager,
        &mut interaction,
    )
    .map(|_| ())
}

/// The workflow proper, with every collaborator injected.
pub fn run(
    options: &WorkflowOptions,
    project_info: &ProjectInfo,
    resolver: &RemoteVersionResolver,
    package_manager: &dyn PackageManager,
    interaction: &mut UpdateInteraction,
) -> Result<RunOutcome> {
    match run_steps(options, project_info, resolver, package_manager, interaction) {
        Err(PinbumpError::UserCancelled) => {
            println!("\n{}", "Update cancelled by user. Nothing was changed.".yellow());
            Ok(RunOutcome::Cancelled)
        }
        other => other,
    }
}

fn run_steps(
    options: &WorkflowOptions,
    project_info: &ProjectInfo,
    resolver: &RemoteVersionResolver,
    package_manager: &dyn PackageManager,
    interaction: &mut UpdateInteraction,
) -> Result<RunOutcome> {
    let request = &options.request;
    let package = options.sources.package.as_str();

    if let Some(target) = &request.target_version {
        if VersionString::parse(target).is_none() {
            return Err(PinbumpError::InvalidInput(format!(
                "--target-version '{target}' is not a dot-separated numeric version"
            )));
        }
    }

    if project_info.has_stale_backup {
        handle_stale_backup(options, project_info, interaction)?;
    }

    println!("\n{}", "2. Reading pinned version...".yellow());
    let extractor = VersionExtractor::new(&project_info.manifest_path, package)?;
    let current = extractor.current_version();
    match &current {
        Some(version) => println!("{} {}", "✓ Pinned version:".green(), version.bold()),
        None => println!(
            "{}",
            format!(
                "⚠ No version of {} found in the manifest; treating it as unknown",
                package
            )
            .yellow()
        ),
    }

    println!("\n{}", "3. Resolving latest version...".yellow());
    let latest = resolver.resolve()?;
    print_version_summary(current.as_deref(), &latest);

    let latest_version = latest.version.as_str();
    let decision = match UpdatePlanner::plan(request, current.as_deref(), latest_version) {
        PlanDecision::AskOperator { plan, warning } => {
            match interaction.choose_target(&plan, warning)? {
                OperatorChoice::Latest => PlanDecision::Apply(plan),
                OperatorChoice::Custom(version) => {
                    let custom = PlanRequest {
                        target_version: Some(version),
                        ..request.clone()
                    };
                    // the operator has answered; an explicit target never asks again
                    match UpdatePlanner::plan(&custom, current.as_deref(), latest_version) {
                        PlanDecision::AskOperator { plan, .. } => PlanDecision::Apply(plan),
                        other => other,
                    }
                }
            }
        }
        other => other,
    };

    let plan = match decision {
        PlanDecision::ReportOnly(plan) => {
            print_check_report(&plan);
            return Ok(RunOutcome::Reported);
        }
        PlanDecision::UpToDate(plan) => {
            println!(
                "\n{}",
                format!("✨ {} is already up to date ({})", package, plan.target_version)
                    .green()
                    .bold()
            );
            return Ok(RunOutcome::UpToDate);
        }
        PlanDecision::Apply(plan) | PlanDecision::AskOperator { plan, .. } => plan,
    };

    println!(
        "\n{}",
        format!(
            "4. Updating {} {} → {} ({})...",
            package,
            plan.current_version.as_deref().unwrap_or("unknown"),
            plan.target_version,
            plan.mode
        )
        .yellow()
    );
    let updater = ManifestUpdater::new(
        &project_info.manifest_path,
        package,
        package_manager,
    )?;
    let outcome = updater.apply(&plan.target_version)?;

    print_update_success(package, &outcome);
    Ok(RunOutcome::Updated(outcome))
}

fn handle_stale_backup(
    options: &WorkflowOptions,
    project_info: &ProjectInfo,
    interaction: &mut UpdateInteraction,
) -> Result<()> {
    let backup = &project_info.backup_path;

    if options.request.check_only {
        println!(
            "{}",
            format!(
                "⚠ A backup from an interrupted run exists at {}; leaving it untouched",
                backup.display()
            )
            .yellow()
        );
        return Ok(());
    }

    let action = match options.stale_backup {
        StaleBackupPolicy::Restore => StaleBackupAction::Restore,
        StaleBackupPolicy::Discard => StaleBackupAction::Discard,
        StaleBackupPolicy::Ask => interaction.choose_stale_backup_action(backup)?,
    };

    match action {
        StaleBackupAction::Restore => {
            fs::copy(backup, &project_info.manifest_path).map_err(|e| {
                PinbumpError::StaleBackup(format!("could not restore {}: {e}", backup.display()))
            })?;
            fs::remove_file(backup)?;
            println!("{}", "✓ Manifest restored from the leftover backup".green());
        }
        StaleBackupAction::Discard => {
            fs::remove_file(backup)?;
            println!("{}", "✓ Leftover backup discarded".green());
        }
    }
    Ok(())
}

fn print_version_summary(current: Option<&str>, latest: &RemoteVersionInfo) {
    println!(
        "{} {} {}",
        "✓ Latest version:".green(),
        latest.version.as_str().green().bold(),
        format!("(from {})", latest.source).dimmed()
    );
    println!(
        "   {} {}",
        "Pinned:".dimmed(),
        current.unwrap_or("unknown").red()
    );

    let published = latest
        .published_at
        .map(|ts| ts.strftime("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    println!("   {} {}", "Published:".dimmed(), published);

    if !latest.info_url.is_empty() {
        println!("   {} {}", "Details:".dimmed(), latest.info_url.cyan());
    }

    let excerpt = notes_excerpt(&latest.notes);
    if !excerpt.is_empty() {
        println!("\n{}", "Release notes:".cyan().bold());
        for line in excerpt.lines() {
            println!("   {}", line.dimmed());
        }
    }
}

fn notes_excerpt(notes: &str) -> String {
    let lines: Vec<&str> = notes
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect();

    let mut excerpt = lines
        .iter()
        .take(NOTES_EXCERPT_LINES)
        .copied()
        .collect::<Vec<_>>()
        .join("\n");
    let mut truncated = lines.len() > NOTES_EXCERPT_LINES;

    if excerpt.chars().count() > NOTES_EXCERPT_CHARS {
        excerpt = excerpt.chars().take(NOTES_EXCERPT_CHARS).collect();
        truncated = true;
    }
    if truncated {
        excerpt.push_str("\n…");
    }
    excerpt
}

fn print_check_report(plan: &UpdatePlan) {
    let current = plan.current_version.as_deref().unwrap_or("unknown");
    match plan.comparison {
        Comparison::Newer => {
            println!(
                "\n{} {} → {}",
                "📦 Update available:".cyan().bold(),
                current.red(),
                plan.target_version.green().bold()
            );
            println!("\n{}", "To apply it, run:".dimmed());
            println!("  {}", "pinbump --update-to-latest".cyan());
        }
        Comparison::Same => {
            println!("\n{}", "✨ Already up to date!".green().bold());
        }
        Comparison::Older => {
            println!(
                "\n{}",
                format!(
                    "⚠ Pinned version {current} is newer than {}; it may be a prerelease",
                    plan.target_version
                )
                .yellow()
            );
        }
        Comparison::Unknown => {
            println!(
                "\n{}",
                "⚠ Could not compare versions because the pinned version is unknown".yellow()
            );
            println!("\n{}", "To pin a version explicitly, run:".dimmed());
            println!(
                "  {}",
                format!("pinbump --target-version {}", plan.target_version).cyan()
            );
        }
    }
}

fn print_update_success(package: &str, outcome: &UpdateOutcome) {
    println!(
        "\n{}",
        format!("✨ {} updated to {} ({})", package, outcome.version, outcome.method)
            .green()
            .bold()
    );
    if !outcome.warnings.is_empty() {
        println!("{}", "Completed with warnings:".yellow());
        for warning in &outcome.warnings {
            println!("  • {}", warning.yellow());
        }
    }
    println!("\n{}", "Next steps:".dimmed());
    println!("  • Review the manifest diff and run your plugin's tests");
    println!("  • Commit the updated manifest");
}
