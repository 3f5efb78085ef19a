mod agents;
mod cli;
mod error;
mod remote;
mod repository;
mod utils;
mod version;
mod workflow;

use agents::update::PlanRequest;
use clap::Parser;
use cli::Cli;
use colored::Colorize;
use repository::factory::SourceSettings;
use std::process;
use workflow::WorkflowOptions;

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        unsafe {
            std::env::set_var(utils::verbose::VERBOSE_ENV, "1");
        }
    }

    let options = WorkflowOptions {
        project_path: cli.path,
        manifest: cli.manifest,
        dotnet: cli.dotnet,
        stale_backup: cli.stale_backup,
        request: PlanRequest {
            check_only: cli.check_only,
            update_to_latest: cli.update_to_latest,
            force: cli.force,
            target_version: cli.target_version,
        },
        sources: SourceSettings {
            package: cli.package,
            release_repo: cli.release_repo,
            github_api: cli.github_api,
            nuget_index: cli.nuget_index,
            github_token: std::env::var("GITHUB_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
        },
    };

    if let Err(e) = workflow::execute(&options) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
