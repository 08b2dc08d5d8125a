use clap::Parser;
use std::process::ExitCode;
use tracing::warn;

mod cli;
mod commands;
mod config;
mod domain;
mod error;
mod infrastructure;
mod k8s;
mod services;
mod tools;
mod ui;

use cli::Cli;
use commands::deploy::{self, DeployRequest};
use services::DeployOptions;

#[tokio::main]
async fn main() -> ExitCode {
    // Usage errors exit with code 2 from here
    let cli = Cli::parse();

    // Initialize logging with LOGGING env var support
    // LOGGING=debug,info,warn,error or just LOGGING=debug
    let log_level = std::env::var("LOGGING")
        .or_else(|_| std::env::var("LOG_LEVEL"))
        .unwrap_or_else(|_| {
            if cli.verbose {
                "debug".to_string()
            } else {
                "info".to_string()
            }
        });

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(false) // Disable ANSI escape codes for cleaner output
        .init();

    let request = DeployRequest {
        environment: cli.environment,
        options: DeployOptions {
            force_recreate: cli.force,
        },
        config_path: cli.config,
        working_dir: cli.working_dir,
    };

    match deploy::execute(request).await {
        Ok(outcome) => {
            if !outcome.is_clean() {
                warn!("⚠️  Deployment finished with warnings, see the report above");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            ui::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
