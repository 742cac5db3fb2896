//! tofu-action CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: OpenTofu failed or could not be started
//! - 2: Invalid arguments, inputs or config

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;

use commands::{Cli, Commands};
use config::{ActionConfig, ConfigError};
use tofu_args::{ArgsError, Subcommand};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const TOOL_FAILURE: u8 = 1;
    pub const INVALID_INPUT: u8 = 2;
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "tofu_cli={0},tofu_runner={0},tofu_args={0},warn",
            level
        ))
    });

    // Logs go to stderr so stdout carries only tool output and workflow commands
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = run(cli).await;

    match result {
        Ok(true) => ExitCode::from(ExitCodes::SUCCESS),
        Ok(false) => ExitCode::from(ExitCodes::TOOL_FAILURE),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(categorize_error(&e))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let cwd = std::env::current_dir()?;
    let config = ActionConfig::discover(cli.config.as_deref(), &cwd)?;

    match cli.command {
        Commands::Init(args) => commands::run::execute(Subcommand::Init, args, &config).await,
        Commands::Plan(args) => commands::run::execute(Subcommand::Plan, args, &config).await,
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    if e.chain().any(|cause| cause.is::<ArgsError>() || cause.is::<ConfigError>()) {
        ExitCodes::INVALID_INPUT
    } else {
        ExitCodes::TOOL_FAILURE
    }
}
