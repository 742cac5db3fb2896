//! CLI command definitions.
//!
//! `init` and `plan` share one set of options; they differ only in the
//! flag table applied to the gathered inputs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod run;

pub use run::RunArgs;

/// tofu-action - run OpenTofu init/plan from named inputs
#[derive(Parser)]
#[command(name = "tofu-action")]
#[command(version, about = "Run OpenTofu init/plan from named inputs")]
#[command(long_about = r#"
Builds an OpenTofu `init` or `plan` command line from named inputs and runs it.

Inputs come from a YAML/JSON file (--inputs), the INPUT_* environment of a
GitHub Actions step (--from-env) and --set KEY=VALUE overrides, in that order
of precedence (later wins). Values equal to OpenTofu's defaults are left out
of the command.

EXIT CODES:
  0 - Success (also plan exit code 2 with detailed-exitcode)
  1 - OpenTofu failed or could not be started
  2 - Invalid arguments, inputs or config
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: .tofu-action.yaml if present)
    #[arg(long, global = true, env = "TOFU_ACTION_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run `tofu init`
    Init(RunArgs),

    /// Run `tofu plan`
    Plan(RunArgs),
}
