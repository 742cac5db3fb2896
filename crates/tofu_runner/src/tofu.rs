//! Executes built OpenTofu commands.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use tofu_args::TofuCommand;

use crate::config::{Invocation, RunConfig};
use crate::error::{RunnerError, RunnerResult};
use crate::policy::{ExitPolicy, ExitStatus};
use crate::runner::ProcessRunner;

/// Result of running one OpenTofu command.
#[derive(Debug, Clone, Serialize)]
pub struct TofuOutcome {
    /// The command line that ran
    pub command: String,
    pub status: ExitStatus,
    pub exit_code: i64,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

impl TofuOutcome {
    pub fn success(&self) -> bool {
        self.status.is_success()
    }

    /// Whether a detailed-exitcode plan reported pending changes.
    pub fn has_changes(&self) -> bool {
        self.status == ExitStatus::Changes
    }
}

/// Runs [`TofuCommand`]s through a [`ProcessRunner`].
pub struct TofuExecutor {
    runner: Arc<dyn ProcessRunner>,
    run_config: RunConfig,
    env: HashMap<String, String>,
}

impl TofuExecutor {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            runner,
            run_config: RunConfig::default(),
            env: HashMap::new(),
        }
    }

    pub fn with_run_config(mut self, run_config: RunConfig) -> Self {
        self.run_config = run_config;
        self
    }

    /// Add an environment variable for every command.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Fail early when the program cannot be started.
    pub async fn ensure_available(&self, program: &str) -> RunnerResult<()> {
        if self.runner.is_available(program).await? {
            Ok(())
        } else {
            Err(RunnerError::ProgramNotAvailable(program.to_string()))
        }
    }

    /// Run `command` in `working_dir` and classify its exit code.
    pub async fn execute(&self, command: &TofuCommand, working_dir: &Path) -> RunnerResult<TofuOutcome> {
        let policy = ExitPolicy::for_command(command);
        let command_line = command.to_command_string();
        info!("Running: {}", command_line);
        debug!("Working directory: {:?}, exit policy: {:?}", working_dir, policy);

        let invocation = Invocation {
            program: command.program.clone(),
            args: command.args(),
            working_dir: Some(working_dir.to_path_buf()),
            env: self.env.clone(),
        };

        let result = self.runner.run(&invocation, &self.run_config).await?;
        let status = policy.classify(result.exit_code);

        match status {
            ExitStatus::Success => info!("tofu {} completed successfully.", command.subcommand),
            ExitStatus::Changes => info!("tofu {} completed with changes present.", command.subcommand),
            ExitStatus::Failure => warn!(
                "tofu {} failed with exit code {}",
                command.subcommand, result.exit_code
            ),
        }

        Ok(TofuOutcome {
            command: command_line,
            status,
            exit_code: result.exit_code,
            stdout: result.stdout,
            stderr: result.stderr,
            duration_ms: result.duration_ms,
        })
    }
}
