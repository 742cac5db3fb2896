//! Exit code interpretation.

use serde::{Deserialize, Serialize};

use tofu_args::{Subcommand, TofuCommand, DETAILED_EXITCODE_INPUT};

/// How an exit code maps to success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExitPolicy {
    /// 0 succeeds, anything else fails.
    Standard,
    /// `plan -detailed-exitcode`: 0 = no changes, 2 = changes present,
    /// anything else fails.
    DetailedExitCode,
}

/// Classified outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExitStatus {
    Success,
    /// Succeeded and the plan contains changes.
    Changes,
    Failure,
}

impl ExitStatus {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failure)
    }
}

impl ExitPolicy {
    /// Policy for a built command. Only `plan` with `--detailed-exitcode`
    /// uses detailed codes.
    pub fn for_command(command: &TofuCommand) -> Self {
        if command.subcommand == Subcommand::Plan && command.has_flag(DETAILED_EXITCODE_INPUT) {
            Self::DetailedExitCode
        } else {
            Self::Standard
        }
    }

    pub fn classify(&self, exit_code: i64) -> ExitStatus {
        match (self, exit_code) {
            (_, 0) => ExitStatus::Success,
            (Self::DetailedExitCode, 2) => ExitStatus::Changes,
            _ => ExitStatus::Failure,
        }
    }
}
