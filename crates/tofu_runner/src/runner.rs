//! Process runner trait and types.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{Invocation, RunConfig};
use crate::error::RunnerResult;

/// Result of a process execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Exit code (-1 when the process was terminated by a signal)
    pub exit_code: i64,
    /// Captured stdout
    pub stdout: String,
    /// Captured stderr
    pub stderr: String,
    /// Execution start time
    pub started_at: DateTime<Utc>,
    /// Execution end time
    pub finished_at: DateTime<Utc>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Process runner trait.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Check if `program` can be started.
    async fn is_available(&self, program: &str) -> RunnerResult<bool>;

    /// Run a process to completion and capture its output.
    ///
    /// A non-zero exit code is not an error here; callers classify it.
    async fn run(&self, invocation: &Invocation, run_config: &RunConfig)
        -> RunnerResult<ExecutionResult>;
}
