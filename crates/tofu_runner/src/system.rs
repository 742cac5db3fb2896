//! Runner that spawns real processes.
//!
//! Programs are started directly with their argument list, never through a
//! shell, so values containing spaces or metacharacters reach the tool
//! unchanged.

use std::io::{BufRead, BufReader, Read};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, error, info};

use crate::config::{Invocation, RunConfig};
use crate::error::{RunnerError, RunnerResult};
use crate::runner::{ExecutionResult, ProcessRunner};

/// One line of process output.
#[derive(Debug, Clone)]
pub struct LogLine {
    pub timestamp: chrono::DateTime<Utc>,
    pub stream: LogStream,
    pub message: String,
}

/// Log stream type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStream {
    Stdout,
    Stderr,
}

impl std::fmt::Display for LogStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => write!(f, "stdout"),
            Self::Stderr => write!(f, "stderr"),
        }
    }
}

/// Log handler callback type.
pub type LogHandler = Arc<dyn Fn(LogLine) + Send + Sync>;

/// Runner backed by `std::process::Command`.
#[derive(Clone, Default)]
pub struct SystemRunner {
    log_handler: Option<LogHandler>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a log handler for streamed lines.
    pub fn with_log_handler(mut self, handler: LogHandler) -> Self {
        self.log_handler = Some(handler);
        self
    }
}

/// Read a pipe to the end, optionally echoing each line.
fn collect_stream<R>(
    reader: R,
    stream: LogStream,
    echo: bool,
    handler: Option<LogHandler>,
) -> JoinHandle<String>
where
    R: Read + Send + 'static,
{
    std::thread::spawn(move || {
        let mut output = String::new();
        for line in BufReader::new(reader).lines().map_while(Result::ok) {
            output.push_str(&line);
            output.push('\n');
            if echo {
                match stream {
                    LogStream::Stdout => println!("{}", line),
                    LogStream::Stderr => eprintln!("{}", line),
                }
                if let Some(handler) = &handler {
                    handler(LogLine {
                        timestamp: Utc::now(),
                        stream,
                        message: line,
                    });
                }
            }
        }
        output
    })
}

/// Spawn the process and wait for it, honoring the timeout.
fn execute_blocking(
    invocation: &Invocation,
    run_config: &RunConfig,
    handler: Option<LogHandler>,
) -> RunnerResult<(i64, String, String)> {
    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args)
        .envs(&invocation.env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = &invocation.working_dir {
        cmd.current_dir(dir);
    }

    let mut child = cmd.spawn().map_err(|e| {
        RunnerError::ExecutionFailed(format!("Failed to spawn {}: {}", invocation.program, e))
    })?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| RunnerError::ExecutionFailed("stdout not captured".to_string()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| RunnerError::ExecutionFailed("stderr not captured".to_string()))?;

    let stdout_handle =
        collect_stream(stdout, LogStream::Stdout, run_config.stream_logs, handler.clone());
    let stderr_handle = collect_stream(stderr, LogStream::Stderr, run_config.stream_logs, handler);

    let status = if run_config.timeout_seconds > 0 {
        let timeout = Duration::from_secs(run_config.timeout_seconds);
        let start = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if start.elapsed() > timeout {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(RunnerError::Timeout(run_config.timeout_seconds));
                    }
                    std::thread::sleep(Duration::from_millis(100));
                }
                Err(e) => {
                    return Err(RunnerError::ExecutionFailed(format!(
                        "Failed to wait for process: {}",
                        e
                    )));
                }
            }
        }
    } else {
        child.wait().map_err(|e| {
            RunnerError::ExecutionFailed(format!("Failed to wait for process: {}", e))
        })?
    };

    let stdout_output = stdout_handle.join().unwrap_or_default();
    let stderr_output = stderr_handle.join().unwrap_or_default();

    Ok((status.code().unwrap_or(-1) as i64, stdout_output, stderr_output))
}

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn is_available(&self, program: &str) -> RunnerResult<bool> {
        let program = program.to_string();
        tokio::task::spawn_blocking(move || {
            Command::new(&program)
                .arg("version")
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map(|s| s.success())
                .unwrap_or(false)
        })
        .await
        .map_err(|e| RunnerError::ExecutionFailed(e.to_string()))
    }

    async fn run(
        &self,
        invocation: &Invocation,
        run_config: &RunConfig,
    ) -> RunnerResult<ExecutionResult> {
        debug!("Command: {}", invocation.command_line());

        if let Some(dir) = &invocation.working_dir {
            if !dir.is_dir() {
                return Err(RunnerError::InvalidWorkingDir(dir.display().to_string()));
            }
        }

        let started_at = Utc::now();
        let (exit_code, stdout, stderr) = {
            let invocation = invocation.clone();
            let run_config = run_config.clone();
            let handler = self.log_handler.clone();
            tokio::task::spawn_blocking(move || execute_blocking(&invocation, &run_config, handler))
                .await
                .map_err(|e| RunnerError::ExecutionFailed(e.to_string()))??
        };
        let finished_at = Utc::now();
        let duration_ms = (finished_at - started_at).num_milliseconds().max(0) as u64;

        if exit_code == 0 {
            info!("{} completed successfully in {}ms", invocation.program, duration_ms);
        } else {
            error!(
                "{} exited with code {} after {}ms",
                invocation.program, exit_code, duration_ms
            );
        }

        Ok(ExecutionResult {
            exit_code,
            stdout,
            stderr,
            started_at,
            finished_at,
            duration_ms,
        })
    }
}
