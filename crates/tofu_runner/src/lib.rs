//! # tofu_runner
//!
//! Process execution for OpenTofu commands built by `tofu_args`.
//!
//! # Features
//!
//! - **System Runner**: spawns the tool directly (no shell) with output capture,
//!   optional line streaming and timeouts
//! - **Exit Policies**: standard codes, or `plan -detailed-exitcode` where 2 means changes
//! - **CI Integration**: GitHub Actions log groups, annotations and step outputs
//! - **Mock Runner**: for testing without an OpenTofu installation
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use tofu_args::{build_plan, InputRecord, TracingWarnings};
//! use tofu_runner::{SystemRunner, TofuExecutor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let record = InputRecord::new().with("detailed-exitcode", "true");
//!     let cmd = build_plan(&record, &TracingWarnings);
//!
//!     let executor = TofuExecutor::new(Arc::new(SystemRunner::new()));
//!     let outcome = executor.execute(&cmd, Path::new("./infra")).await?;
//!     println!("changes pending: {}", outcome.has_changes());
//!
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod config;
pub mod error;
pub mod mock;
pub mod policy;
pub mod runner;
pub mod system;
pub mod tofu;

pub use actions::{Actions, LogGroup};
pub use config::{Invocation, RunConfig};
pub use error::{RunnerError, RunnerResult};
pub use mock::{CapturedCall, MockResponse, MockRunner};
pub use policy::{ExitPolicy, ExitStatus};
pub use runner::{ExecutionResult, ProcessRunner};
pub use system::{LogHandler, LogLine, LogStream, SystemRunner};
pub use tofu::{TofuExecutor, TofuOutcome};
