//! # tofu_args
//!
//! Translates a flat record of named inputs into an ordered OpenTofu
//! `init` or `plan` invocation.
//!
//! Each subcommand is a static, ordered table of flag rules. The same
//! engine applies either table, so token order is fixed by the table and
//! values equal to the tool's own defaults are left out.
//!
//! ## Features
//!
//! - Kebab/camel/snake-case input names resolve to the same input
//! - Boolean switches, `--flag=value` pairs and comma-separated repeatable flags
//! - Default suppression (`lock-timeout=0s`, `parallelism=10`, ...)
//! - Injected warning sink for malformed boolean inputs
//!
//! ## Example
//!
//! ```rust
//! use tofu_args::{build_plan, InputRecord, TracingWarnings};
//!
//! let record = InputRecord::new()
//!     .with("chdir", "./infra")
//!     .with("var", "region=eu-west-1, env=prod")
//!     .with("parallelism", "10");
//!
//! let cmd = build_plan(&record, &TracingWarnings);
//! assert_eq!(
//!     cmd.to_command_string(),
//!     "tofu -chdir=./infra plan --var=region=eu-west-1 --var=env=prod"
//! );
//! ```

pub mod command;
pub mod error;
pub mod flag;
pub mod init;
pub mod plan;
pub mod record;
pub mod rules;
pub mod warning;

pub use command::{Subcommand, TofuCommand};
pub use error::{ArgsError, ArgsResult};
pub use flag::{repeatable_flag, scalar_flag, ScalarKind};
pub use init::{build_init, INIT, INIT_FLAGS};
pub use plan::{build_plan, DETAILED_EXITCODE_INPUT, PLAN, PLAN_FLAGS};
pub use record::{canonical_name, input_env_key, InputRecord};
pub use rules::{CommandBuilder, CommandSpec, FlagKind, FlagSpec, CHDIR_INPUT, DEFAULT_PROGRAM};
pub use warning::{CollectedWarnings, TracingWarnings, WarningSink};
