//! `tofu plan` flag table.
//!
//! Unlike `init`, `refresh`, `input` and `lock` are only ever rendered in
//! their `=false` form; any other value is the tool default and dropped.
//! `destroy` and `refresh-only` are independent switches here even though
//! the tool treats them as exclusive modes.

use crate::command::{Subcommand, TofuCommand};
use crate::record::InputRecord;
use crate::rules::{CommandBuilder, CommandSpec, FlagKind, FlagSpec};
use crate::warning::WarningSink;

use FlagKind::*;

/// Input that switches the run to detailed exit codes.
pub const DETAILED_EXITCODE_INPUT: &str = "detailed-exitcode";

pub const PLAN_FLAGS: &[FlagSpec] = &[
    FlagSpec::named("destroy", Switch),
    FlagSpec::named("refresh-only", Switch),
    FlagSpec::named("refresh", FalseOnly),
    FlagSpec::named("replace", Repeatable),
    FlagSpec::named("target", Repeatable),
    FlagSpec::named("target-file", Value),
    FlagSpec::named("exclude", Repeatable),
    FlagSpec::named("exclude-file", Value),
    FlagSpec::named("var", Repeatable),
    FlagSpec::named("var-file", Repeatable),
    FlagSpec::named("compact-warnings", Switch),
    FlagSpec::named(DETAILED_EXITCODE_INPUT, Switch),
    FlagSpec::named("generate-config-out", Value),
    FlagSpec::named("input", FalseOnly),
    FlagSpec::named("json", Switch),
    FlagSpec::named("lock", FalseOnly),
    FlagSpec::named("lock-timeout", ValueUnless("0s")),
    FlagSpec::named("no-color", Switch),
    FlagSpec::named("concise", Switch),
    FlagSpec::named("out", Value),
    FlagSpec::named("parallelism", ValueUnless("10")),
    FlagSpec::named("state", Value),
    FlagSpec::named("show-sensitive", Switch),
];

pub const PLAN: CommandSpec = CommandSpec {
    subcommand: Subcommand::Plan,
    flags: PLAN_FLAGS,
};

/// Build `tofu plan` from `record`.
pub fn build_plan(record: &InputRecord, sink: &dyn WarningSink) -> TofuCommand {
    CommandBuilder::new().build(&PLAN, record, sink)
}
