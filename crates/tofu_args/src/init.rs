//! `tofu init` flag table.

use crate::command::{Subcommand, TofuCommand};
use crate::record::InputRecord;
use crate::rules::{CommandBuilder, CommandSpec, FlagKind, FlagSpec};
use crate::warning::WarningSink;

use FlagKind::*;

/// Rule order for `init`. Values matching the tool's defaults
/// (`input`/`lock`/`backend`/`get` = `true`, `lock-timeout` = `0s`) are
/// left out.
pub const INIT_FLAGS: &[FlagSpec] = &[
    FlagSpec::named("input", ValueUnless("true")),
    FlagSpec::named("lock", ValueUnless("true")),
    FlagSpec::named("lock-timeout", ValueUnless("0s")),
    FlagSpec::named("no-color", Switch),
    FlagSpec::named("upgrade", Switch),
    FlagSpec::named("json", Switch),
    FlagSpec::named("var", Repeatable),
    FlagSpec::named("var-file", Repeatable),
    FlagSpec::named("from-module", Value),
    FlagSpec::named("backend", ValueUnless("true")),
    FlagSpec::named("backend-config", Repeatable),
    FlagSpec::named("reconfigure", Switch),
    FlagSpec::named("migrate-state", Switch),
    FlagSpec::named("force-copy", Switch),
    FlagSpec::named("get", ValueUnless("true")),
    FlagSpec::named("plugin-dir", Value),
    FlagSpec::named("lockfile", Value),
];

pub const INIT: CommandSpec = CommandSpec {
    subcommand: Subcommand::Init,
    flags: INIT_FLAGS,
};

/// Build `tofu init` from `record`.
pub fn build_init(record: &InputRecord, sink: &dyn WarningSink) -> TofuCommand {
    CommandBuilder::new().build(&INIT, record, sink)
}
