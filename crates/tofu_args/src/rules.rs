//! Ordered rule engine.
//!
//! A subcommand is described by a static [`CommandSpec`]: its name and an
//! ordered table of [`FlagSpec`] entries. [`CommandBuilder`] walks the table
//! top to bottom, so output order is the table order and never the order
//! inputs were supplied in.

use tracing::debug;

use crate::command::{Subcommand, TofuCommand};
use crate::flag::{repeatable_flag, scalar_flag, ScalarKind};
use crate::record::{canonical_name, InputRecord};
use crate::warning::WarningSink;

/// Input holding the working directory passed as the global `-chdir` option.
pub const CHDIR_INPUT: &str = "chdir";

/// Default executable.
pub const DEFAULT_PROGRAM: &str = "tofu";

/// Rendering rule for one recognized input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// Bare switch when the value is `"true"`.
    Switch,
    /// `--flag=value` for any non-empty value.
    Value,
    /// Like [`FlagKind::Value`], but dropped when the value equals the
    /// tool's own default.
    ValueUnless(&'static str),
    /// One `--flag=piece` per comma-separated piece.
    Repeatable,
    /// Literal `--flag=false`, only when the value is exactly `"false"`.
    FalseOnly,
}

/// One row of a subcommand table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSpec {
    /// Name in the input record
    pub input: &'static str,
    /// Flag name on the command line, without dashes
    pub flag: &'static str,
    pub kind: FlagKind,
}

impl FlagSpec {
    pub const fn new(input: &'static str, flag: &'static str, kind: FlagKind) -> Self {
        Self { input, flag, kind }
    }

    /// Shorthand for the common case where input and flag share a name.
    pub const fn named(name: &'static str, kind: FlagKind) -> Self {
        Self::new(name, name, kind)
    }

    /// Render this rule against a record.
    pub fn render(&self, record: &InputRecord, sink: &dyn WarningSink) -> Vec<String> {
        let value = record.get(self.input);
        match self.kind {
            FlagKind::Switch => scalar_flag(self.flag, value, ScalarKind::Boolean, sink)
                .into_iter()
                .collect(),
            FlagKind::Value => scalar_flag(self.flag, value, ScalarKind::String, sink)
                .into_iter()
                .collect(),
            FlagKind::ValueUnless(default) => value
                .filter(|v| *v != default)
                .and_then(|v| scalar_flag(self.flag, Some(v), ScalarKind::String, sink))
                .into_iter()
                .collect(),
            FlagKind::Repeatable => repeatable_flag(self.flag, value),
            FlagKind::FalseOnly => match value {
                Some("false") => vec![format!("--{}=false", self.flag)],
                _ => Vec::new(),
            },
        }
    }
}

/// Static description of a subcommand.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub subcommand: Subcommand,
    pub flags: &'static [FlagSpec],
}

impl CommandSpec {
    /// Every input name this subcommand reads, `chdir` included.
    pub fn input_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(CHDIR_INPUT).chain(self.flags.iter().map(|f| f.input))
    }

    pub fn recognizes(&self, input: &str) -> bool {
        let input = canonical_name(input);
        self.input_names().any(|name| canonical_name(name) == input)
    }
}

impl Subcommand {
    /// Flag table for this subcommand.
    pub fn spec(&self) -> &'static CommandSpec {
        match self {
            Self::Init => &crate::init::INIT,
            Self::Plan => &crate::plan::PLAN,
        }
    }
}

/// Applies a [`CommandSpec`] to an [`InputRecord`].
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    program: String,
}

impl Default for CommandBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBuilder {
    pub fn new() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
        }
    }

    /// Use a different executable, e.g. `terraform`.
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Build the command described by `spec`.
    ///
    /// Unrecognized inputs are ignored. Malformed boolean values are
    /// reported to `sink` and otherwise skipped; building never fails.
    pub fn build(
        &self,
        spec: &CommandSpec,
        record: &InputRecord,
        sink: &dyn WarningSink,
    ) -> TofuCommand {
        let global_options = record
            .get(CHDIR_INPUT)
            .map(|dir| vec![format!("-chdir={}", dir)])
            .unwrap_or_default();

        let flags: Vec<String> = spec
            .flags
            .iter()
            .flat_map(|rule| rule.render(record, sink))
            .filter(|token| !token.is_empty())
            .collect();

        debug!(
            "Built {} command with {} flag(s)",
            spec.subcommand,
            flags.len()
        );

        TofuCommand {
            program: self.program.clone(),
            global_options,
            subcommand: spec.subcommand,
            flags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warning::CollectedWarnings;

    const TABLE: &[FlagSpec] = &[
        FlagSpec::named("b", FlagKind::Switch),
        FlagSpec::new("aValue", "a", FlagKind::Value),
        FlagSpec::named("limit", FlagKind::ValueUnless("10")),
        FlagSpec::named("list", FlagKind::Repeatable),
        FlagSpec::named("refresh", FlagKind::FalseOnly),
    ];

    const SPEC: CommandSpec = CommandSpec {
        subcommand: Subcommand::Plan,
        flags: TABLE,
    };

    #[test]
    fn test_table_order_wins_over_record_order() {
        let record = InputRecord::new()
            .with("refresh", "false")
            .with("list", "x,y")
            .with("limit", "3")
            .with("a-value", "v")
            .with("b", "true");
        let sink = CollectedWarnings::new();

        let cmd = CommandBuilder::new().build(&SPEC, &record, &sink);

        assert_eq!(
            cmd.flags,
            vec!["--b", "--a=v", "--limit=3", "--list=x", "--list=y", "--refresh=false"]
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn test_value_unless_default() {
        let sink = CollectedWarnings::new();
        let rule = FlagSpec::named("limit", FlagKind::ValueUnless("10"));
        assert!(rule.render(&InputRecord::new().with("limit", "10"), &sink).is_empty());
        assert!(rule.render(&InputRecord::new(), &sink).is_empty());
        assert_eq!(
            rule.render(&InputRecord::new().with("limit", "11"), &sink),
            vec!["--limit=11"]
        );
    }

    #[test]
    fn test_false_only() {
        let sink = CollectedWarnings::new();
        let rule = FlagSpec::named("refresh", FlagKind::FalseOnly);
        for value in ["true", "no", "FALSE"] {
            assert!(rule.render(&InputRecord::new().with("refresh", value), &sink).is_empty());
        }
        assert_eq!(
            rule.render(&InputRecord::new().with("refresh", "false"), &sink),
            vec!["--refresh=false"]
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn test_custom_program() {
        let sink = CollectedWarnings::new();
        let cmd = CommandBuilder::new()
            .program("terraform")
            .build(&SPEC, &InputRecord::new().with("chdir", "dir"), &sink);
        assert_eq!(cmd.to_command_string(), "terraform -chdir=dir plan");
    }

    #[test]
    fn test_recognizes() {
        assert!(SPEC.recognizes("chdir"));
        assert!(SPEC.recognizes("aValue"));
        assert!(!SPEC.recognizes("a"));
    }
}
