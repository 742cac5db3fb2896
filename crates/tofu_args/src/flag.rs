//! Flag primitives shared by every subcommand table.
//!
//! [`scalar_flag`] turns one input into at most one token and
//! [`repeatable_flag`] turns a comma-separated input into one token per
//! element. Neither escapes or quotes values.

use crate::warning::{unexpected_boolean, WarningSink};

/// How a scalar input is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// Bare `--name` switch, emitted only for `"true"`.
    Boolean,
    /// `--name=value` pair, emitted for any non-empty value.
    String,
}

/// Resolve a single input to a flag token.
///
/// `None` means no token. For [`ScalarKind::Boolean`] anything other than
/// `"true"`, `"false"` or a missing value is reported to `sink` and
/// dropped.
pub fn scalar_flag(
    name: &str,
    value: Option<&str>,
    kind: ScalarKind,
    sink: &dyn WarningSink,
) -> Option<String> {
    match kind {
        ScalarKind::Boolean => match value {
            None | Some("false") => None,
            Some("true") => Some(format!("--{}", name)),
            Some(other) => {
                sink.warn(&unexpected_boolean(name, other));
                None
            }
        },
        ScalarKind::String => value
            .filter(|v| !v.is_empty())
            .map(|v| format!("--{}={}", name, v)),
    }
}

/// Expand a comma-separated input into repeated `--name=<piece>` tokens.
///
/// Pieces are trimmed and kept in order. Commas cannot be escaped, and an
/// empty piece (`"a,,b"`) still yields a `--name=` token.
pub fn repeatable_flag(name: &str, value: Option<&str>) -> Vec<String> {
    match value {
        None | Some("") => Vec::new(),
        Some(raw) => raw
            .split(',')
            .map(|piece| format!("--{}={}", name, piece.trim()))
            .collect(),
    }
}
