//! Diagnostic sink for non-fatal input problems.

use parking_lot::Mutex;
use tracing::warn;

/// Receives diagnostics raised while building a command.
///
/// Reporting is fire-and-forget: a sink must not fail or block command
/// construction.
#[cfg_attr(test, mockall::automock)]
pub trait WarningSink {
    fn warn(&self, message: &str);
}

impl<F> WarningSink for F
where
    F: Fn(&str),
{
    fn warn(&self, message: &str) {
        self(message)
    }
}

/// Forwards diagnostics to `tracing` at WARN level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingWarnings;

impl WarningSink for TracingWarnings {
    fn warn(&self, message: &str) {
        warn!("{}", message);
    }
}

/// Keeps every diagnostic for later inspection.
#[derive(Debug, Default)]
pub struct CollectedWarnings {
    messages: Mutex<Vec<String>>,
}

impl CollectedWarnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

impl WarningSink for CollectedWarnings {
    fn warn(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

/// Message reported for a boolean input that is neither `true` nor `false`.
pub fn unexpected_boolean(flag: &str, value: &str) -> String {
    format!("Unexpected value for boolean flag '{}': {}", flag, value)
}
