//! Error types for argument construction inputs.

use thiserror::Error;

/// Result type alias for input handling.
pub type ArgsResult<T> = Result<T, ArgsError>;

/// Errors raised while assembling an input record.
///
/// Command construction itself never fails; these only cover reading
/// inputs from files or `key=value` overrides.
#[derive(Error, Debug)]
pub enum ArgsError {
    #[error("Invalid input assignment '{0}': expected key=value")]
    InvalidAssignment(String),

    #[error("Input '{key}' has a nested value; only scalars are supported")]
    NestedValue { key: String },

    #[error("Input file must contain a flat mapping")]
    NotAMapping,

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
