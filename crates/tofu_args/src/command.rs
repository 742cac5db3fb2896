//! Rendered commands.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Subcommands this crate can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subcommand {
    Init,
    Plan,
}

impl Subcommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Plan => "plan",
        }
    }
}

impl fmt::Display for Subcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fully built invocation.
///
/// The token list and the string form always agree: the string is the
/// tokens joined by single spaces, with no quoting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TofuCommand {
    /// Executable name, e.g. `tofu`
    pub program: String,
    /// Global options placed before the subcommand (`-chdir=...`)
    pub global_options: Vec<String>,
    pub subcommand: Subcommand,
    /// Subcommand flags in rule order
    pub flags: Vec<String>,
}

impl TofuCommand {
    /// Everything after the program name, ready for a process spawner.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.global_options.len() + 1 + self.flags.len());
        args.extend(self.global_options.iter().cloned());
        args.push(self.subcommand.as_str().to_string());
        args.extend(self.flags.iter().cloned());
        args
    }

    /// Full argument list including the program.
    pub fn tokens(&self) -> Vec<String> {
        let mut tokens = vec![self.program.clone()];
        tokens.extend(self.args());
        tokens
    }

    /// Space-joined command line.
    pub fn to_command_string(&self) -> String {
        self.tokens().join(" ")
    }

    /// Whether a flag token (`--name` or `--name=...`) is present.
    pub fn has_flag(&self, name: &str) -> bool {
        let bare = format!("--{}", name);
        let prefix = format!("--{}=", name);
        self.flags.iter().any(|f| *f == bare || f.starts_with(&prefix))
    }
}

impl fmt::Display for TofuCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_command_string())
    }
}
