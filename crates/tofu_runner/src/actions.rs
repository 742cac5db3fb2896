//! GitHub Actions workflow commands.
//!
//! Log groups, annotations and step outputs for runs inside a workflow.
//! Output writes are best effort for log lines; step outputs report
//! failures because downstream steps depend on them.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

use tofu_args::WarningSink;

use crate::error::{RunnerError, RunnerResult};

/// Environment variable naming the step output file.
pub const OUTPUT_FILE_ENV: &str = "GITHUB_OUTPUT";

/// Escape a command message.
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escape a command property value.
pub fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

/// Render `::command key=value,...::message`.
pub fn format_command(command: &str, properties: &[(&str, &str)], message: &str) -> String {
    let mut line = format!("::{}", command);
    if !properties.is_empty() {
        let props: Vec<String> = properties
            .iter()
            .map(|(k, v)| format!("{}={}", k, escape_property(v)))
            .collect();
        line.push(' ');
        line.push_str(&props.join(","));
    }
    line.push_str("::");
    line.push_str(&escape_data(message));
    line
}

/// Random delimiter for a `name<<DELIMITER` step output.
fn heredoc_delimiter() -> String {
    format!("ghadelimiter_{}", Uuid::new_v4())
}

/// Writes workflow commands and step outputs.
pub struct Actions {
    out: Mutex<Box<dyn Write + Send>>,
    output_file: Option<PathBuf>,
}

impl Actions {
    /// Write to stdout and the file named by `GITHUB_OUTPUT`, if set.
    pub fn from_env() -> Self {
        let output_file = std::env::var_os(OUTPUT_FILE_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::with_writer(std::io::stdout(), output_file)
    }

    pub fn with_writer(writer: impl Write + Send + 'static, output_file: Option<PathBuf>) -> Self {
        Self {
            out: Mutex::new(Box::new(writer)),
            output_file,
        }
    }

    fn write_line(&self, line: &str) {
        let mut out = self.out.lock();
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    }

    pub fn info(&self, message: &str) {
        self.write_line(message);
    }

    pub fn warning(&self, message: &str) {
        self.write_line(&format_command("warning", &[], message));
    }

    pub fn error(&self, message: &str) {
        self.write_line(&format_command("error", &[], message));
    }

    /// Open a collapsible log group; it closes when the guard drops.
    pub fn group(&self, name: &str) -> LogGroup<'_> {
        self.write_line(&format_command("group", &[], name));
        LogGroup { actions: self }
    }

    /// Publish a step output.
    pub fn set_output(&self, name: &str, value: &str) -> RunnerResult<()> {
        match &self.output_file {
            Some(path) => {
                let delimiter = heredoc_delimiter();
                if name.contains(&delimiter) || value.contains(&delimiter) {
                    return Err(RunnerError::Output(format!(
                        "output '{}' contains the heredoc delimiter",
                        name
                    )));
                }

                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                writeln!(file, "{}<<{}", name, delimiter)?;
                writeln!(file, "{}", value)?;
                writeln!(file, "{}", delimiter)?;
                debug!("Wrote step output '{}' to {:?}", name, path);
            }
            None => {
                self.write_line("");
                self.write_line(&format_command("set-output", &[("name", name)], value));
            }
        }
        Ok(())
    }
}

impl WarningSink for Actions {
    fn warn(&self, message: &str) {
        self.warning(message);
    }
}

/// Guard returned by [`Actions::group`].
pub struct LogGroup<'a> {
    actions: &'a Actions,
}

impl Drop for LogGroup<'_> {
    fn drop(&mut self) {
        self.actions.write_line("::endgroup::");
    }
}
