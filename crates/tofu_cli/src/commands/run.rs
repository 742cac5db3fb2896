//! Shared `init`/`plan` flow: gather inputs, build, run, report.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde_json::json;
use tracing::{debug, info};

use tofu_args::{
    input_env_key, CommandBuilder, InputRecord, Subcommand, TofuCommand, TracingWarnings,
    WarningSink, DEFAULT_PROGRAM,
};
use tofu_runner::{Actions, ProcessRunner, RunConfig, SystemRunner, TofuExecutor, TofuOutcome};

use crate::config::ActionConfig;

/// Input naming the directory the tool is started in.
pub const WORKING_DIRECTORY_INPUT: &str = "working-directory";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Read inputs from INPUT_* environment variables (GitHub Actions)
    #[arg(long)]
    pub from_env: bool,

    /// YAML or JSON file with a flat mapping of inputs
    #[arg(short, long)]
    pub inputs: Option<PathBuf>,

    /// Set an input, e.g. --set var=region=eu-west-1 (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Directory to run the tool in (default: current directory)
    #[arg(short, long)]
    pub working_directory: Option<PathBuf>,

    /// Executable to run
    #[arg(long, env = "TOFU_ACTION_PROGRAM")]
    pub program: Option<String>,

    /// Kill the tool after this many seconds (0 = never)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Echo tool output while it runs
    #[arg(long)]
    pub stream: bool,

    /// Print the command without running it
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Merge inputs from file, environment and `--set`, later sources winning.
pub fn gather_inputs<F>(args: &RunArgs, subcommand: Subcommand, lookup: F) -> Result<InputRecord>
where
    F: Fn(&str) -> Option<String>,
{
    let mut record = InputRecord::new();

    if let Some(path) = &args.inputs {
        let from_file = InputRecord::from_file(path)
            .with_context(|| format!("Failed to load inputs from {:?}", path))?;
        record.merge(from_file);
    }

    if args.from_env {
        record.merge(InputRecord::from_lookup(subcommand.spec().input_names(), &lookup));
    }

    record.merge(InputRecord::from_assignments(&args.set)?);

    for (name, _) in record.iter() {
        if !subcommand.spec().recognizes(name) {
            debug!("Ignoring input '{}' not used by {}", name, subcommand);
        }
    }

    Ok(record)
}

/// Pick the working directory: flag, Actions input, config, then cwd.
pub fn resolve_working_dir<F>(args: &RunArgs, config: &ActionConfig, lookup: F) -> Result<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = &args.working_directory {
        return Ok(dir.clone());
    }
    if args.from_env {
        if let Some(dir) = lookup(&input_env_key(WORKING_DIRECTORY_INPUT))
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
        {
            return Ok(PathBuf::from(dir));
        }
    }
    if let Some(dir) = &config.working_directory {
        return Ok(dir.clone());
    }
    std::env::current_dir().context("Failed to determine current directory")
}

/// Whether tool output is echoed while it runs. JSON output keeps stdout
/// for the final document, so it never streams.
pub fn stream_output(args: &RunArgs, config: &ActionConfig) -> bool {
    args.format == OutputFormat::Text && (args.stream || config.stream_logs.unwrap_or(false))
}

/// Run `init` or `plan`. Returns whether the tool succeeded.
pub async fn execute(subcommand: Subcommand, args: RunArgs, config: &ActionConfig) -> Result<bool> {
    let lookup = |key: &str| std::env::var(key).ok();
    let ci = args.from_env || std::env::var("GITHUB_ACTIONS").map(|v| v == "true").unwrap_or(false);
    let actions = Actions::from_env();

    let record = gather_inputs(&args, subcommand, lookup)?;
    let program = args
        .program
        .clone()
        .or_else(|| config.program.clone())
        .unwrap_or_else(|| DEFAULT_PROGRAM.to_string());

    let sink: &dyn WarningSink = if ci { &actions } else { &TracingWarnings };
    let command = CommandBuilder::new()
        .program(program)
        .build(subcommand.spec(), &record, sink);

    if args.dry_run {
        print_command(&command, args.format)?;
        return Ok(true);
    }

    let working_dir = resolve_working_dir(&args, config, lookup)?;
    let stream = stream_output(&args, config);
    let runner: Arc<dyn ProcessRunner> = Arc::new(SystemRunner::new());
    let outcome = run_command(
        runner,
        ci.then_some(&actions),
        &command,
        config,
        &working_dir,
        run_config(&args, config, stream),
    )
    .await?;

    if ci {
        publish_outputs(&actions, subcommand, &outcome)?;
    }
    report(&actions, ci, subcommand, &outcome, args.format, stream)?;

    Ok(outcome.success())
}

fn run_config(args: &RunArgs, config: &ActionConfig, stream: bool) -> RunConfig {
    let run_config =
        RunConfig::default().timeout(args.timeout.or(config.timeout_seconds).unwrap_or(0));
    if stream {
        run_config.stream()
    } else {
        run_config
    }
}

/// Run the command, inside a log group when `actions` is given.
async fn run_command(
    runner: Arc<dyn ProcessRunner>,
    actions: Option<&Actions>,
    command: &TofuCommand,
    config: &ActionConfig,
    working_dir: &Path,
    run_config: RunConfig,
) -> Result<TofuOutcome> {
    let _group = actions.map(|a| a.group(&format!("tofu {}", command.subcommand)));

    let mut executor = TofuExecutor::new(runner).with_run_config(run_config);
    for (key, value) in &config.env {
        executor = executor.env(key, value);
    }

    executor.ensure_available(&command.program).await?;

    info!("Working directory: {:?}", working_dir);
    executor
        .execute(command, working_dir)
        .await
        .with_context(|| format!("Failed to run {}", command.program))
}

fn publish_outputs(actions: &Actions, subcommand: Subcommand, outcome: &TofuOutcome) -> Result<()> {
    actions.set_output(&format!("{}-output", subcommand), &outcome.stdout)?;
    actions.set_output("exitcode", &outcome.exit_code.to_string())?;
    if subcommand == Subcommand::Plan {
        actions.set_output("has-changes", &outcome.has_changes().to_string())?;
    }
    Ok(())
}

fn report(
    actions: &Actions,
    ci: bool,
    subcommand: Subcommand,
    outcome: &TofuOutcome,
    format: OutputFormat,
    streamed: bool,
) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    if !streamed {
        if !outcome.stdout.is_empty() {
            print!("{}", outcome.stdout);
        }
        if !outcome.stderr.is_empty() {
            eprint!("{}", outcome.stderr);
        }
    }

    let message = if outcome.success() {
        format!("tofu {} completed successfully.", subcommand)
    } else {
        format!("tofu {} failed with exit code {}", subcommand, outcome.exit_code)
    };

    match (ci, outcome.success()) {
        (true, true) => actions.info(&message),
        (true, false) => actions.error(&message),
        (false, true) => println!("✅ {}", message),
        (false, false) => eprintln!("❌ {}", message),
    }
    Ok(())
}

fn print_command(command: &TofuCommand, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}", command),
        OutputFormat::Json => {
            let value = json!({
                "command": command.to_command_string(),
                "tokens": command.tokens(),
                "subcommand": command.subcommand.as_str(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tofu_runner::{MockResponse, MockRunner, RunnerError};

    fn args() -> RunArgs {
        RunArgs {
            from_env: false,
            inputs: None,
            set: Vec::new(),
            working_directory: None,
            program: None,
            timeout: None,
            stream: false,
            dry_run: false,
            format: OutputFormat::Text,
        }
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_gather_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("inputs.yaml");
        std::fs::write(&file, "var: a=1\nupgrade: true\nlockTimeout: 30s\n").unwrap();

        let mut args = args();
        args.inputs = Some(file);
        args.from_env = true;
        args.set = vec!["lock-timeout=60s".to_string()];

        let record = gather_inputs(
            &args,
            Subcommand::Init,
            env(&[("INPUT_VAR", "b=2"), ("INPUT_UPGRADE", "")]),
        )
        .unwrap();

        assert_eq!(record.get("var"), Some("b=2"));
        assert_eq!(record.get("upgrade"), Some("true"));
        assert_eq!(record.get("lock-timeout"), Some("60s"));
    }

    #[test]
    fn test_env_ignored_without_flag() {
        let record =
            gather_inputs(&args(), Subcommand::Plan, env(&[("INPUT_DESTROY", "true")])).unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn test_env_reads_only_recognized_inputs() {
        let mut args = args();
        args.from_env = true;
        let record = gather_inputs(
            &args,
            Subcommand::Plan,
            env(&[("INPUT_DESTROY", "true"), ("INPUT_UPGRADE", "true")]),
        )
        .unwrap();

        assert_eq!(record.get("destroy"), Some("true"));
        assert!(!record.contains("upgrade"));
    }

    #[test]
    fn test_bad_assignment_is_error() {
        let mut args = args();
        args.set = vec!["novalue".to_string()];
        let err = gather_inputs(&args, Subcommand::Init, env(&[])).unwrap_err();
        assert!(err.downcast_ref::<tofu_args::ArgsError>().is_some());
    }

    #[test]
    fn test_stream_from_config_only() {
        let config = ActionConfig {
            stream_logs: Some(true),
            ..Default::default()
        };
        assert!(stream_output(&args(), &config));
        assert!(!stream_output(&args(), &ActionConfig::default()));

        let mut a = args();
        a.stream = true;
        assert!(stream_output(&a, &ActionConfig::default()));
    }

    #[test]
    fn test_json_format_never_streams() {
        let config = ActionConfig {
            stream_logs: Some(true),
            ..Default::default()
        };
        let mut a = args();
        a.stream = true;
        a.format = OutputFormat::Json;
        assert!(!stream_output(&a, &config));
    }

    fn init_command() -> TofuCommand {
        let record = InputRecord::new().with("upgrade", "true");
        CommandBuilder::new().build(Subcommand::Init.spec(), &record, &TracingWarnings)
    }

    #[tokio::test]
    async fn test_missing_program_fails_before_running() {
        let mock = MockRunner::new().set_available(false);
        let err = run_command(
            Arc::new(mock.clone()),
            None,
            &init_command(),
            &ActionConfig::default(),
            Path::new("."),
            RunConfig::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<RunnerError>(),
            Some(RunnerError::ProgramNotAvailable(p)) if p == "tofu"
        ));
        assert!(mock.get_method_calls("run").is_empty());
    }

    #[tokio::test]
    async fn test_run_command_applies_config() {
        let mock = MockRunner::new().add_response(MockResponse::success("done"));
        let config = ActionConfig {
            timeout_seconds: Some(900),
            env: [("TF_IN_AUTOMATION".to_string(), "1".to_string())].into_iter().collect(),
            ..Default::default()
        };

        let outcome = run_command(
            Arc::new(mock.clone()),
            None,
            &init_command(),
            &config,
            Path::new("."),
            run_config(&args(), &config, true),
        )
        .await
        .unwrap();

        assert!(outcome.success());
        let calls = mock.get_method_calls("run");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].timeout_seconds, Some(900));
        assert_eq!(
            calls[0].env.as_ref().and_then(|e| e.get("TF_IN_AUTOMATION")).map(String::as_str),
            Some("1")
        );
    }

    #[test]
    fn test_run_config_timeout_and_stream() {
        let config = ActionConfig {
            timeout_seconds: Some(900),
            ..Default::default()
        };
        let mut a = args();

        let rc = run_config(&a, &config, false);
        assert_eq!(rc.timeout_seconds, 900);
        assert!(!rc.stream_logs);

        a.timeout = Some(60);
        let rc = run_config(&a, &config, true);
        assert_eq!(rc.timeout_seconds, 60);
        assert!(rc.stream_logs);
    }

    #[tokio::test]
    async fn test_group_holds_only_tool_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stdout");
        let actions = Actions::with_writer(std::fs::File::create(&path).unwrap(), None);
        let mock = MockRunner::new().add_response(MockResponse::success("done"));

        run_command(
            Arc::new(mock),
            Some(&actions),
            &init_command(),
            &ActionConfig::default(),
            Path::new("."),
            RunConfig::default(),
        )
        .await
        .unwrap();

        // `Running: ...` is logged by the executor, not echoed into the group
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "::group::tofu init\n::endgroup::\n"
        );
    }

    #[test]
    fn test_working_dir_precedence() {
        let config = ActionConfig {
            working_directory: Some(PathBuf::from("from-config")),
            ..Default::default()
        };
        let lookup = env(&[("INPUT_WORKING-DIRECTORY", " from-env ")]);

        let mut a = args();
        assert_eq!(
            resolve_working_dir(&a, &config, &lookup).unwrap(),
            PathBuf::from("from-config")
        );

        a.from_env = true;
        assert_eq!(
            resolve_working_dir(&a, &config, &lookup).unwrap(),
            PathBuf::from("from-env")
        );

        a.working_directory = Some(PathBuf::from("from-flag"));
        assert_eq!(
            resolve_working_dir(&a, &config, &lookup).unwrap(),
            PathBuf::from("from-flag")
        );
    }
}
