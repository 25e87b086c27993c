//! Check Runner CLI
//!
//! The `check-runner` command executes a Nagios-compatible probe, retrying
//! soft failures, and files the final result to a Cachet component.
//!
//! Exactly one line is printed on stdout, starting with the canonical code of
//! the runner's own exit status:
//!
//! - `OK` (0): the component was updated
//! - `UNKNOWN` (3): the probe result was UNKNOWN, no update was sent
//! - `CRITICAL` (2): incompatible probe, configuration or Cachet error

use std::path::PathBuf;

use anyhow::{Context, Result};
use cachet_client::{CachetClient, CachetConfig};
use check_runner_core::{
    init_tracing, level_for, CachetSettings, CheckRunner, CommandProbe, ComponentId,
    ProbeCommand, RetryPolicy, RunnerConfig, Termination, TokioDelay, DEFAULT_INTERVAL_SECS,
    DEFAULT_RETRIES,
};
use clap::Parser;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "check-runner")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Forwards the status of a service detected by a Nagios-compatible script to a Cachet component",
    long_about = None
)]
struct Cli {
    /// Path to the executable script which monitors a service and returns its status with Nagios exit codes
    script: String,

    /// Numerical id of the Cachet component
    component_id: u32,

    /// Path to the configuration file (INI with a [Cachet] section)
    config_file: PathBuf,

    /// Number of attempts to run if the first fails before a hard failure is filed to Cachet
    #[arg(long, default_value_t = DEFAULT_RETRIES)]
    retries: u32,

    /// Time (in seconds) between each attempt
    #[arg(long, default_value_t = DEFAULT_INTERVAL_SECS, value_parser = parse_interval)]
    interval: f64,

    /// Display debug messages
    #[arg(long)]
    debug: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,

    /// Arguments passed to the monitoring script; consumes every remaining argument
    #[arg(long = "script-args", num_args = 0.., allow_hyphen_values = true)]
    script_args: Vec<String>,
}

fn parse_interval(value: &str) -> std::result::Result<f64, String> {
    let secs: f64 = value
        .parse()
        .map_err(|_| format!("`{}` is not a number of seconds", value))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(format!("`{}` must be a finite, non-negative number", value));
    }
    Ok(secs)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.json, level_for(cli.debug));

    let termination = execute(cli).await;
    println!("{}", termination.line());
    std::process::exit(termination.exit_code());
}

/// Build the immutable run configuration. Fails before any probe runs.
fn build_config(cli: &Cli) -> Result<RunnerConfig> {
    let cachet = CachetSettings::load(&cli.config_file).with_context(|| {
        format!(
            "Invalid config file {:?}, use config.ini.dist as reference",
            cli.config_file
        )
    })?;
    let probe = ProbeCommand::new(cli.script.clone(), cli.script_args.clone())?;
    let retry = RetryPolicy::new(cli.retries, cli.interval)?;

    Ok(
        RunnerConfig::new(probe, ComponentId(cli.component_id), cachet, retry)
            .with_debug(cli.debug),
    )
}

async fn execute(cli: Cli) -> Termination {
    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(err) => return Termination::failed(&format!("{:#}", err)),
    };
    if config.debug {
        info!("debug logging enabled");
    }
    debug!(config = ?config, "configuration");

    let client = match CachetClient::new(CachetConfig::from(&config.cachet)) {
        Ok(client) => client,
        Err(err) => return Termination::failed(&err),
    };
    let probe = CommandProbe::new(config.probe.clone());

    match CheckRunner::run(&config, &probe, &TokioDelay, &client).await {
        Ok(termination) => termination,
        Err(err) => Termination::from(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use check_runner_core::{CanonicalCode, TerminalState};
    use std::path::Path;
    use tempfile::TempDir;

    fn write_config(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("config.ini");
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn valid_config(dir: &Path) -> PathBuf {
        write_config(
            dir,
            "[Cachet]\nbase-url: http://127.0.0.1:9/api/v1\napi-key: namaste\n",
        )
    }

    fn sh_cli(config_file: &Path, script: &str, retries: u32) -> Cli {
        let retries = retries.to_string();
        Cli::try_parse_from([
            "check-runner",
            "sh",
            "99",
            config_file.to_str().unwrap(),
            "--retries",
            retries.as_str(),
            "--interval",
            "0",
            "--script-args",
            "-c",
            script,
        ])
        .unwrap()
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["check-runner", "check_http", "7", "config.ini"]).unwrap();
        assert_eq!(cli.retries, 5);
        assert_eq!(cli.interval, 0.5);
        assert!(!cli.debug);
        assert!(cli.script_args.is_empty());
        assert_eq!(cli.component_id, 7);
    }

    #[test]
    fn test_script_args_consume_remaining_arguments() {
        let cli = Cli::try_parse_from([
            "check-runner",
            "check_http",
            "7",
            "config.ini",
            "--retries",
            "2",
            "--script-args",
            "https://example.org",
            "--timeout",
            "10",
        ])
        .unwrap();
        assert_eq!(cli.retries, 2);
        assert_eq!(
            cli.script_args,
            vec!["https://example.org", "--timeout", "10"]
        );
    }

    #[test]
    fn test_interval_parser() {
        assert_eq!(parse_interval("0.25"), Ok(0.25));
        assert_eq!(parse_interval("10"), Ok(10.0));
        assert!(parse_interval("-1").is_err());
        assert!(parse_interval("inf").is_err());
        assert!(parse_interval("soon").is_err());
    }

    #[test]
    fn test_component_id_must_be_numeric() {
        assert!(Cli::try_parse_from(["check-runner", "check_http", "abc", "config.ini"]).is_err());
    }

    #[test]
    fn test_debug_flag_reaches_runner_config() {
        let dir = TempDir::new().unwrap();
        let config = valid_config(dir.path());

        let quiet = build_config(&sh_cli(&config, "exit 0", 0)).unwrap();
        assert!(!quiet.debug);

        let mut cli = sh_cli(&config, "exit 0", 0);
        cli.debug = true;
        let verbose = build_config(&cli).unwrap();
        assert!(verbose.debug);
        assert_eq!(verbose.component, ComponentId(99));
    }

    #[tokio::test]
    async fn test_unknown_result_is_withheld() {
        let dir = TempDir::new().unwrap();
        let config = valid_config(dir.path());

        let termination = execute(sh_cli(&config, "exit 3", 0)).await;

        assert_eq!(termination.state, TerminalState::Withheld);
        assert_eq!(termination.exit_code(), CanonicalCode::Unknown.exit_code());
    }

    #[tokio::test]
    async fn test_incompatible_probe_is_hard_failure() {
        let dir = TempDir::new().unwrap();
        let config = valid_config(dir.path());

        let termination = execute(sh_cli(&config, "exit 4", 3)).await;

        assert_eq!(termination.state, TerminalState::Aborted);
        assert_eq!(termination.exit_code(), CanonicalCode::Critical.exit_code());
    }

    #[tokio::test]
    async fn test_missing_config_parameters_skip_probe() {
        for contents in [
            "[Cachet]\n",
            "[Cachet]\napi-key: baby\n",
            "[Cachet]\nbase-url: donthurtme\n",
        ] {
            let dir = TempDir::new().unwrap();
            let config = write_config(dir.path(), contents);
            let marker = dir.path().join("probe-ran");
            let script = format!("touch {}; exit 0", marker.display());

            let termination = execute(sh_cli(&config, &script, 0)).await;

            assert_eq!(termination.state, TerminalState::Failed);
            assert!(termination.line().starts_with("CRITICAL: "));
            assert!(termination.message.contains("missing mandatory parameter"));
            assert!(!marker.exists(), "probe must not run with invalid config");
        }
    }

    #[tokio::test]
    async fn test_unlaunchable_probe_is_hard_failure() {
        let dir = TempDir::new().unwrap();
        let config = valid_config(dir.path());
        let cli = Cli::try_parse_from([
            "check-runner",
            "/nonexistent/check-runner-probe",
            "1",
            config.to_str().unwrap(),
            "--retries",
            "0",
        ])
        .unwrap();

        let termination = execute(cli).await;

        assert_eq!(termination.state, TerminalState::Aborted);
        assert!(termination.message.contains("/nonexistent/check-runner-probe"));
    }
}
