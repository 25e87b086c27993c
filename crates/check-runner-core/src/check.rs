//! End-to-end check: probe with retries, then report.
//!
//! A run moves `INIT → PROBING → {REPORTED, WITHHELD, ABORTED}`. The terminal
//! state is returned as a [`Termination`] value; translating it into process
//! output and an exit code is left to the binary.

use serde::Serialize;
use tracing::Instrument;

use crate::codes::CanonicalCode;
use crate::config::RunnerConfig;
use crate::delay::Delay;
use crate::error::{CheckError, Result, RunnerError};
use crate::gateway::{report, Report, StatusPage};
use crate::obs;
use crate::probe::Probe;
use crate::runner::run_attempts;

/// Terminal state of a check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalState {
    /// A status update was sent.
    Reported,
    /// The outcome had no reportable status; nothing was sent.
    Withheld,
    /// The probe result could not be trusted; nothing was sent.
    Aborted,
    /// Configuration or status page error.
    Failed,
}

/// How the runner terminates: a canonical code plus a one-line message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Termination {
    pub state: TerminalState,
    pub code: CanonicalCode,
    pub message: String,
}

impl Termination {
    pub fn from_report(report: &Report) -> Self {
        match report {
            Report::Updated { component, status } => Self {
                state: TerminalState::Reported,
                code: CanonicalCode::Ok,
                message: format!("updated component {} with status {}", component, status),
            },
            Report::Withheld { .. } => Self {
                state: TerminalState::Withheld,
                code: CanonicalCode::Unknown,
                message: "no updates were sent to Cachet".to_string(),
            },
        }
    }

    pub fn aborted(error: &RunnerError) -> Self {
        Self {
            state: TerminalState::Aborted,
            code: CanonicalCode::Critical,
            message: error.to_string(),
        }
    }

    /// Hard failure outside the probing state machine.
    pub fn failed(error: &dyn std::fmt::Display) -> Self {
        Self {
            state: TerminalState::Failed,
            code: CanonicalCode::Critical,
            message: error.to_string(),
        }
    }

    /// Machine-parseable status line, e.g. `OK: updated component 3 with status 1`.
    pub fn line(&self) -> String {
        format!("{}: {}", self.code.name(), self.message)
    }

    pub fn exit_code(&self) -> i32 {
        self.code.exit_code()
    }
}

impl From<&CheckError> for Termination {
    fn from(error: &CheckError) -> Self {
        Self::failed(error)
    }
}

/// Drives a single check run.
pub struct CheckRunner;

impl CheckRunner {
    /// Probe according to the retry policy, then report the outcome.
    ///
    /// Returns `Ok` for the three terminal states of the state machine and
    /// `Err` only when the status page call fails.
    pub async fn run<P, D, S>(
        config: &RunnerConfig,
        probe: &P,
        delay: &D,
        status_page: &S,
    ) -> Result<Termination>
    where
        P: Probe + ?Sized,
        D: Delay + ?Sized,
        S: StatusPage + ?Sized,
    {
        Self::probe_and_report(config, probe, delay, status_page)
            .instrument(obs::run_span(config.component))
            .await
    }

    async fn probe_and_report<P, D, S>(
        config: &RunnerConfig,
        probe: &P,
        delay: &D,
        status_page: &S,
    ) -> Result<Termination>
    where
        P: Probe + ?Sized,
        D: Delay + ?Sized,
        S: StatusPage + ?Sized,
    {
        obs::emit_run_started(
            config.component,
            &config.probe.program,
            config.retry.budget(),
        );

        let outcome = match run_attempts(&config.retry, probe, delay).await {
            Ok(outcome) => outcome,
            Err(err) => {
                obs::emit_run_aborted(&err);
                return Ok(Termination::aborted(&err));
            }
        };

        let report = report(&outcome, config.component, status_page).await?;
        Ok(Termination::from_report(&report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CachetSettings, ComponentId, ProbeCommand, RetryPolicy};
    use crate::fakes::{RecordingDelay, RecordingStatusPage, ScriptedProbe};
    use crate::mapping::ComponentStatus;
    use std::time::Duration;

    fn config(retries: u32) -> RunnerConfig {
        RunnerConfig::new(
            ProbeCommand::new("check_service", vec![]).unwrap(),
            ComponentId(99),
            CachetSettings {
                base_url: "http://some.url".to_string(),
                api_key: "namaste".to_string(),
                timeout: Duration::from_secs(30),
            },
            RetryPolicy::new(retries, 0.5).unwrap(),
        )
    }

    #[test]
    fn test_termination_lines() {
        let reported = Termination::from_report(&Report::Updated {
            component: ComponentId(4),
            status: ComponentStatus::Operational,
        });
        assert_eq!(reported.line(), "OK: updated component 4 with status 1");
        assert_eq!(reported.exit_code(), 0);

        let withheld = Termination::from_report(&Report::Withheld {
            code: CanonicalCode::Unknown,
        });
        assert!(withheld.line().starts_with("UNKNOWN: "));
        assert_eq!(withheld.exit_code(), 3);
    }

    #[tokio::test]
    async fn test_reported_state() {
        let probe = ScriptedProbe::sequence([2, 0]);
        let delay = RecordingDelay::new();
        let page = RecordingStatusPage::new();

        let termination = CheckRunner::run(&config(2), &probe, &delay, &page)
            .await
            .unwrap();

        assert_eq!(termination.state, TerminalState::Reported);
        assert_eq!(termination.code, CanonicalCode::Ok);
        assert_eq!(
            page.updates(),
            vec![(ComponentId(99), ComponentStatus::Operational)]
        );
    }

    #[tokio::test]
    async fn test_aborted_state_skips_status_page() {
        let probe = ScriptedProbe::repeating(4);
        let delay = RecordingDelay::new();
        let page = RecordingStatusPage::new();

        let termination = CheckRunner::run(&config(5), &probe, &delay, &page)
            .await
            .unwrap();

        assert_eq!(termination.state, TerminalState::Aborted);
        assert_eq!(termination.code, CanonicalCode::Critical);
        assert!(termination.line().starts_with("CRITICAL: "));
        assert!(termination.message.contains("exit code 4"));
        assert_eq!(page.attempted(), 0);
        assert_eq!(probe.calls(), 1);
    }

    #[tokio::test]
    async fn test_status_page_error_is_returned() {
        let probe = ScriptedProbe::repeating(2);
        let delay = RecordingDelay::new();
        let page = RecordingStatusPage::failing();

        let err = CheckRunner::run(&config(0), &probe, &delay, &page)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckError::Gateway(_)));
        let termination = Termination::from(&err);
        assert_eq!(termination.state, TerminalState::Failed);
        assert_eq!(termination.code, CanonicalCode::Critical);
        assert!(termination.message.contains("status page unavailable"));
    }
}
