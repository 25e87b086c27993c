//! Retry/escalation loop.
//!
//! Non-OK results are soft failures while attempts remain: the loop waits
//! for the configured interval and runs the probe again. An OK result stops
//! the loop at once. When the budget is spent, the code of the last attempt
//! becomes the outcome; earlier attempts never influence it.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::codes::CanonicalCode;
use crate::config::RetryPolicy;
use crate::delay::Delay;
use crate::error::{IncompatibleProbeError, RunnerError};
use crate::obs;
use crate::probe::Probe;

/// One execution of the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Attempt {
    /// 1-based position in the run.
    pub index: u32,
    /// Exit status exactly as the probe returned it.
    pub raw: i32,
    /// Decoded code, `None` when the status is outside the convention.
    pub code: Option<CanonicalCode>,
    pub duration_ms: u64,
}

impl Attempt {
    pub fn observe(index: u32, raw: i32, elapsed: Duration) -> Self {
        Self {
            index,
            raw,
            code: CanonicalCode::classify(raw).ok(),
            duration_ms: elapsed.as_millis() as u64,
        }
    }

    pub fn classify(&self) -> Result<CanonicalCode, IncompatibleProbeError> {
        self.code.ok_or(IncompatibleProbeError { raw: self.raw })
    }
}

/// Final decision of a run, consumed by the reporting gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    /// Code selected for reporting.
    pub code: CanonicalCode,
    /// Attempts consumed.
    pub attempts: u32,
    /// `true` when the budget ran out without an OK result.
    pub exhausted: bool,
}

impl RunOutcome {
    /// Fold a finished attempt sequence into an outcome.
    ///
    /// The last attempt is authoritative. Returns `None` for an empty
    /// sequence or one whose last attempt could not be decoded.
    pub fn from_attempts(attempts: &[Attempt], budget: u32) -> Option<Self> {
        let last = attempts.last()?;
        let code = last.code?;
        Some(Self {
            code,
            attempts: attempts.len() as u32,
            exhausted: !code.is_ok() && attempts.len() as u32 >= budget,
        })
    }
}

/// Run the probe until it reports OK or the retry budget is spent.
///
/// The delay is applied only between attempts. An undecodable exit status
/// aborts the loop immediately regardless of the remaining budget.
pub async fn run_attempts<P, D>(
    policy: &RetryPolicy,
    probe: &P,
    delay: &D,
) -> Result<RunOutcome, RunnerError>
where
    P: Probe + ?Sized,
    D: Delay + ?Sized,
{
    let budget = policy.budget();
    let mut attempts: Vec<Attempt> = Vec::new();

    for index in 1..=budget {
        if index > 1 {
            obs::emit_retry_scheduled(index, policy.interval);
            delay.wait(policy.interval).await;
        }
        obs::emit_attempt_started(index, budget);

        let started = Instant::now();
        let raw = probe
            .run()
            .await
            .map_err(|source| RunnerError::Probe {
                attempt: index,
                source,
            })?;
        let attempt = Attempt::observe(index, raw, started.elapsed());
        obs::emit_attempt_finished(&attempt);
        attempts.push(attempt);

        let code = attempt
            .classify()
            .map_err(|source| RunnerError::IncompatibleProbe {
                attempt: index,
                source,
            })?;
        if code.is_ok() {
            break;
        }
    }

    let outcome = RunOutcome::from_attempts(&attempts, budget).ok_or(RunnerError::NoAttempts)?;
    obs::emit_run_finished(&outcome);
    Ok(outcome)
}
