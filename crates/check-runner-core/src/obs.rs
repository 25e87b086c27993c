//! Structured observability hooks for the check lifecycle.
//!
//! Every run is wrapped in a span tagged with the component id (see
//! [`run_span`]); the `emit_*` helpers log the key transitions with a stable
//! `event` field so JSON logs can be filtered per stage.

use std::time::Duration;

use tracing::{debug, error, info, warn, Span};

use crate::codes::CanonicalCode;
use crate::config::ComponentId;
use crate::mapping::ComponentStatus;
use crate::runner::{Attempt, RunOutcome};

/// Span covering one invocation of the runner.
pub fn run_span(component: ComponentId) -> Span {
    tracing::info_span!("check_runner.run", component = %component)
}

pub fn emit_run_started(component: ComponentId, program: &str, budget: u32) {
    info!(
        event = "run.started",
        component = %component,
        program = %program,
        budget = budget,
    );
}

pub fn emit_attempt_started(index: u32, budget: u32) {
    info!(event = "attempt.started", attempt = index, budget = budget, "attempt n. {}", index);
}

/// Emit the result of a single attempt. Undecodable results are logged by
/// [`emit_run_aborted`] instead.
pub fn emit_attempt_finished(attempt: &Attempt) {
    match attempt.code {
        Some(code) => info!(
            event = "attempt.finished",
            attempt = attempt.index,
            raw = attempt.raw,
            code = %code,
            duration_ms = attempt.duration_ms,
            "probe return code is: {}, {}",
            code,
            attempt.raw,
        ),
        None => debug!(
            event = "attempt.finished",
            attempt = attempt.index,
            raw = attempt.raw,
            duration_ms = attempt.duration_ms,
        ),
    }
}

pub fn emit_retry_scheduled(next: u32, interval: Duration) {
    debug!(
        event = "attempt.retry_scheduled",
        next_attempt = next,
        interval_ms = interval.as_millis() as u64,
    );
}

pub fn emit_run_finished(outcome: &RunOutcome) {
    info!(
        event = "run.finished",
        code = %outcome.code,
        attempts = outcome.attempts,
        exhausted = outcome.exhausted,
    );
}

pub fn emit_component_updated(component: ComponentId, status: ComponentStatus) {
    info!(
        event = "component.updated",
        component = %component,
        status = status.as_i32(),
        "updated component {} with status {}",
        component,
        status,
    );
}

pub fn emit_update_withheld(component: ComponentId, code: CanonicalCode) {
    warn!(
        event = "update.withheld",
        component = %component,
        code = %code,
        "no updates were sent to Cachet",
    );
}

pub fn emit_run_aborted(error: &dyn std::fmt::Display) {
    error!(event = "run.aborted", error = %error);
}
