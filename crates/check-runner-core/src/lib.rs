//! Check Runner Core
//!
//! Forwards the status of a service, as reported by a Nagios-compatible
//! probe, to a Cachet status page component.
//!
//! ## Flow
//!
//! ```text
//! run_attempts ──▶ Probe::run ──▶ CanonicalCode::classify
//!      │ (retry with Delay while non-OK and budget remains)
//!      ▼
//! RunOutcome ──▶ reportable_status ──▶ report ──▶ StatusPage::update_component
//!      │
//!      ▼
//! Termination (status line + exit code)
//! ```

pub mod check;
pub mod codes;
pub mod config;
pub mod delay;
pub mod error;
pub mod fakes;
pub mod gateway;
pub mod mapping;
pub mod obs;
pub mod probe;
pub mod runner;
pub mod telemetry;

pub use check::{CheckRunner, TerminalState, Termination};
pub use codes::CanonicalCode;
pub use config::{
    CachetSettings, ComponentId, ProbeCommand, RetryPolicy, RunnerConfig, DEFAULT_INTERVAL_SECS,
    DEFAULT_RETRIES,
};
pub use delay::{Delay, TokioDelay};
pub use error::{
    CheckError, ConfigError, GatewayError, IncompatibleProbeError, ProbeError, Result,
    RunnerError,
};
pub use gateway::{report, Report, StatusPage};
pub use mapping::{reportable_status, ComponentStatus};
pub use probe::{CommandProbe, Probe};
pub use runner::{run_attempts, Attempt, RunOutcome};
pub use telemetry::{init_tracing, level_for};

/// Check runner version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
