//! Error taxonomy for the check runner.

use std::path::PathBuf;

use crate::config::ComponentId;

/// Errors produced while assembling a [`RunnerConfig`](crate::RunnerConfig).
///
/// All of these are raised before the first probe attempt.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ini::ParseError,
    },

    #[error("timeout-secs must be a whole number of seconds, got {0:?}")]
    InvalidTimeout(String),

    #[error(
        "invalid configuration, missing mandatory parameter(s): {}",
        .missing.join(", ")
    )]
    MissingParameters { missing: Vec<&'static str> },

    #[error("interval must be a finite, non-negative number of seconds, got {0}")]
    InvalidInterval(f64),

    #[error("probe command must not be empty")]
    EmptyProbeCommand,
}

/// A probe terminated with an exit status outside the Nagios convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("probe exit code {raw} is not compatible with Nagios standards")]
pub struct IncompatibleProbeError {
    pub raw: i32,
}

/// Errors raised by a [`Probe`](crate::Probe) implementation.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("failed to launch probe {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that abort the retry loop before its budget is spent.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("attempt {attempt}: {source}")]
    IncompatibleProbe {
        attempt: u32,
        #[source]
        source: IncompatibleProbeError,
    },

    #[error("attempt {attempt}: {source}")]
    Probe {
        attempt: u32,
        #[source]
        source: ProbeError,
    },

    #[error("no decodable attempt was recorded")]
    NoAttempts,
}

/// Errors surfaced by the reporting gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("status page update for component {component} failed: {source}")]
    StatusPage {
        component: ComponentId,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Top-level error for a check run.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Result type for check runner operations.
pub type Result<T> = std::result::Result<T, CheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameters_lists_every_key() {
        let err = ConfigError::MissingParameters {
            missing: vec!["base-url", "api-key"],
        };
        let msg = err.to_string();
        assert!(msg.contains("base-url, api-key"));
        assert!(msg.starts_with("invalid configuration"));
    }

    #[test]
    fn test_incompatible_probe_display() {
        let err = RunnerError::IncompatibleProbe {
            attempt: 3,
            source: IncompatibleProbeError { raw: 4 },
        };
        let msg = err.to_string();
        assert!(msg.contains("attempt 3"));
        assert!(msg.contains("exit code 4"));
    }

    #[test]
    fn test_gateway_error_keeps_source() {
        let source: Box<dyn std::error::Error + Send + Sync> = "connection refused".into();
        let err = GatewayError::StatusPage {
            component: ComponentId(7),
            source,
        };
        assert!(err.to_string().contains("component 7"));
        assert!(err.to_string().contains("connection refused"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
