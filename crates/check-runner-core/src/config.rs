//! Runner configuration: probe command, retry policy and Cachet settings.
//!
//! The Cachet endpoint and credential come from an INI file with a
//! `[Cachet]` section. Both `key = value` and `key: value` are accepted:
//!
//! ```ini
//! [Cachet]
//! base-url: https://status.example.org/api/v1
//! api-key: secret
//! ; optional, seconds
//! timeout-secs = 30
//! ```

use std::fmt;
use std::path::Path;
use std::time::Duration;

use ini::{Ini, Properties};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::ConfigError;

pub const DEFAULT_RETRIES: u32 = 5;
pub const DEFAULT_INTERVAL_SECS: f64 = 0.5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Numerical id of a Cachet component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub u32);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How many times to re-run a failing probe and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Re-attempts after the first run (0 = run once).
    pub retries: u32,
    /// Delay applied between two consecutive attempts.
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            interval: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Build a policy from a retry count and an interval in (fractional) seconds.
    pub fn new(retries: u32, interval_secs: f64) -> Result<Self, ConfigError> {
        if !interval_secs.is_finite() || interval_secs < 0.0 {
            return Err(ConfigError::InvalidInterval(interval_secs));
        }
        Ok(Self {
            retries,
            interval: Duration::from_secs_f64(interval_secs),
        })
    }

    /// Total number of attempts: the first one plus `retries`.
    pub fn budget(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

/// Probe executable plus the arguments forwarded to it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ProbeCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Result<Self, ConfigError> {
        let program = program.into();
        if program.trim().is_empty() {
            return Err(ConfigError::EmptyProbeCommand);
        }
        Ok(Self { program, args })
    }
}

/// Cachet API parameters read from the configuration file.
#[derive(Clone, PartialEq, Eq)]
pub struct CachetSettings {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl fmt::Debug for CachetSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachetSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

const CACHET_SECTION: &str = "Cachet";

impl CachetSettings {
    /// Load and validate the `[Cachet]` section of a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let section = ini.section(Some(CACHET_SECTION));

        let base_url = value_of(section, "base-url");
        let api_key = value_of(section, "api-key");

        let mut missing = Vec::new();
        if base_url.is_none() {
            missing.push("base-url");
        }
        if api_key.is_none() {
            missing.push("api-key");
        }

        match (base_url, api_key) {
            (Some(base_url), Some(api_key)) => {
                let timeout = match value_of(section, "timeout-secs") {
                    Some(raw) => raw
                        .parse::<u64>()
                        .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?,
                    None => DEFAULT_TIMEOUT_SECS,
                };
                info!(base_url = %base_url, "configuration parameters loaded");
                Ok(Self {
                    base_url,
                    api_key,
                    timeout: Duration::from_secs(timeout),
                })
            }
            _ => {
                error!(missing = ?missing, "one or both mandatory config parameters are missing");
                Err(ConfigError::MissingParameters { missing })
            }
        }
    }
}

/// Trimmed value of `key`; absent and blank values are both `None`.
fn value_of(section: Option<&Properties>, key: &str) -> Option<String> {
    section
        .and_then(|props| props.get(key))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Immutable inputs for one invocation of the runner.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub probe: ProbeCommand,
    pub component: ComponentId,
    pub cachet: CachetSettings,
    pub retry: RetryPolicy,
    pub debug: bool,
}

impl RunnerConfig {
    pub fn new(
        probe: ProbeCommand,
        component: ComponentId,
        cachet: CachetSettings,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            probe,
            component,
            cachet,
            retry,
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
