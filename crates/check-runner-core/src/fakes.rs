//! In-memory fakes for the probe, delay and status page seams (testing only).
//!
//! Provides `ScriptedProbe`, `RecordingDelay` and `RecordingStatusPage`, which
//! record every call so tests can assert on invocation counts and arguments.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::ComponentId;
use crate::delay::Delay;
use crate::error::ProbeError;
use crate::gateway::StatusPage;
use crate::mapping::ComponentStatus;
use crate::probe::Probe;

// ---------------------------------------------------------------------------
// ScriptedProbe
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum Script {
    Sequence(VecDeque<i32>),
    Repeat(i32),
    Unlaunchable(String),
}

/// Probe that replays a fixed list of raw exit statuses.
///
/// Once a sequence is exhausted its last value is repeated.
#[derive(Debug)]
pub struct ScriptedProbe {
    script: Mutex<Script>,
    last: Mutex<Option<i32>>,
    calls: Mutex<u32>,
}

impl ScriptedProbe {
    fn with_script(script: Script) -> Self {
        Self {
            script: Mutex::new(script),
            last: Mutex::new(None),
            calls: Mutex::new(0),
        }
    }

    pub fn sequence(raw: impl IntoIterator<Item = i32>) -> Self {
        Self::with_script(Script::Sequence(raw.into_iter().collect()))
    }

    pub fn repeating(raw: i32) -> Self {
        Self::with_script(Script::Repeat(raw))
    }

    /// Probe whose executable cannot be launched.
    pub fn unlaunchable(program: &str) -> Self {
        Self::with_script(Script::Unlaunchable(program.to_string()))
    }

    /// Number of times the probe was invoked.
    pub fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Probe for ScriptedProbe {
    async fn run(&self) -> Result<i32, ProbeError> {
        *self.calls.lock().unwrap() += 1;
        let mut script = self.script.lock().unwrap();
        let mut last = self.last.lock().unwrap();
        let raw = match &mut *script {
            Script::Sequence(queue) => queue
                .pop_front()
                .or(*last)
                .expect("ScriptedProbe sequence must not be empty"),
            Script::Repeat(raw) => *raw,
            Script::Unlaunchable(program) => {
                return Err(ProbeError::Spawn {
                    program: program.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                })
            }
        };
        *last = Some(raw);
        Ok(raw)
    }
}

// ---------------------------------------------------------------------------
// RecordingDelay
// ---------------------------------------------------------------------------

/// Delay that returns immediately and records every requested interval.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    calls: Mutex<Vec<Duration>>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Duration> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Delay for RecordingDelay {
    async fn wait(&self, interval: Duration) {
        self.calls.lock().unwrap().push(interval);
    }
}

// ---------------------------------------------------------------------------
// RecordingStatusPage
// ---------------------------------------------------------------------------

/// Error returned by a failing [`RecordingStatusPage`].
#[derive(Debug, thiserror::Error)]
#[error("status page unavailable")]
pub struct StatusPageUnavailable;

/// Status page that records successful updates, or fails every call.
#[derive(Debug, Default)]
pub struct RecordingStatusPage {
    updates: Mutex<Vec<(ComponentId, ComponentStatus)>>,
    attempted: Mutex<u32>,
    fail: bool,
}

impl RecordingStatusPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Updates accepted so far.
    pub fn updates(&self) -> Vec<(ComponentId, ComponentStatus)> {
        self.updates.lock().unwrap().clone()
    }

    /// Update calls received, including failed ones.
    pub fn attempted(&self) -> u32 {
        *self.attempted.lock().unwrap()
    }
}

#[async_trait]
impl StatusPage for RecordingStatusPage {
    type Error = StatusPageUnavailable;

    async fn update_component(
        &self,
        component: ComponentId,
        status: ComponentStatus,
    ) -> Result<(), Self::Error> {
        *self.attempted.lock().unwrap() += 1;
        if self.fail {
            return Err(StatusPageUnavailable);
        }
        self.updates.lock().unwrap().push((component, status));
        Ok(())
    }
}
