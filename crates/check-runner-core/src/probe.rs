//! Probe invocation.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::config::ProbeCommand;
use crate::error::ProbeError;

/// Raw exit status reported when the probe was terminated by a signal.
pub const NO_EXIT_CODE: i32 = -1;

/// An external service check that terminates with a raw exit status.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Run the check to completion and return its raw exit status.
    async fn run(&self) -> Result<i32, ProbeError>;
}

/// Runs the probe as a child process, inheriting stdio.
///
/// No timeout is imposed here; the probe owns its own deadline.
#[derive(Debug, Clone)]
pub struct CommandProbe {
    command: ProbeCommand,
}

impl CommandProbe {
    pub fn new(command: ProbeCommand) -> Self {
        Self { command }
    }

    pub fn command(&self) -> &ProbeCommand {
        &self.command
    }
}

#[async_trait]
impl Probe for CommandProbe {
    async fn run(&self) -> Result<i32, ProbeError> {
        debug!(
            program = %self.command.program,
            args = ?self.command.args,
            "invocation arguments"
        );

        let status = Command::new(&self.command.program)
            .args(&self.command.args)
            .status()
            .await
            .map_err(|source| ProbeError::Spawn {
                program: self.command.program.clone(),
                source,
            })?;

        let raw = status.code().unwrap_or(NO_EXIT_CODE);
        debug!(raw, "execution completed, plugin exit code is {}", raw);
        Ok(raw)
    }
}
