//! Nagios plugin exit codes and the classifier that decodes them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::IncompatibleProbeError;

/// The four-valued status convention shared by probes and the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CanonicalCode {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl CanonicalCode {
    /// Every code, in ordinal order.
    pub const ALL: [CanonicalCode; 4] = [
        CanonicalCode::Ok,
        CanonicalCode::Warning,
        CanonicalCode::Critical,
        CanonicalCode::Unknown,
    ];

    /// Decode a raw probe exit status.
    ///
    /// Only the exact ordinals 0..=3 are accepted; anything else is an
    /// [`IncompatibleProbeError`] carrying the offending value.
    pub fn classify(raw: i32) -> Result<Self, IncompatibleProbeError> {
        match raw {
            0 => Ok(Self::Ok),
            1 => Ok(Self::Warning),
            2 => Ok(Self::Critical),
            3 => Ok(Self::Unknown),
            _ => Err(IncompatibleProbeError { raw }),
        }
    }

    pub const fn ordinal(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::Warning => 1,
            Self::Critical => 2,
            Self::Unknown => 3,
        }
    }

    /// Process exit code used when the runner itself terminates with this code.
    pub const fn exit_code(self) -> i32 {
        self.ordinal()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

impl TryFrom<i32> for CanonicalCode {
    type Error = IncompatibleProbeError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        Self::classify(raw)
    }
}

impl fmt::Display for CanonicalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
