//! Mapping from canonical codes to Cachet component statuses.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codes::CanonicalCode;

/// Cachet component status vocabulary.
///
/// The integer values are Cachet's wire contract, not derived from
/// [`CanonicalCode`] ordinals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    Operational,
    PerformanceIssues,
    PartialOutage,
    MajorOutage,
}

impl ComponentStatus {
    pub const fn as_i32(self) -> i32 {
        match self {
            Self::Operational => 1,
            Self::PerformanceIssues => 2,
            Self::PartialOutage => 3,
            Self::MajorOutage => 4,
        }
    }
}

impl fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}

/// Status to file for a final probe code, or `None` to withhold the update.
///
/// UNKNOWN is never reported: the runner does not assert a status it cannot
/// substantiate. WARNING files a partial outage (3); earlier releases filed
/// it as a major outage (4).
pub const fn reportable_status(code: CanonicalCode) -> Option<ComponentStatus> {
    match code {
        CanonicalCode::Ok => Some(ComponentStatus::Operational),
        CanonicalCode::Warning => Some(ComponentStatus::PartialOutage),
        CanonicalCode::Critical => Some(ComponentStatus::MajorOutage),
        CanonicalCode::Unknown => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_table() {
        assert_eq!(
            reportable_status(CanonicalCode::Ok),
            Some(ComponentStatus::Operational)
        );
        assert_eq!(
            reportable_status(CanonicalCode::Warning),
            Some(ComponentStatus::PartialOutage)
        );
        assert_eq!(
            reportable_status(CanonicalCode::Critical),
            Some(ComponentStatus::MajorOutage)
        );
        assert_eq!(reportable_status(CanonicalCode::Unknown), None);
    }

    #[test]
    fn test_wire_values() {
        assert_eq!(ComponentStatus::Operational.as_i32(), 1);
        assert_eq!(ComponentStatus::PerformanceIssues.as_i32(), 2);
        assert_eq!(ComponentStatus::PartialOutage.as_i32(), 3);
        assert_eq!(ComponentStatus::MajorOutage.as_i32(), 4);
        assert_eq!(ComponentStatus::MajorOutage.to_string(), "4");
    }

    #[test]
    fn test_reportable_values_are_positive() {
        for code in CanonicalCode::ALL {
            if let Some(status) = reportable_status(code) {
                assert!(status.as_i32() > 0);
            }
        }
    }
}
