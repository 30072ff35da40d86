use std::fmt;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Passed,
    /// The step ran and rejected the file.
    Failed,
    TimedOut,
    /// The step could not be run (spawn error, transport error, bad template).
    Errored,
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutcomeStatus::Passed => "passed",
            OutcomeStatus::Failed => "failed",
            OutcomeStatus::TimedOut => "timed out",
            OutcomeStatus::Errored => "errored",
        })
    }
}

/// Result of one plugin step or custom validator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub status: OutcomeStatus,
    pub detail: String,
}

impl StepOutcome {
    pub fn passed(detail: impl Into<String>) -> Self {
        Self::new(OutcomeStatus::Passed, detail)
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self::new(OutcomeStatus::Failed, detail)
    }

    pub fn timed_out(detail: impl Into<String>) -> Self {
        Self::new(OutcomeStatus::TimedOut, detail)
    }

    pub fn errored(detail: impl Into<String>) -> Self {
        Self::new(OutcomeStatus::Errored, detail)
    }

    fn new(status: OutcomeStatus, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status == OutcomeStatus::Passed
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{}", self.status)
        } else {
            write!(f, "{}: {}", self.status, self.detail)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_passed_counts_as_passed() {
        assert!(StepOutcome::passed("ok").is_passed());
        assert!(!StepOutcome::failed("infected").is_passed());
        assert!(!StepOutcome::timed_out("5s").is_passed());
        assert!(!StepOutcome::errored("spawn").is_passed());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            StepOutcome::timed_out("after 5s").to_string(),
            "timed out: after 5s"
        );
        assert_eq!(StepOutcome::passed("").to_string(), "passed");
    }
}
