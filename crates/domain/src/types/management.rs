//! Dependency management status
//!
//! The remote API exposes a single status channel per app, not one per
//! operation: it answers "is the most recent management operation done".
//! Status strings outside the documented set are tolerated and treated as
//! still pending, so API evolution never turns into a protocol error here.

use std::fmt;

/// Terminal or non-terminal state reported by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagementState {
    /// Work is still being applied.
    Pending,
    /// The most recent management operation completed.
    Successful,
    /// The most recent management operation failed; the status message says
    /// why.
    Failed,
    /// A status string this client does not know. Treated as pending.
    Other(String),
}

impl ManagementState {
    /// Map a raw status string onto a state. Unknown values are preserved for
    /// logging but behave exactly like `Pending`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pending" => Self::Pending,
            "successful" => Self::Successful,
            "failed" => Self::Failed,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether polling stops at this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Successful | Self::Failed)
    }
}

impl fmt::Display for ManagementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Successful => write!(f, "successful"),
            Self::Failed => write!(f, "failed"),
            Self::Other(raw) => write!(f, "{raw}"),
        }
    }
}

/// One read of the shared management-status endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagementStatus {
    /// Parsed state.
    pub state: ManagementState,
    /// Human-readable message from the remote system.
    pub message: String,
}

impl ManagementStatus {
    /// Build a status from the raw wire fields.
    pub fn from_wire(status: &str, message: impl Into<String>) -> Self {
        Self { state: ManagementState::parse(status), message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_documented_states() {
        assert_eq!(ManagementState::parse("pending"), ManagementState::Pending);
        assert_eq!(ManagementState::parse("successful"), ManagementState::Successful);
        assert_eq!(ManagementState::parse("failed"), ManagementState::Failed);
    }

    #[test]
    fn unknown_state_is_preserved_and_non_terminal() {
        let state = ManagementState::parse("installing");
        assert_eq!(state, ManagementState::Other("installing".to_string()));
        assert!(!state.is_terminal());
    }

    #[test]
    fn only_successful_and_failed_are_terminal() {
        assert!(ManagementState::Successful.is_terminal());
        assert!(ManagementState::Failed.is_terminal());
        assert!(!ManagementState::Pending.is_terminal());
    }
}
