//! Error types used throughout the client

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::dependency::OperationKind;

/// Main error type for Mantle
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum MantleError {
    /// Network or timeout failure issuing a request. Surfaced, never retried
    /// at this layer.
    #[error("network error: {0}")]
    Network(String),

    /// HTTP status outside the expected success set for the current call.
    #[error("unexpected http status {got}: {context}")]
    UnexpectedStatus {
        /// Status code the server answered with.
        got: u16,
        /// What was being attempted when the status came back.
        context: String,
    },

    /// The digest handshake or bearer login did not yield a usable session.
    #[error("authentication error: {0}")]
    Auth(String),

    /// The shared management-status endpoint reported `failed`.
    #[error("managing dependency {dependency} : {version} failed: {message} ({kind})")]
    ManagementFailed {
        /// Dependency name the operation was issued for.
        dependency: String,
        /// Dependency version the operation was issued for.
        version: String,
        /// Whether the operation was an addition or a removal.
        kind: OperationKind,
        /// Message the status endpoint carried alongside the failure.
        message: String,
    },

    /// The poll budget was exhausted without reaching a terminal state.
    #[error("exceeded max poll attempts while managing dependency {dependency} : {version} ({kind})")]
    ManagementTimeout {
        /// Dependency name the operation was issued for.
        dependency: String,
        /// Dependency version the operation was issued for.
        version: String,
        /// Whether the operation was an addition or a removal.
        kind: OperationKind,
    },

    /// Response body is neither the expected shape nor a JSON document at all.
    #[error("decode error: {0}")]
    Decode(String),

    /// A named remote entity (app, service, function) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Client-side configuration problem.
    #[error("configuration error: {0}")]
    Config(String),

    /// Caller-supplied value violates a domain invariant.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Mantle operations
pub type Result<T> = std::result::Result<T, MantleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn management_failed_names_dependency_and_kind() {
        let err = MantleError::ManagementFailed {
            dependency: "uuidv1".to_string(),
            version: "1.6.14".to_string(),
            kind: OperationKind::Add,
            message: "registry unreachable".to_string(),
        };

        let rendered = err.to_string();
        assert!(rendered.contains("uuidv1"));
        assert!(rendered.contains("1.6.14"));
        assert!(rendered.contains("registry unreachable"));
        assert!(rendered.contains("add"));
    }

    #[test]
    fn unexpected_status_carries_code_and_context() {
        let err = MantleError::UnexpectedStatus {
            got: 500,
            context: "creating app services app demo".to_string(),
        };

        let rendered = err.to_string();
        assert!(rendered.contains("500"));
        assert!(rendered.contains("demo"));
    }
}
