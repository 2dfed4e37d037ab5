//! Error types for Atlas operations.

use thiserror::Error;

use crate::types::ProjectStatus;

/// Fallback shown when the store rejects a payload without an explanation.
pub const GENERIC_VALIDATION_MESSAGE: &str = "The request was rejected by the server";

/// Main error type for Atlas operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AtlasError {
    /// Target status equals the current one.
    #[error("Project is already {status}")]
    NoOpTransition { status: ProjectStatus },

    /// The transition policy does not offer this target.
    #[error("Transition from {from} to {to} is not allowed")]
    InvalidTransition {
        from: ProjectStatus,
        to: ProjectStatus,
    },

    /// Only completed projects can be acknowledged.
    #[error("Project is {status}, only completed projects can be acknowledged")]
    NotCompleted { status: ProjectStatus },

    /// The actor's role does not permit the action.
    #[error("Permission denied: {action}")]
    Forbidden { action: String },

    /// No valid session, or the store rejected the credential (401/403).
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound { resource_type: String, id: String },

    /// Local draft validation or a store-side 400-class rejection.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Network unreachable or timed out.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AtlasError {
    /// Builds a store-side validation error, keeping the server's text when present.
    pub fn rejected(message: impl Into<String>) -> Self {
        let message = message.into();
        let trimmed = message.trim();
        if trimmed.is_empty() {
            AtlasError::Validation(GENERIC_VALIDATION_MESSAGE.to_string())
        } else {
            AtlasError::Validation(trimmed.to_string())
        }
    }

    /// Returns true if re-triggering the same action may succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AtlasError::Connection(_))
    }

    /// Returns true if the session must be dropped and the actor sent to login.
    pub fn requires_login(&self) -> bool {
        matches!(self, AtlasError::Unauthorized(_))
    }

    /// Returns true for failures detected before any store call.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            AtlasError::NoOpTransition { .. }
                | AtlasError::InvalidTransition { .. }
                | AtlasError::NotCompleted { .. }
                | AtlasError::Forbidden { .. }
        )
    }
}

/// Convenience Result type for Atlas operations.
pub type Result<T> = std::result::Result<T, AtlasError>;

impl From<serde_json::Error> for AtlasError {
    fn from(err: serde_json::Error) -> Self {
        AtlasError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AtlasError {
    fn from(err: std::io::Error) -> Self {
        AtlasError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_keeps_server_text() {
        let err = AtlasError::rejected("  name must not be blank\n");
        assert_eq!(err, AtlasError::Validation("name must not be blank".into()));
    }

    #[test]
    fn test_rejected_falls_back_to_generic() {
        let err = AtlasError::rejected("");
        assert_eq!(
            err,
            AtlasError::Validation(GENERIC_VALIDATION_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_classification() {
        assert!(AtlasError::Connection("timed out".into()).is_recoverable());
        assert!(!AtlasError::Validation("x".into()).is_recoverable());
        assert!(AtlasError::Unauthorized("expired".into()).requires_login());
        assert!(AtlasError::NoOpTransition {
            status: ProjectStatus::UnderReview
        }
        .is_local());
        assert!(!AtlasError::Connection("x".into()).is_local());
    }
}
