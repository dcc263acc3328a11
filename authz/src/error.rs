//! Error types for the authorization system.
//!
//! A denial is not an error: it is returned as [`crate::types::Decision::Deny`]
//! and callers branch on it. The variants here cover malformed input that
//! never reaches the decision table.

use thiserror::Error;

/// Errors that can occur before an authorization decision is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
    /// A role string did not name one of the known roles.
    ///
    /// Upstream authentication should never produce this; it is surfaced as a
    /// client error rather than evaluated.
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    /// An action string did not name one of the known actions.
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// The caller did not supply a resource identifier.
    #[error("Resource ID is required")]
    MissingResource,
}

/// A specialized Result type for authorization operations.
pub type Result<T> = std::result::Result<T, AuthzError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthzError::InvalidRole("JANITOR".to_string());
        assert_eq!(err.to_string(), "Invalid role: JANITOR");

        let err = AuthzError::InvalidAction("PATCH".to_string());
        assert_eq!(err.to_string(), "Invalid action: PATCH");

        let err = AuthzError::MissingResource;
        assert_eq!(err.to_string(), "Resource ID is required");
    }
}
