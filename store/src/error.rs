use crate::validation::ValidationErrors;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} already exists: {id}")]
    Duplicate { kind: &'static str, id: String },

    /// Another user already holds this email address.
    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Other error: {0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::NotFound {
            kind: "Task",
            id: "t9".to_string(),
        };
        assert_eq!(err.to_string(), "Task not found: t9");

        let err = StoreError::Duplicate {
            kind: "User",
            id: "u1".to_string(),
        };
        assert_eq!(err.to_string(), "User already exists: u1");

        let err = StoreError::EmailTaken("a@example.com".to_string());
        assert_eq!(err.to_string(), "Email already registered: a@example.com");
    }
}
