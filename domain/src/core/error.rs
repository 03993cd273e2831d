//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Session has no conversation id")]
    MissingSessionId,

    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Client code cannot be empty")]
    EmptyClientCode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DomainError::MissingSessionId.to_string(),
            "Session has no conversation id"
        );
        assert_eq!(
            DomainError::EmptyUsername.to_string(),
            "Username cannot be empty"
        );
    }
}
