//! Session gateway port
//!
//! Resolves a (client, user) pair into an active conversation session.

use agentdesk_domain::{ConversationSession, SessionRequest};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to a backend API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed with status {status}")]
    Status { status: u16, detail: Option<String> },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Timeout")]
    Timeout,
}

impl GatewayError {
    /// Human-readable detail supplied by the server, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            GatewayError::Status {
                detail: Some(detail),
                ..
            } => Some(detail),
            _ => None,
        }
    }

    /// Whether the request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            GatewayError::ConnectionError(_) | GatewayError::Timeout
        )
    }
}

/// Gateway for session bootstrap
///
/// Looks up the user under the client (creating it if needed) and returns
/// the session together with its stored message history.
#[async_trait]
pub trait SessionGateway: Send + Sync {
    async fn resolve_session(
        &self,
        request: &SessionRequest,
    ) -> Result<ConversationSession, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_only_for_status() {
        let err = GatewayError::Status {
            status: 404,
            detail: Some("Cliente no encontrado".to_string()),
        };
        assert_eq!(err.detail(), Some("Cliente no encontrado"));
        assert!(!err.is_transport());
        assert_eq!(GatewayError::Timeout.detail(), None);
        assert!(GatewayError::ConnectionError("refused".into()).is_transport());
    }
}
