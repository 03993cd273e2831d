//! Bootstrap Session use case.
//!
//! Resolves a (client, user) pair into an active conversation session by
//! calling the session gateway. Input is validated before any network call.

use crate::ports::session_gateway::{GatewayError, SessionGateway};
use agentdesk_domain::{ConversationSession, DomainError, SessionRequest};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Message shown when the server gives no detail.
pub const GENERIC_BOOTSTRAP_ERROR: &str = "could not start the chat session";

/// Errors that can occur while bootstrapping a session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BootstrapError {
    #[error("a client and a username must be selected")]
    Validation(#[from] DomainError),

    #[error("{}", .0.detail().unwrap_or(GENERIC_BOOTSTRAP_ERROR))]
    Gateway(#[from] GatewayError),
}

/// Use case for starting a chat session.
#[derive(Clone)]
pub struct BootstrapSessionUseCase {
    gateway: Arc<dyn SessionGateway>,
}

impl BootstrapSessionUseCase {
    pub fn new(gateway: Arc<dyn SessionGateway>) -> Self {
        Self { gateway }
    }

    /// Validate the selection and resolve the session.
    ///
    /// The returned session's message sequence is exactly the server's
    /// history, in the order it was returned.
    pub async fn execute(
        &self,
        username: &str,
        client_code: &str,
    ) -> Result<ConversationSession, BootstrapError> {
        let request = SessionRequest::new(username, client_code)?;
        debug!(
            "Resolving session for {}@{}",
            request.username(),
            request.client_code()
        );

        match self.gateway.resolve_session(&request).await {
            Ok(session) => {
                info!(
                    "Session {} ready for {} ({} stored messages)",
                    session.session_id(),
                    session.username(),
                    session.messages().len()
                );
                Ok(session)
            }
            Err(e) => {
                warn!("Session bootstrap failed: {}", e);
                Err(BootstrapError::Gateway(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentdesk_domain::{ClientRef, Message, MessageId, Role};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeGateway {
        result: Result<Vec<Message>, GatewayError>,
        calls: Mutex<Vec<SessionRequest>>,
    }

    impl FakeGateway {
        fn ok(history: Vec<Message>) -> Self {
            Self {
                result: Ok(history),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(error: GatewayError) -> Self {
            Self {
                result: Err(error),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SessionGateway for FakeGateway {
        async fn resolve_session(
            &self,
            request: &SessionRequest,
        ) -> Result<ConversationSession, GatewayError> {
            self.calls.lock().unwrap().push(request.clone());
            let history = self.result.clone()?;
            Ok(ConversationSession::new(
                1,
                request.username(),
                ClientRef {
                    id: 3,
                    code: request.client_code().to_string(),
                    name: "Acme Inc".to_string(),
                },
                "s1",
                history,
            )
            .unwrap())
        }
    }

    #[tokio::test]
    async fn test_history_is_preserved_in_order() {
        let history = vec![
            Message::confirmed(MessageId::Server(1), Role::Human, "hola", None),
            Message::confirmed(MessageId::Server(2), Role::Agent, "buenas", None),
        ];
        let gateway = Arc::new(FakeGateway::ok(history.clone()));
        let use_case = BootstrapSessionUseCase::new(gateway.clone());

        let session = use_case.execute("ana", "ACME").await.unwrap();
        assert_eq!(session.messages(), history.as_slice());
        assert_eq!(gateway.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_input_fails_before_network() {
        let gateway = Arc::new(FakeGateway::ok(vec![]));
        let use_case = BootstrapSessionUseCase::new(gateway.clone());

        let err = use_case.execute("  ", "ACME").await.unwrap_err();
        assert!(matches!(err, BootstrapError::Validation(_)));
        assert_eq!(err.to_string(), "a client and a username must be selected");

        let err = use_case.execute("ana", "").await.unwrap_err();
        assert!(matches!(err, BootstrapError::Validation(_)));
        assert!(gateway.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_server_detail_is_surfaced() {
        let gateway = Arc::new(FakeGateway::failing(GatewayError::Status {
            status: 404,
            detail: Some("Cliente con código 'X' no encontrado o inactivo.".to_string()),
        }));
        let use_case = BootstrapSessionUseCase::new(gateway);

        let err = use_case.execute("ana", "X").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cliente con código 'X' no encontrado o inactivo."
        );
    }

    #[tokio::test]
    async fn test_generic_message_without_detail() {
        let gateway = Arc::new(FakeGateway::failing(GatewayError::ConnectionError(
            "refused".to_string(),
        )));
        let use_case = BootstrapSessionUseCase::new(gateway);

        let err = use_case.execute("ana", "ACME").await.unwrap_err();
        assert_eq!(err.to_string(), GENERIC_BOOTSTRAP_ERROR);
    }
}
