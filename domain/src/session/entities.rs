//! Session domain entities

use crate::core::error::DomainError;
use crate::message::entities::Message;
use serde::{Deserialize, Serialize};

/// Status value the backend uses for selectable clients.
pub const ACTIVE_STATUS: &str = "Activo";

/// A client as listed by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    #[serde(rename = "client_code")]
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub status: String,
}

impl Client {
    pub fn is_active(&self) -> bool {
        self.status == ACTIVE_STATUS
    }
}

/// A user known to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
}

/// The client that owns a conversation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRef {
    pub id: i64,
    pub code: String,
    pub name: String,
}

/// Validated input for resolving a (client, user) pair into a session (Value Object)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    username: String,
    client_code: String,
}

impl SessionRequest {
    /// Both fields must be non-blank; surrounding whitespace is dropped.
    pub fn new(
        username: impl AsRef<str>,
        client_code: impl AsRef<str>,
    ) -> Result<Self, DomainError> {
        let client_code = client_code.as_ref().trim();
        if client_code.is_empty() {
            return Err(DomainError::EmptyClientCode);
        }
        let username = username.as_ref().trim();
        if username.is_empty() {
            return Err(DomainError::EmptyUsername);
        }
        Ok(Self {
            username: username.to_string(),
            client_code: client_code.to_string(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn client_code(&self) -> &str {
        &self.client_code
    }
}

/// The active operator-to-agent conversation (Entity)
///
/// Holds the message sequence in arrival/send order. The sequence is
/// append-only apart from delivery-status updates on placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSession {
    user_id: i64,
    username: String,
    client: ClientRef,
    session_id: String,
    messages: Vec<Message>,
}

impl ConversationSession {
    pub fn new(
        user_id: i64,
        username: impl Into<String>,
        client: ClientRef,
        session_id: impl Into<String>,
        history: Vec<Message>,
    ) -> Result<Self, DomainError> {
        let session_id = session_id.into();
        if session_id.trim().is_empty() {
            return Err(DomainError::MissingSessionId);
        }
        Ok(Self {
            user_id,
            username: username.into(),
            client,
            session_id,
            messages: history,
        })
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn client(&self) -> &ClientRef {
        &self.client
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Mark every pending placeholder as sent. Returns how many changed.
    pub fn settle_pending(&mut self) -> usize {
        let mut settled = 0;
        for message in self.messages.iter_mut().filter(|m| m.is_pending()) {
            message.mark_sent();
            settled += 1;
        }
        settled
    }

    pub fn pending_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_pending()).count()
    }
}
