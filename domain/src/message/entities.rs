//! Message domain entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message.
///
/// The wire protocol uses overlapping vocabularies (`human`/`user` and
/// `ai`/`agent`); they are collapsed into this enum by the codec and never
/// travel further as raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Human,
    Agent,
}

impl Role {
    /// Classify a raw wire tag. Anything that is not `human`/`user` is agent-authored.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "human" | "user" => Role::Human,
            _ => Role::Agent,
        }
    }

    pub fn is_human(&self) -> bool {
        matches!(self, Role::Human)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Human => "human",
            Role::Agent => "agent",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identifier of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageId {
    /// Assigned by the backend when the message was stored.
    Server(i64),
    /// Synthesized locally (Unix milliseconds) for a not-yet-confirmed send.
    Placeholder(i64),
    /// The frame carried no usable identifier.
    Unassigned,
}

impl MessageId {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, MessageId::Placeholder(_))
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageId::Server(id) => write!(f, "{}", id),
            MessageId::Placeholder(millis) => write!(f, "local-{}", millis),
            MessageId::Unassigned => write!(f, "-"),
        }
    }
}

/// Delivery state as far as the operator can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Pending,
    Sent,
}

/// A single turn in the conversation (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub created_at: Option<DateTime<Utc>>,
    pub status: DeliveryStatus,
}

impl Message {
    /// A message confirmed by the backend (history or push channel).
    pub fn confirmed(
        id: MessageId,
        role: Role,
        content: impl Into<String>,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            role,
            content: content.into(),
            created_at,
            status: DeliveryStatus::Sent,
        }
    }

    /// A locally-synthesized human message shown before the backend confirms it.
    pub fn placeholder(millis: i64, content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: MessageId::Placeholder(millis),
            role: Role::Human,
            content: content.into(),
            created_at: Some(created_at),
            status: DeliveryStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == DeliveryStatus::Pending
    }

    pub fn mark_sent(&mut self) {
        self.status = DeliveryStatus::Sent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_tag_synonyms() {
        assert_eq!(Role::from_tag("human"), Role::Human);
        assert_eq!(Role::from_tag("user"), Role::Human);
        assert_eq!(Role::from_tag("USER "), Role::Human);
        assert_eq!(Role::from_tag("ai"), Role::Agent);
        assert_eq!(Role::from_tag("agent"), Role::Agent);
        assert_eq!(Role::from_tag("system"), Role::Agent);
        assert_eq!(Role::from_tag(""), Role::Agent);
    }

    #[test]
    fn test_placeholder_is_pending_human() {
        let msg = Message::placeholder(1_700_000_000_000, "hola", Utc::now());
        assert!(msg.id.is_placeholder());
        assert!(msg.role.is_human());
        assert!(msg.is_pending());
        assert!(msg.created_at.is_some());
    }

    #[test]
    fn test_mark_sent() {
        let mut msg = Message::placeholder(1, "x", Utc::now());
        msg.mark_sent();
        assert_eq!(msg.status, DeliveryStatus::Sent);
    }

    #[test]
    fn test_message_serializes_timestamp() {
        let created_at = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let msg = Message::confirmed(MessageId::Server(3), Role::Agent, "hola", Some(created_at));

        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["created_at"], "2024-05-01T10:00:00Z");

        let back: Message = serde_json::from_value(json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn test_message_id_display() {
        assert_eq!(MessageId::Server(7).to_string(), "7");
        assert_eq!(MessageId::Placeholder(12).to_string(), "local-12");
        assert_eq!(MessageId::Unassigned.to_string(), "-");
    }
}
