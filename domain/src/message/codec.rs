//! Message codec.
//!
//! Normalizes the heterogeneous shapes a message can take on the wire into one
//! canonical [`Message`]:
//!
//! - a stored [`Communication`] record (bootstrap history, push envelopes)
//!   whose `message` field is either a structured payload or pre-serialized
//!   JSON text,
//! - a bare payload `{ "type" | "role": ..., "content": ... }`,
//! - plain text, which degrades to an agent-authored message.
//!
//! Decoding never fails for stored messages. Push frames are the only input
//! that can be rejected, see [`decode_frame`].

use super::entities::{Message, MessageId, Role};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A message record as stored and emitted by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Communication {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: Value,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Communication {
    /// Lenient extraction from an already-parsed JSON object.
    ///
    /// Push frames are not trusted to match the stored schema field-for-field,
    /// so wrongly-typed optional fields are dropped instead of failing.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            id: map.get("id").cloned().unwrap_or(Value::Null),
            session_id: map
                .get("session_id")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            message: map.get("message").cloned().unwrap_or(Value::Null),
            created_at: map
                .get("created_at")
                .and_then(|v| v.as_str())
                .map(str::to_string),
        }
    }

    /// Convert into the canonical message shape. Never fails.
    pub fn into_message(self) -> Message {
        let payload = decode_payload(&self.message);
        Message::confirmed(
            decode_id(&self.id),
            payload.role,
            payload.content,
            self.created_at.as_deref().and_then(parse_timestamp),
        )
    }
}

/// Role and text of a message, stripped of any envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePayload {
    pub role: Role,
    pub content: String,
}

impl MessagePayload {
    fn agent(content: impl Into<String>) -> Self {
        Self {
            role: Role::Agent,
            content: content.into(),
        }
    }
}

/// Decode a `message` value: structured object, JSON text, or plain text.
pub fn decode_payload(value: &Value) -> MessagePayload {
    match value {
        Value::Object(map) => payload_from_object(map),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => payload_from_object(&map),
            _ => MessagePayload::agent(text.as_str()),
        },
        Value::Null => MessagePayload::agent(String::new()),
        other => MessagePayload::agent(other.to_string()),
    }
}

fn payload_from_object(map: &Map<String, Value>) -> MessagePayload {
    let role = map
        .get("type")
        .or_else(|| map.get("role"))
        .and_then(|v| v.as_str())
        .map(Role::from_tag)
        .unwrap_or(Role::Agent);

    let content = match map.get("content") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
        // No content field at all: show the raw payload rather than nothing
        None => Value::Object(map.clone()).to_string(),
    };

    MessagePayload { role, content }
}

fn decode_id(value: &Value) -> MessageId {
    match value {
        Value::Number(n) => n.as_i64().map(MessageId::Server).unwrap_or(MessageId::Unassigned),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(MessageId::Server)
            .unwrap_or(MessageId::Unassigned),
        _ => MessageId::Unassigned,
    }
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 and naive ISO-8601 (`2024-05-01T10:22:33.123456`), the
/// latter interpreted as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Classification of one inbound push frame.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    /// A structured, backend-confirmed message.
    Message(Message),
    /// The control token: the backend accepted a send and is working on it.
    Control,
    /// Neither structured nor the control token.
    Unrecognized,
}

/// Decode a raw push frame.
///
/// Only JSON objects count as structured. An object with a `message` field is
/// a [`Communication`] envelope; any other object is a bare payload.
pub fn decode_frame(raw: &str, control_token: &str) -> InboundFrame {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => {
            if map.contains_key("message") {
                InboundFrame::Message(Communication::from_map(&map).into_message())
            } else {
                let payload = payload_from_object(&map);
                InboundFrame::Message(Message::confirmed(
                    map.get("id").map(decode_id).unwrap_or(MessageId::Unassigned),
                    payload.role,
                    payload.content,
                    map.get("created_at")
                        .and_then(|v| v.as_str())
                        .and_then(parse_timestamp),
                ))
            }
        }
        _ if raw.trim() == control_token => InboundFrame::Control,
        _ => InboundFrame::Unrecognized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::entities::DeliveryStatus;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    const TOKEN: &str = "new_message";

    #[test]
    fn test_structured_payload() {
        let payload = decode_payload(&json!({"type": "human", "content": "hola"}));
        assert_eq!(payload.role, Role::Human);
        assert_eq!(payload.content, "hola");
    }

    #[test]
    fn test_role_field_is_accepted() {
        let payload = decode_payload(&json!({"role": "user", "content": "hi"}));
        assert_eq!(payload.role, Role::Human);
    }

    #[test]
    fn test_json_text_payload() {
        let payload = decode_payload(&json!("{\"type\":\"ai\",\"content\":\"respuesta\"}"));
        assert_eq!(payload.role, Role::Agent);
        assert_eq!(payload.content, "respuesta");
    }

    #[test]
    fn test_malformed_text_degrades_to_agent() {
        let payload = decode_payload(&json!("{not json"));
        assert_eq!(payload.role, Role::Agent);
        assert_eq!(payload.content, "{not json");
    }

    #[test]
    fn test_non_object_json_text_degrades_to_agent() {
        let payload = decode_payload(&json!("42"));
        assert_eq!(payload, MessagePayload::agent("42"));
    }

    #[test]
    fn test_missing_content_shows_raw_payload() {
        let payload = decode_payload(&json!({"type": "ai"}));
        assert_eq!(payload.role, Role::Agent);
        assert!(payload.content.contains("\"type\""));
    }

    #[test]
    fn test_communication_into_message() {
        let comm: Communication = serde_json::from_value(json!({
            "id": 12,
            "session_id": "s1",
            "message": {"type": "ai", "content": "hola"},
            "created_at": "2024-05-01T10:22:33.123456"
        }))
        .unwrap();
        let msg = comm.into_message();
        assert_eq!(msg.id, MessageId::Server(12));
        assert_eq!(msg.role, Role::Agent);
        assert_eq!(msg.status, DeliveryStatus::Sent);
        let ts = msg.created_at.unwrap();
        assert_eq!((ts.year(), ts.month(), ts.hour()), (2024, 5, 10));
    }

    #[test]
    fn test_communication_without_timestamp() {
        let comm: Communication =
            serde_json::from_value(json!({"id": "7", "session_id": "s1", "message": "texto"}))
                .unwrap();
        let msg = comm.into_message();
        assert_eq!(msg.id, MessageId::Server(7));
        assert_eq!(msg.content, "texto");
        assert!(msg.created_at.is_none());
    }

    #[test]
    fn test_parse_timestamp_variants() {
        assert!(parse_timestamp("2024-05-01T10:22:33Z").is_some());
        assert!(parse_timestamp("2024-05-01T10:22:33+02:00").is_some());
        assert!(parse_timestamp("2024-05-01T10:22:33").is_some());
        assert!(parse_timestamp("2024-05-01 10:22:33.5").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_frame_bare_payload() {
        let frame = decode_frame(r#"{"type":"ai","content":"hola, ¿en qué puedo ayudarte?"}"#, TOKEN);
        match frame {
            InboundFrame::Message(msg) => {
                assert_eq!(msg.role, Role::Agent);
                assert_eq!(msg.content, "hola, ¿en qué puedo ayudarte?");
                assert_eq!(msg.id, MessageId::Unassigned);
            }
            other => panic!("expected message, got {:?}", other),
        }
    }

    #[test]
    fn test_frame_envelope() {
        let raw = json!({
            "id": 99,
            "session_id": "s1",
            "message": {"type": "ai", "content": "listo"},
            "created_at": "2024-05-01T10:22:33"
        })
        .to_string();
        match decode_frame(&raw, TOKEN) {
            InboundFrame::Message(msg) => {
                assert_eq!(msg.id, MessageId::Server(99));
                assert_eq!(msg.content, "listo");
                assert!(msg.created_at.is_some());
            }
            other => panic!("expected message, got {:?}", other),
        }
    }

    #[test]
    fn test_frame_envelope_with_odd_field_types() {
        let raw = r#"{"id":"x","session_id":5,"message":"plain words","created_at":17}"#;
        match decode_frame(raw, TOKEN) {
            InboundFrame::Message(msg) => {
                assert_eq!(msg.id, MessageId::Unassigned);
                assert_eq!(msg.role, Role::Agent);
                assert_eq!(msg.content, "plain words");
                assert!(msg.created_at.is_none());
            }
            other => panic!("expected message, got {:?}", other),
        }
    }

    #[test]
    fn test_frame_control_token() {
        assert_eq!(decode_frame("new_message", TOKEN), InboundFrame::Control);
        assert_eq!(decode_frame("new_message\n", TOKEN), InboundFrame::Control);
    }

    #[test]
    fn test_frame_unrecognized() {
        assert_eq!(decode_frame("hello there", TOKEN), InboundFrame::Unrecognized);
        assert_eq!(decode_frame("[1,2,3]", TOKEN), InboundFrame::Unrecognized);
        assert_eq!(decode_frame("\"quoted\"", TOKEN), InboundFrame::Unrecognized);
        assert_eq!(decode_frame("", TOKEN), InboundFrame::Unrecognized);
    }
}
