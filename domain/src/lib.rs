//! Domain layer for agentdesk
//!
//! This crate contains the chat entities, the message codec and the finite
//! state types that drive the operator chat. It has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Conversation session**: one operator-to-agent conversation bound to a
//!   user and a client, holding an ordered message sequence.
//! - **Placeholder message**: a human message shown immediately on send,
//!   before the backend confirms anything.
//! - **Composing indicator**: derived from send/receive events, never from
//!   explicit protocol messages.
//! - **Push channel**: server-to-client delivery of agent replies and the
//!   processing control token.

pub mod chat;
pub mod config;
pub mod core;
pub mod message;
pub mod session;

// Re-export commonly used types
pub use chat::{
    channel::{ChannelEvent, ChannelState},
    composing::{ComposingEvent, ComposingState},
};
pub use config::validation::{ConfigIssue, ConfigIssueCode, Severity};
pub use core::error::DomainError;
pub use message::{
    codec::{Communication, InboundFrame, MessagePayload, decode_frame, decode_payload, parse_timestamp},
    entities::{DeliveryStatus, Message, MessageId, Role},
};
pub use session::entities::{
    ACTIVE_STATUS, Client, ClientRef, ConversationSession, SessionRequest, UserSummary,
};
