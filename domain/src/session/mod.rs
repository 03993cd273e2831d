//! Conversation session domain.
//!
//! - [`entities::ConversationSession`]: the active operator-to-agent conversation
//! - [`entities::ClientRef`] / [`entities::Client`] / [`entities::UserSummary`]: directory data

pub mod entities;
