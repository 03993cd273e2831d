//! Chat behaviour parameters.

use serde::{Deserialize, Serialize};

/// Control token the agent service pushes when it accepts a send.
pub const DEFAULT_CONTROL_TOKEN: &str = "new_message";

/// Parameters that control how the chat controller reacts to events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Literal push frame meaning "message received, processing".
    pub control_token: String,
    /// Reject new sends while a reply is still expected.
    pub serialize_sends: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            control_token: DEFAULT_CONTROL_TOKEN.to_string(),
            serialize_sends: false,
        }
    }
}

impl ChatConfig {
    // ==================== Builder Methods ====================

    pub fn with_control_token(mut self, token: impl Into<String>) -> Self {
        self.control_token = token.into();
        self
    }

    pub fn with_serialize_sends(mut self, serialize: bool) -> Self {
        self.serialize_sends = serialize;
        self
    }
}
