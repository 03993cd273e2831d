//! Chat behaviour configuration from TOML (`[chat]` section)

use serde::{Deserialize, Serialize};

/// Raw chat configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// Reject new sends while the agent is still composing a reply
    pub serialize_sends: bool,
}
