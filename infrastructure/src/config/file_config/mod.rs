//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section is optional; missing fields fall back to their defaults.

mod agent;
mod chat;
mod core_api;
mod logging;
mod output;

pub use agent::FileAgentConfig;
pub(crate) use agent::normalize_path;
pub use chat::FileChatConfig;
pub use core_api::FileCoreConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;

use agentdesk_application::ChatConfig;
use agentdesk_domain::{ConfigIssue, ConfigIssueCode};
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Core API (directory and session bootstrap)
    pub core: FileCoreConfig,
    /// Agent service (message delivery and push channel)
    pub agent: FileAgentConfig,
    /// Chat behaviour
    pub chat: FileChatConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Conversation transcript
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Errors mean the console cannot talk to its backends at all; warnings
    /// are tolerated and only reported.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.core.validate();
        issues.extend(self.agent.validate());
        issues
    }

    /// Chat controller settings derived from the file.
    pub fn chat_config(&self) -> ChatConfig {
        ChatConfig::default()
            .with_control_token(self.agent.control_token.trim())
            .with_serialize_sends(self.chat.serialize_sends)
    }
}

/// Check that `value` parses as an `http`/`https` URL.
pub(crate) fn check_base_url(field: &str, value: &str) -> Option<ConfigIssue> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => None,
        Ok(url) => Some(ConfigIssue::error(
            ConfigIssueCode::InvalidUrl {
                field: field.to_string(),
                value: value.to_string(),
            },
            format!("{}: unsupported scheme '{}' (expected http or https)", field, url.scheme()),
        )),
        Err(e) => Some(ConfigIssue::error(
            ConfigIssueCode::InvalidUrl {
                field: field.to_string(),
                value: value.to_string(),
            },
            format!("{}: '{}' is not a valid URL ({})", field, value, e),
        )),
    }
}
