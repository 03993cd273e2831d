//! Core API configuration from TOML (`[core]` section)

use super::check_base_url;
use agentdesk_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw core API configuration from TOML
///
/// # Example
///
/// ```toml
/// [core]
/// base_url = "http://localhost:8000"
/// timeout_seconds = 30
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCoreConfig {
    /// Base URL of the core API (clients, users, sessions)
    pub base_url: String,
    /// Request timeout for every HTTP call, in seconds
    pub timeout_seconds: u64,
}

impl Default for FileCoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl FileCoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(check_base_url("core.base_url", &self.base_url));
        if self.timeout_seconds == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout {
                    field: "core.timeout_seconds".to_string(),
                },
                "core.timeout_seconds must be greater than zero",
            ));
        }
        issues
    }
}
