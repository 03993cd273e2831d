//! Agent service configuration from TOML (`[agent]` section)

use super::check_base_url;
use agentdesk_application::config::chat_config::DEFAULT_CONTROL_TOKEN;
use agentdesk_domain::{ConfigIssue, ConfigIssueCode};
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Raw agent service configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// base_url = "http://localhost:8001"
/// question_endpoint = "/question"   # request channel for outbound messages
/// push_path = "/ws"                 # push channel, keyed by user id
/// control_token = "new_message"     # "message received, processing" frame
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub base_url: String,
    pub question_endpoint: String,
    pub push_path: String,
    pub control_token: String,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            question_endpoint: "/question".to_string(),
            push_path: "/ws".to_string(),
            control_token: DEFAULT_CONTROL_TOKEN.to_string(),
        }
    }
}

impl FileAgentConfig {
    /// Base address of the push channel: `base_url` with `http`/`https`
    /// swapped for `ws`/`wss`, joined with `push_path`.
    ///
    /// The user id is appended per connection.
    pub fn push_base_url(&self) -> Option<String> {
        let url = Url::parse(&self.base_url).ok()?;
        let scheme = match url.scheme() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            _ => return None,
        };
        let rest = &url.as_str()[url.scheme().len()..];
        Some(format!(
            "{}{}{}",
            scheme,
            rest.trim_end_matches('/'),
            normalize_path(&self.push_path)
        ))
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(check_base_url("agent.base_url", &self.base_url));

        if self.control_token.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyControlToken,
                "agent.control_token must not be empty",
            ));
        }

        for (field, value) in [
            ("agent.question_endpoint", &self.question_endpoint),
            ("agent.push_path", &self.push_path),
        ] {
            if !value.starts_with('/') {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::RelativeEndpoint {
                        field: field.to_string(),
                        value: value.clone(),
                    },
                    format!("{}: '{}' does not start with '/', treating it as '/{}'", field, value, value),
                ));
            }
        }
        issues
    }
}

/// Ensure a path has exactly one leading slash and no trailing one.
pub(crate) fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
