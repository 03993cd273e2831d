//! HTTP adapters for the core and agent REST APIs.
//!
//! - [`CoreApiClient`] implements [`SessionGateway`] and [`ClientDirectory`]
//! - [`AgentApiClient`] implements [`MessageDelivery`]
//!
//! [`SessionGateway`]: agentdesk_application::SessionGateway
//! [`ClientDirectory`]: agentdesk_application::ClientDirectory
//! [`MessageDelivery`]: agentdesk_application::MessageDelivery

mod agent_api;
mod core_api;

#[cfg(test)]
pub(crate) mod test_server;

pub use agent_api::AgentApiClient;
pub use core_api::CoreApiClient;

use agentdesk_application::GatewayError;
use reqwest::Url;
use std::time::Duration;

/// Build the shared reqwest client.
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, GatewayError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("agentdesk/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| GatewayError::ConnectionError(format!("could not build HTTP client: {}", e)))
}

/// Parse a configured base URL.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, GatewayError> {
    let url = Url::parse(base_url)
        .map_err(|e| GatewayError::ConnectionError(format!("invalid base URL '{}': {}", base_url, e)))?;
    if url.cannot_be_a_base() {
        return Err(GatewayError::ConnectionError(format!(
            "invalid base URL '{}'",
            base_url
        )));
    }
    Ok(url)
}

/// `base` with `segments` appended as percent-encoded path segments.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Map a transport-level reqwest error.
pub(crate) fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::ConnectionError(e.to_string())
    }
}

/// Extract `detail` from an error body like `{"detail": "..."}`.
///
/// Non-string details (validation error lists) are ignored.
pub(crate) fn parse_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_segments() {
        let base = parse_base_url("http://localhost:8000/").unwrap();
        let url = endpoint(&base, &["api", "clients", "A B/C", "users"]);
        assert_eq!(url.as_str(), "http://localhost:8000/api/clients/A%20B%2FC/users");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let base = parse_base_url("https://example.com/core").unwrap();
        let url = endpoint(&base, &["api", "clients"]);
        assert_eq!(url.as_str(), "https://example.com/core/api/clients");
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        assert!(parse_base_url("not a url").is_err());
        // Parses as scheme "localhost", which cannot carry a path
        assert!(parse_base_url("localhost:8000").is_err());
    }

    #[test]
    fn test_parse_detail() {
        assert_eq!(
            parse_detail(r#"{"detail": "Cliente no encontrado"}"#).as_deref(),
            Some("Cliente no encontrado")
        );
        assert_eq!(parse_detail(r#"{"detail": [{"loc": ["query"]}]}"#), None);
        assert_eq!(parse_detail(r#"{"detail": ""}"#), None);
        assert_eq!(parse_detail("Internal Server Error"), None);
    }
}
