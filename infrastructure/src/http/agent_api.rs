//! Agent API client: outbound message delivery.

use super::{build_client, parse_base_url, transport_error};
use crate::config::normalize_path;
use agentdesk_application::{DeliveryRequest, GatewayError, MessageDelivery};
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP adapter for the agent's question endpoint
///
/// The reply arrives over the push channel, so the response body is never
/// read. A non-success status is logged but does not fail the delivery:
/// only a request that produced no response at all counts as failed.
pub struct AgentApiClient {
    http: reqwest::Client,
    question_url: Url,
}

impl AgentApiClient {
    pub fn new(
        base_url: &str,
        question_endpoint: &str,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let mut question_url = parse_base_url(base_url)?;
        let path = format!(
            "{}{}",
            question_url.path().trim_end_matches('/'),
            normalize_path(question_endpoint)
        );
        question_url.set_path(&path);
        Ok(Self {
            http: build_client(timeout)?,
            question_url,
        })
    }

    pub fn question_url(&self) -> &Url {
        &self.question_url
    }
}

#[async_trait]
impl MessageDelivery for AgentApiClient {
    async fn deliver(&self, request: &DeliveryRequest) -> Result<(), GatewayError> {
        debug!(
            "Delivering {} chars for {}@{}",
            request.text.chars().count(),
            request.username,
            request.client_code
        );

        let response = self
            .http
            .get(self.question_url.clone())
            .query(&[
                ("username", request.username.as_str()),
                ("client_code", request.client_code.as_str()),
                ("texto", request.text.as_str()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Agent answered the delivery with status {}", status.as_u16());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_server::serve_once;

    fn request(text: &str) -> DeliveryRequest {
        DeliveryRequest {
            username: "ana".to_string(),
            client_code: "ACME".to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_question_url() {
        let client =
            AgentApiClient::new("http://localhost:8001/", "question", Duration::from_secs(1))
                .unwrap();
        assert_eq!(client.question_url().as_str(), "http://localhost:8001/question");

        let client =
            AgentApiClient::new("https://agent.example.com/v1", "/question", Duration::from_secs(1))
                .unwrap();
        assert_eq!(client.question_url().as_str(), "https://agent.example.com/v1/question");
    }

    #[tokio::test]
    async fn test_deliver_encodes_query() {
        let (base, head) = serve_once(200, "{}").await;
        let client = AgentApiClient::new(&base, "/question", Duration::from_secs(5)).unwrap();

        client.deliver(&request("hola & adiós")).await.unwrap();

        let head = head.await.unwrap();
        assert!(head.starts_with(
            "GET /question?username=ana&client_code=ACME&texto=hola+%26+adi%C3%B3s "
        ));
    }

    #[tokio::test]
    async fn test_non_success_status_is_not_a_failure() {
        let (base, _head) = serve_once(500, r#"{"detail": "boom"}"#).await;
        let client = AgentApiClient::new(&base, "/question", Duration::from_secs(5)).unwrap();
        assert!(client.deliver(&request("hola")).await.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_agent_fails() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            AgentApiClient::new(&format!("http://{}", addr), "/question", Duration::from_secs(5))
                .unwrap();
        let err = client.deliver(&request("hola")).await.unwrap_err();
        assert!(err.is_transport());
    }
}
