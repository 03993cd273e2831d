//! Core API client: client directory and session bootstrap.

use super::{build_client, endpoint, parse_base_url, parse_detail, transport_error};
use agentdesk_application::{ClientDirectory, GatewayError, SessionGateway};
use agentdesk_domain::{
    Client, ClientRef, Communication, ConversationSession, Message, SessionRequest, UserSummary,
};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Body of `GET /api/users/session`.
#[derive(Debug, Deserialize)]
struct SessionResponse {
    user_id: i64,
    username: String,
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    client_id: i64,
    client_code: String,
    client_name: String,
    /// Raw records, each decoded leniently.
    #[serde(default)]
    communications: Option<Vec<Value>>,
}

impl SessionResponse {
    fn into_session(self) -> Result<ConversationSession, GatewayError> {
        let session_id = self.session_id.ok_or_else(|| {
            GatewayError::MalformedResponse("session response has no session_id".to_string())
        })?;
        let history = self
            .communications
            .unwrap_or_default()
            .into_iter()
            .map(history_record)
            .collect();
        ConversationSession::new(
            self.user_id,
            self.username,
            ClientRef {
                id: self.client_id,
                code: self.client_code,
                name: self.client_name,
            },
            session_id,
            history,
        )
        .map_err(|e| GatewayError::MalformedResponse(e.to_string()))
    }
}

fn history_record(record: Value) -> Message {
    match record {
        Value::Object(map) => Communication::from_map(&map).into_message(),
        other => Communication {
            message: other,
            ..Default::default()
        }
        .into_message(),
    }
}

/// HTTP adapter for the core API
pub struct CoreApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CoreApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        Ok(Self {
            http: build_client(timeout)?,
            base_url: parse_base_url(base_url)?,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, GatewayError> {
        let url = endpoint(&self.base_url, segments);
        debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                detail: parse_detail(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| GatewayError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl SessionGateway for CoreApiClient {
    async fn resolve_session(
        &self,
        request: &SessionRequest,
    ) -> Result<ConversationSession, GatewayError> {
        let response: SessionResponse = self
            .get_json(
                &["api", "users", "session"],
                &[
                    ("username", request.username()),
                    ("client_code", request.client_code()),
                ],
            )
            .await?;
        response.into_session()
    }
}

#[async_trait]
impl ClientDirectory for CoreApiClient {
    async fn clients(&self) -> Result<Vec<Client>, GatewayError> {
        self.get_json(&["api", "clients"], &[]).await
    }

    async fn users_for_client(&self, client_code: &str) -> Result<Vec<UserSummary>, GatewayError> {
        self.get_json(&["api", "clients", client_code, "users"], &[])
            .await
    }
}
