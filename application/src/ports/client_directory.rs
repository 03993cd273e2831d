//! Client directory port
//!
//! Lists the clients and users an operator can start a chat as.

use super::session_gateway::GatewayError;
use agentdesk_domain::{Client, UserSummary};
use async_trait::async_trait;

#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// All clients, regardless of status.
    async fn clients(&self) -> Result<Vec<Client>, GatewayError>;

    /// Users registered under a client.
    async fn users_for_client(&self, client_code: &str) -> Result<Vec<UserSummary>, GatewayError>;
}
