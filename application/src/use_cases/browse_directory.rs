//! Browse Directory use case.
//!
//! Supplies the login flow with the clients an operator may pick and the
//! users already registered under a client.

use crate::ports::client_directory::ClientDirectory;
use crate::ports::session_gateway::GatewayError;
use agentdesk_domain::{Client, UserSummary};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct BrowseDirectoryUseCase {
    directory: Arc<dyn ClientDirectory>,
}

impl BrowseDirectoryUseCase {
    pub fn new(directory: Arc<dyn ClientDirectory>) -> Self {
        Self { directory }
    }

    /// Clients that can be selected (status `Activo`), in server order.
    pub async fn active_clients(&self) -> Result<Vec<Client>, GatewayError> {
        let clients = self.directory.clients().await?;
        let total = clients.len();
        let active: Vec<Client> = clients.into_iter().filter(Client::is_active).collect();
        debug!("Directory: {} of {} clients active", active.len(), total);
        Ok(active)
    }

    pub async fn users_for(&self, client_code: &str) -> Result<Vec<UserSummary>, GatewayError> {
        self.directory.users_for_client(client_code).await
    }
}
