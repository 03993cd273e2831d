//! Message delivery port
//!
//! Outbound operator messages travel over this request channel, never over
//! the push channel. The reply arrives asynchronously as a push frame.

use super::session_gateway::GatewayError;
use async_trait::async_trait;

/// One outbound operator message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRequest {
    pub username: String,
    pub client_code: String,
    pub text: String,
}

#[async_trait]
pub trait MessageDelivery: Send + Sync {
    /// Deliver a message. Only transport-level failures are errors; the
    /// response body is not consumed.
    async fn deliver(&self, request: &DeliveryRequest) -> Result<(), GatewayError>;
}
