//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod chat_notifier;
pub mod client_directory;
pub mod conversation_logger;
pub mod message_delivery;
pub mod push_channel;
pub mod session_gateway;
