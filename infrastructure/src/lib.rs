//! Infrastructure layer for agentdesk
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus configuration file loading.

pub mod config;
pub mod http;
pub mod logging;
pub mod push;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileAgentConfig, FileChatConfig, FileConfig, FileCoreConfig,
    FileLoggingConfig, FileOutputConfig,
};
pub use http::{AgentApiClient, CoreApiClient};
pub use logging::JsonlConversationLogger;
pub use push::WebSocketPushChannel;
