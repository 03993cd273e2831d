//! Application layer for agentdesk
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ChatConfig;
pub use ports::{
    chat_notifier::{ChatNotifier, NoChatNotifier},
    client_directory::ClientDirectory,
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    message_delivery::{DeliveryRequest, MessageDelivery},
    push_channel::{PushChannel, PushConnection, PushEvent, PushFeed},
    session_gateway::{GatewayError, SessionGateway},
};
pub use use_cases::bootstrap_session::{
    BootstrapError, BootstrapSessionUseCase, GENERIC_BOOTSTRAP_ERROR,
};
pub use use_cases::browse_directory::BrowseDirectoryUseCase;
pub use use_cases::chat_controller::{ChatController, ChatError, FrameOutcome, Submitted};
pub use use_cases::chat_runtime::{ChatRuntime, RuntimeEvent};
