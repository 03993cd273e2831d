//! Chat notification port
//!
//! Render layers observe the chat through this trait; they never mutate the
//! session context themselves. Implementations live in the presentation
//! layer.

use agentdesk_domain::{ChannelState, ComposingState, ConversationSession, Message};

pub trait ChatNotifier: Send + Sync {
    /// A session was installed; its history is already in place.
    fn on_session_started(&self, session: &ConversationSession);

    /// The active session was discarded.
    fn on_session_ended(&self) {}

    /// A message was appended to the active session.
    fn on_message_appended(&self, message: &Message);

    /// The composing indicator changed.
    fn on_composing_changed(&self, state: ComposingState);

    /// The push channel changed state.
    fn on_channel_changed(&self, _state: ChannelState) {}

    /// An asynchronous failure that the operator should see.
    fn on_error(&self, message: &str);
}

/// No-op notifier for tests and headless use
pub struct NoChatNotifier;

impl ChatNotifier for NoChatNotifier {
    fn on_session_started(&self, _session: &ConversationSession) {}
    fn on_message_appended(&self, _message: &Message) {}
    fn on_composing_changed(&self, _state: ComposingState) {}
    fn on_error(&self, _message: &str) {}
}
