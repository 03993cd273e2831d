//! Composing-indicator state machine.
//!
//! The protocol has no explicit start/stop composing messages. The indicator
//! is derived purely from the event sequence:
//!
//! ```text
//! Idle ──SendDispatched──> Composing
//! Composing ──MessageConfirmed──> Idle
//! Composing ──DeliveryFailed────> Idle
//! ```
//!
//! There is no timeout: if the backend never answers, `Composing` persists
//! for the lifetime of the session.

use serde::{Deserialize, Serialize};

/// Whether the agent is expected to produce a reply soon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ComposingState {
    #[default]
    Idle,
    Composing,
}

/// Events that drive [`ComposingState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposingEvent {
    /// A send was dispatched to the backend.
    SendDispatched,
    /// A structured message frame was decoded from the push channel.
    MessageConfirmed,
    /// The delivery request failed at the transport level.
    DeliveryFailed,
    /// The control token arrived; informational only.
    ProcessingAcknowledged,
}

impl ComposingState {
    /// Apply an event and return the next state.
    pub fn on(self, event: ComposingEvent) -> Self {
        match event {
            ComposingEvent::SendDispatched => ComposingState::Composing,
            ComposingEvent::MessageConfirmed | ComposingEvent::DeliveryFailed => {
                ComposingState::Idle
            }
            ComposingEvent::ProcessingAcknowledged => self,
        }
    }

    pub fn is_composing(&self) -> bool {
        matches!(self, ComposingState::Composing)
    }
}
