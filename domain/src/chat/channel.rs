//! Push channel lifecycle state machine.
//!
//! One channel exists per active session. No reconnect is ever attempted: a
//! dropped channel stays `Closed` until a new session is bootstrapped.
//!
//! ```text
//! Disconnected ──Activate──> Connecting ──Established──> Open
//!                                 │                       │
//!                                 └──Dropped / Teardown───┴──> Closed ──Activate──> Connecting
//! ```

use serde::{Deserialize, Serialize};

/// Lifecycle of the push channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChannelState {
    /// No session has been active yet.
    #[default]
    Disconnected,
    Connecting,
    Open,
    Closed,
}

/// Events that drive [`ChannelState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelEvent {
    /// A session became active; open its channel.
    Activate,
    /// The connection handshake completed.
    Established,
    /// The connection errored or was closed by the peer.
    Dropped,
    /// The session was discarded; close unconditionally.
    Teardown,
}

impl ChannelState {
    /// Apply an event and return the next state.
    ///
    /// Events that do not apply to the current state leave it unchanged, so a
    /// late `Established` after a teardown cannot reopen a closed channel.
    pub fn on(self, event: ChannelEvent) -> Self {
        use ChannelState::*;
        match (self, event) {
            (Disconnected | Closed, ChannelEvent::Activate) => Connecting,
            (Connecting, ChannelEvent::Established) => Open,
            (Connecting | Open, ChannelEvent::Dropped) => Closed,
            (_, ChannelEvent::Teardown) => Closed,
            (state, _) => state,
        }
    }

    /// Whether inbound frames may still be applied to the session.
    pub fn is_live(&self) -> bool {
        matches!(self, ChannelState::Connecting | ChannelState::Open)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelState::Disconnected => "disconnected",
            ChannelState::Connecting => "connecting",
            ChannelState::Open => "open",
            ChannelState::Closed => "closed",
        }
    }
}

impl std::fmt::Display for ChannelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
