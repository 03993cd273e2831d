//! Chat state machines.
//!
//! - [`composing::ComposingState`]: "agent is composing" indicator derived from send/receive events
//! - [`channel::ChannelState`]: lifecycle of the push channel of the active session

pub mod channel;
pub mod composing;
