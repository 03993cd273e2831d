//! Application-level configuration.
//!
//! - [`ChatConfig`]: behaviour of the chat controller (control token, send serialisation)

pub mod chat_config;

pub use chat_config::ChatConfig;
