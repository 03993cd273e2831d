//! Presentation layer for agentdesk
//!
//! This crate contains CLI definitions, output formatters,
//! the typing indicator, and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod config;
pub mod output;

// Re-export commonly used types
pub use chat::{ChatRepl, ConsoleChatNotifier};
pub use cli::commands::Cli;
pub use config::OutputConfig;
pub use output::console::ConsoleFormatter;
