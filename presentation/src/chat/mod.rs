//! Interactive chat module
//!
//! Provides the line-based operator chat: login flow, slash commands and
//! console rendering of chat notifications.

mod login;
mod notifier;
mod repl;

pub use notifier::ConsoleChatNotifier;
pub use repl::ChatRepl;
