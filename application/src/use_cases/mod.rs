//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod bootstrap_session;
pub mod browse_directory;
pub mod chat_controller;
pub mod chat_runtime;
