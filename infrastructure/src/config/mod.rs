//! Configuration file loading for agentdesk
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `AGENTDESK_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./agentdesk.toml` or `./.agentdesk.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/agentdesk/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub(crate) use file_config::normalize_path;
pub use file_config::{
    FileAgentConfig, FileChatConfig, FileConfig, FileCoreConfig, FileLoggingConfig,
    FileOutputConfig,
};
pub use loader::ConfigLoader;
