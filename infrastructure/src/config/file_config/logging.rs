//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
///
/// Diagnostic verbosity is a command-line concern (`-v`); this section only
/// covers the structured conversation transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Path of the JSONL conversation transcript; disabled when unset
    pub transcript: Option<PathBuf>,
}
