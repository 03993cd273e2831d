//! Presentation-level configuration
//!
//! Configuration for console rendering.

/// Output configuration for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Enable colored terminal output
    pub color: bool,
    /// Prefix messages with their local HH:MM time
    pub show_timestamps: bool,
    /// Show the typing spinner
    pub show_progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            show_timestamps: true,
            show_progress: true,
        }
    }
}
