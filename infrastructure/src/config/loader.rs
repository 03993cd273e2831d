//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order
const PROJECT_FILES: [&str; 2] = ["agentdesk.toml", ".agentdesk.toml"];

/// Prefix of configuration environment variables (`AGENTDESK_AGENT__BASE_URL`)
const ENV_PREFIX: &str = "AGENTDESK_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `AGENTDESK_<SECTION>__<KEY>`
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./agentdesk.toml` or `./.agentdesk.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/agentdesk/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(
            Self::global_config_path().filter(|p| p.exists()).as_deref(),
            Self::project_config_path().as_deref(),
            config_path.map(PathBuf::as_path),
        )
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// File layers on top of the defaults, lowest priority first.
    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));
        for path in [global, project].into_iter().flatten() {
            figment = figment.merge(Toml::file(path));
        }
        // An explicit file must exist; figment only reports that at extract time
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file_exact(path));
        }
        figment
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/agentdesk/config.toml if set,
    /// otherwise the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("agentdesk").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        println!("  [ENV  ] Environment: {}<SECTION>__<KEY>", ENV_PREFIX);

        if let Some(path) = config_path {
            let tag = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", tag, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./agentdesk.toml or ./.agentdesk.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.core.base_url, "http://localhost:8000");
        assert_eq!(config.agent.control_token, "new_message");
        assert!(!config.chat.serialize_sends);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("agentdesk"));
    }

    #[test]
    fn test_later_files_override_earlier_ones() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("project.toml");
        fs::write(
            &global,
            "[core]\nbase_url = \"http://global:8000\"\ntimeout_seconds = 5\n",
        )
        .unwrap();
        fs::write(&project, "[core]\nbase_url = \"http://project:8000\"\n").unwrap();

        let config: FileConfig = ConfigLoader::figment(Some(&global), Some(&project), None)
            .extract()
            .unwrap();
        assert_eq!(config.core.base_url, "http://project:8000");
        // Untouched keys keep the lower layer's value
        assert_eq!(config.core.timeout_seconds, 5);
        assert_eq!(config.agent.base_url, "http://localhost:8001");
    }

    #[test]
    fn test_explicit_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("project.toml");
        let explicit = dir.path().join("explicit.toml");
        fs::write(&project, "[chat]\nserialize_sends = false\n").unwrap();
        fs::write(&explicit, "[chat]\nserialize_sends = true\n").unwrap();

        let config: FileConfig = ConfigLoader::figment(None, Some(&project), Some(&explicit))
            .extract()
            .unwrap();
        assert!(config.chat.serialize_sends);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let result: Result<FileConfig, _> =
            ConfigLoader::figment(None, None, Some(&missing)).extract();
        assert!(result.is_err());
    }
}
