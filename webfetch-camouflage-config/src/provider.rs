//! Configuration provider using Figment

use crate::{error::ConfigError, types::ServerConfig, ConfigResult};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::PathBuf;
use tracing::{debug, trace};

/// Prefix for configuration environment variables
pub const ENV_PREFIX: &str = "WEBFETCH_";

/// File name looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "webfetch-camouflage.toml";

/// Configuration provider using figment
///
/// Sources are merged in precedence order (later sources override earlier ones):
/// 1. Default values
/// 2. Discovered configuration files (user config dir, then working directory)
/// 3. An explicitly requested configuration file
/// 4. `WEBFETCH_` environment variables, nested keys separated by `__`
///
/// No caching is performed; every [`ConfigProvider::load`] reads the sources fresh.
#[derive(Debug, Clone, Default)]
pub struct ConfigProvider {
    explicit_file: Option<PathBuf>,
    search_paths: Option<Vec<PathBuf>>,
}

impl ConfigProvider {
    /// Create a provider with the standard search locations
    pub fn new() -> Self {
        Self::default()
    }

    /// Also load `path`, which must exist, above any discovered file
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(path.into());
        self
    }

    /// Replace the discovered file locations
    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.search_paths = Some(paths);
        self
    }

    /// Default file locations, lowest precedence first
    pub fn default_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("webfetch-camouflage").join("config.toml"));
        }
        paths.push(PathBuf::from(PROJECT_CONFIG_FILE));
        paths
    }

    /// Load, merge and validate the configuration.
    ///
    /// # Errors
    ///
    /// * `ConfigError::FileNotFound` - The explicit config file does not exist
    /// * `ConfigError::Parse` - A source is malformed or has mistyped values
    /// * `ConfigError::Validation` - The merged configuration is unusable
    pub fn load(&self) -> ConfigResult<ServerConfig> {
        let config: ServerConfig = self.build_figment()?.extract()?;
        config.validate()?;
        debug!(
            default_impersonate = %config.default_impersonate,
            "loaded configuration"
        );
        Ok(config)
    }

    fn build_figment(&self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(ServerConfig::default()));

        for path in self.discovered_files() {
            trace!("Loading config file: {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = &self.explicit_file {
            if !path.is_file() {
                return Err(ConfigError::FileNotFound { path: path.clone() });
            }
            trace!("Loading explicit config file: {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        Ok(figment.merge(Self::load_env_vars()))
    }

    fn discovered_files(&self) -> Vec<PathBuf> {
        let paths = self
            .search_paths
            .clone()
            .unwrap_or_else(Self::default_search_paths);
        paths.into_iter().filter(|p| p.is_file()).collect()
    }

    fn load_env_vars() -> Env {
        Env::prefixed(ENV_PREFIX).split("__")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_load_defaults_without_files() {
        let config = ConfigProvider::new()
            .with_search_paths(Vec::new())
            .load()
            .unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    #[serial]
    fn test_discovered_files_skip_missing_paths() {
        let temp_dir = TempDir::new().unwrap();
        let present = temp_dir.path().join("present.toml");
        fs::write(&present, "default_impersonate = \"tor\"\n").unwrap();

        let provider = ConfigProvider::new()
            .with_search_paths(vec![temp_dir.path().join("missing.toml"), present.clone()]);

        assert_eq!(provider.discovered_files(), vec![present]);
        assert_eq!(provider.load().unwrap().default_impersonate, "tor");
    }

    #[test]
    fn test_default_search_paths_end_with_project_file() {
        let paths = ConfigProvider::default_search_paths();
        assert_eq!(paths.last(), Some(&PathBuf::from(PROJECT_CONFIG_FILE)));
    }
}
