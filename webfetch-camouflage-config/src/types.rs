//! Configuration data structures

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use webfetch_camouflage_web::Impersonate;

pub use webfetch_camouflage_web::DEFAULT_IMPERSONATE;

/// Server name reported to MCP clients
pub const DEFAULT_SERVER_NAME: &str = "WebFetch Camouflage";

/// Instructions reported to MCP clients
pub const DEFAULT_INSTRUCTIONS: &str = "Fetches web pages while presenting the fingerprint of a real browser \
and returns them as Markdown. Call fetch_url with a URL. The optional impersonate argument names a browser \
profile such as chrome, safari_ios or firefox135; it defaults to 'realworld', which picks a common browser \
for each request. Failures are returned as text starting with 'Error fetching URL'.";

/// Complete server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Browser profile used when `fetch_url` is called without `impersonate`
    pub default_impersonate: String,
    /// Identity reported during MCP initialization
    pub server: ServerIdentity,
    /// Streamable HTTP transport settings
    pub http: HttpConfig,
    /// Log filtering
    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            default_impersonate: DEFAULT_IMPERSONATE.to_string(),
            server: ServerIdentity::default(),
            http: HttpConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Reject values the server cannot start with.
    ///
    /// # Errors
    ///
    /// * `ConfigError::Validation` - `default_impersonate` or `server.name` is
    ///   blank, or `default_impersonate` names no known profile
    pub fn validate(&self) -> ConfigResult<()> {
        if self.default_impersonate.trim().is_empty() {
            return Err(ConfigError::validation(
                "default_impersonate must not be empty",
            ));
        }
        if let Err(e) = Impersonate::parse(&self.default_impersonate) {
            return Err(ConfigError::validation(format!("default_impersonate: {e}")));
        }
        if self.server.name.trim().is_empty() {
            return Err(ConfigError::validation("server.name must not be empty"));
        }
        Ok(())
    }
}

/// Server identity metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerIdentity {
    pub name: String,
    pub instructions: String,
}

impl Default for ServerIdentity {
    fn default() -> Self {
        Self {
            name: DEFAULT_SERVER_NAME.to_string(),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
        }
    }
}

/// HTTP transport settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Address to bind
    pub host: String,
    /// Port to bind; `None` lets the OS pick a free port
    pub port: Option<u16>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: None,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `"webfetch_camouflage_web=debug"`
    pub filter: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.default_impersonate, "realworld");
        assert_eq!(config.server.name, "WebFetch Camouflage");
        assert!(config.server.instructions.contains("fetch_url"));
        assert_eq!(config.http.host, "127.0.0.1");
        assert_eq!(config.http.port, None);
        assert_eq!(config.logging.filter, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_impersonate() {
        let config = ServerConfig {
            default_impersonate: "  ".to_string(),
            ..Default::default()
        };
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("default_impersonate"));
    }

    #[test]
    fn test_default_matches_fetch_tool_default() {
        assert_eq!(
            ServerConfig::default().default_impersonate,
            webfetch_camouflage_web::FetchTool::new().default_impersonate()
        );
    }

    #[test]
    fn test_validate_rejects_unknown_profile() {
        let config = ServerConfig {
            default_impersonate: "netscape4".to_string(),
            ..Default::default()
        };
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("netscape4"), "got: {error}");
    }

    #[test]
    fn test_validate_accepts_aliases() {
        for name in ["chrome", "safari_ios", "TOR", "edge101"] {
            let config = ServerConfig {
                default_impersonate: name.to_string(),
                ..Default::default()
            };
            assert!(config.validate().is_ok(), "{name}");
        }
    }

    #[test]
    fn test_validate_rejects_blank_server_name() {
        let mut config = ServerConfig::default();
        config.server.name = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { .. })
        ));
    }
}
