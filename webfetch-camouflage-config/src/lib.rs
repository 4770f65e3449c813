//! WebFetch Camouflage configuration management using Figment
//!
//! Configuration is merged from defaults, TOML files and `WEBFETCH_`
//! environment variables into a typed [`ServerConfig`].
//!
//! # Configuration Files
//!
//! - User: `<config dir>/webfetch-camouflage/config.toml`
//! - Project: `./webfetch-camouflage.toml`
//! - Explicit: any path passed to [`ConfigProvider::with_config_file`]
//!
//! ## Example TOML Configuration
//!
//! ```toml
//! default_impersonate = "chrome"
//!
//! [server]
//! name = "WebFetch Camouflage"
//!
//! [http]
//! host = "0.0.0.0"
//! port = 8000
//!
//! [logging]
//! filter = "webfetch_camouflage_web=debug"
//! ```
//!
//! ## Environment Variables
//!
//! Nested keys are separated by a double underscore:
//!
//! ```bash
//! export WEBFETCH_DEFAULT_IMPERSONATE=safari_ios
//! export WEBFETCH_HTTP__PORT=9000
//! ```

pub mod error;
pub mod provider;
pub mod types;

pub use error::ConfigError;
pub use provider::{ConfigProvider, ENV_PREFIX, PROJECT_CONFIG_FILE};
pub use types::{
    HttpConfig, LoggingConfig, ServerConfig, ServerIdentity, DEFAULT_IMPERSONATE,
    DEFAULT_INSTRUCTIONS, DEFAULT_SERVER_NAME,
};

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Load configuration from the standard locations and environment
pub fn load_configuration() -> ConfigResult<ServerConfig> {
    ConfigProvider::new().load()
}
