//! Error handling for the WebFetch Camouflage CLI
//!
//! Errors keep their cause chain and carry the exit code the process should
//! terminate with.

use std::fmt;

use crate::exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_WARNING};
use webfetch_camouflage_config::ConfigError;
use webfetch_camouflage_tools::ServerError;

/// CLI-specific result type that preserves error information
pub type CliResult<T> = Result<T, CliError>;

/// CLI error with a message, a suggested exit code and the underlying cause
#[derive(Debug)]
pub struct CliError {
    pub message: String,
    pub exit_code: i32,
    pub source: Option<anyhow::Error>,
}

impl CliError {
    /// Create a new CLI error with a message and exit code
    pub fn new(message: impl Into<String>, exit_code: i32) -> Self {
        Self {
            message: message.into(),
            exit_code,
            source: None,
        }
    }

    /// Get the full error chain as a formatted string
    pub fn full_chain(&self) -> String {
        let mut result = self.message.clone();
        if let Some(source) = &self.source {
            for cause in source.chain() {
                let cause = cause.to_string();
                if cause != self.message {
                    result.push_str(&format!("\n  Caused by: {cause}"));
                }
            }
        }
        result
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        Self {
            message: error.to_string(),
            exit_code: EXIT_ERROR,
            source: Some(error.into()),
        }
    }
}

/// Bind failures mean the server never started; anything later is a warning
impl From<ServerError> for CliError {
    fn from(error: ServerError) -> Self {
        let exit_code = match error {
            ServerError::Bind { .. } => EXIT_ERROR,
            ServerError::Transport(_) | ServerError::Task(_) => EXIT_WARNING,
        };
        Self {
            message: error.to_string(),
            exit_code,
            source: Some(error.into()),
        }
    }
}

/// Convert a CliResult to an exit code, logging the full error chain if needed
pub fn handle_cli_result<T>(result: CliResult<T>) -> i32 {
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => {
            tracing::error!("{}", e.full_chain());
            e.exit_code
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_config_error_is_fatal() {
        let error: CliError = ConfigError::FileNotFound {
            path: PathBuf::from("missing.toml"),
        }
        .into();

        assert_eq!(error.exit_code, EXIT_ERROR);
        assert_eq!(error.to_string(), "Configuration file not found: missing.toml");
    }

    #[test]
    fn test_bind_error_is_fatal_but_transport_error_is_warning() {
        let bind: CliError = ServerError::Bind {
            addr: "127.0.0.1:80".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
        }
        .into();
        assert_eq!(bind.exit_code, EXIT_ERROR);

        let transport: CliError = ServerError::Transport("stdin closed".to_string()).into();
        assert_eq!(transport.exit_code, EXIT_WARNING);
    }

    #[test]
    fn test_full_chain_includes_causes() {
        let bind: CliError = ServerError::Bind {
            addr: "127.0.0.1:80".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use"),
        }
        .into();

        let chain = bind.full_chain();
        assert!(chain.starts_with("Failed to bind to 127.0.0.1:80"));
        assert!(chain.contains("Caused by: address in use"), "{chain}");
    }

    #[test]
    fn test_handle_cli_result() {
        assert_eq!(handle_cli_result::<()>(Ok(())), EXIT_SUCCESS);
        assert_eq!(
            handle_cli_result::<()>(Err(CliError::new("boom", EXIT_WARNING))),
            EXIT_WARNING
        );
    }
}
