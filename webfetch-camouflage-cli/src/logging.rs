//! Tracing subscriber setup
//!
//! Logs always go to stderr: in stdio mode stdout carries the MCP protocol.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// Pick the filter directive for this run
///
/// `RUST_LOG` wins over the configured filter, which wins over the level
/// derived from `--debug` / `--quiet`.
pub fn filter_directive(debug: bool, quiet: bool, configured: Option<&str>) -> String {
    if let Ok(env_filter) = std::env::var(EnvFilter::DEFAULT_ENV) {
        if !env_filter.trim().is_empty() {
            return env_filter;
        }
    }
    if let Some(configured) = configured.filter(|f| !f.trim().is_empty()) {
        return configured.to_string();
    }

    let log_level = if quiet {
        Level::ERROR
    } else if debug {
        Level::DEBUG
    } else {
        Level::INFO
    };
    format!("rmcp=warn,{log_level}")
}

/// Install the global subscriber
pub fn configure_logging(debug: bool, quiet: bool, configured: Option<&str>) {
    let directive = filter_directive(debug, quiet, configured);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("Warning: invalid log filter '{directive}': {e}. Using 'info'.");
        EnvFilter::new("rmcp=warn,info")
    });

    let result = registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
    if let Err(e) = result {
        eprintln!("Warning: logging already initialized: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Only meaningful when RUST_LOG is unset in the test environment
    fn rust_log_unset() -> bool {
        std::env::var(EnvFilter::DEFAULT_ENV).is_err()
    }

    #[test]
    fn test_default_levels() {
        if !rust_log_unset() {
            return;
        }
        assert_eq!(filter_directive(false, false, None), "rmcp=warn,INFO");
        assert_eq!(filter_directive(true, false, None), "rmcp=warn,DEBUG");
        assert_eq!(filter_directive(false, true, None), "rmcp=warn,ERROR");
    }

    #[test]
    fn test_configured_filter_overrides_flags() {
        if !rust_log_unset() {
            return;
        }
        assert_eq!(
            filter_directive(true, false, Some("webfetch_camouflage_web=trace")),
            "webfetch_camouflage_web=trace"
        );
        assert_eq!(filter_directive(false, false, Some("  ")), "rmcp=warn,INFO");
    }
}
