//! Serve command implementation
//!
//! Starts the MCP server exposing `fetch_url` over stdio or streamable HTTP.

use crate::cli::ServeSubcommand;
use crate::error::{CliError, CliResult};
use crate::exit_codes::EXIT_WARNING;
use crate::signal_handler::wait_for_shutdown;
use std::future::Future;
use webfetch_camouflage_config::ServerConfig;
use webfetch_camouflage_tools::{
    start_mcp_server, McpServer, McpServerHandle, McpServerMode, ServerError,
};

/// Resolve the transport mode and bind host from flags and configuration
///
/// Command-line values win over the `[http]` section of the configuration.
pub fn resolve_mode(
    subcommand: Option<&ServeSubcommand>,
    config: &ServerConfig,
) -> (McpServerMode, String) {
    match subcommand {
        None => (McpServerMode::Stdio, config.http.host.clone()),
        Some(ServeSubcommand::Http { port, host }) => (
            McpServerMode::Http {
                port: port.or(config.http.port),
            },
            host.clone().unwrap_or_else(|| config.http.host.clone()),
        ),
    }
}

/// Handle the serve command
///
/// Stdio mode runs until the client closes the connection. HTTP mode runs
/// until Ctrl+C or SIGTERM, then shuts down gracefully.
pub async fn handle_command(
    subcommand: Option<&ServeSubcommand>,
    config: &ServerConfig,
) -> CliResult<()> {
    let (mode, host) = resolve_mode(subcommand, config);
    let server = McpServer::new(config);

    let mut handle = start_mcp_server(server, mode.clone(), &host).await?;

    if mode == McpServerMode::Stdio {
        tracing::debug!("Serving MCP over stdio");
        handle.wait().await?;
        return Ok(());
    }

    // Printed on stderr so scripts can pick up a randomly assigned port
    eprintln!(
        "MCP HTTP server running on {} (health: http://{}:{}/health). Use Ctrl+C to stop.",
        handle.url(),
        host,
        handle.port().unwrap_or_default()
    );

    run_until(&mut handle, wait_for_shutdown()).await
}

/// Keep an HTTP server running until `shutdown` resolves, then stop it
///
/// A server task that ends first, cleanly or not, is reported as a warning.
pub async fn run_until<F>(handle: &mut McpServerHandle, shutdown: F) -> CliResult<()>
where
    F: Future<Output = ()>,
{
    tokio::select! {
        _ = shutdown => {}
        result = handle.stopped() => return Err(unexpected_stop(result)),
    }

    tracing::info!("Shutting down HTTP MCP server");
    handle.shutdown();
    handle.stopped().await?;
    tracing::info!("Server stopped");
    Ok(())
}

fn unexpected_stop(result: Result<(), ServerError>) -> CliError {
    let mut error = match result {
        Ok(()) => CliError::new("HTTP MCP server stopped unexpectedly", EXIT_WARNING),
        Err(e) => e.into(),
    };
    error.exit_code = EXIT_WARNING;
    error
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn http_handle() -> McpServerHandle {
        let server = McpServer::new(&ServerConfig::default());
        start_mcp_server(server, McpServerMode::Http { port: None }, "127.0.0.1")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_run_until_stops_server_on_signal() {
        let mut handle = http_handle().await;

        run_until(&mut handle, async {}).await.unwrap();

        let port = handle.port().unwrap();
        assert!(std::net::TcpStream::connect(("127.0.0.1", port)).is_err());
    }

    #[tokio::test]
    async fn test_run_until_reports_server_that_stops_on_its_own() {
        let mut handle = http_handle().await;
        // Stop the server behind run_until's back; the signal never arrives
        handle.shutdown();

        let error = run_until(&mut handle, std::future::pending())
            .await
            .unwrap_err();

        assert_eq!(error.exit_code, EXIT_WARNING);
        assert!(error.message.contains("stopped unexpectedly"), "{}", error.message);
    }

    #[test]
    fn test_task_failure_is_a_warning() {
        let error = unexpected_stop(Err(ServerError::Task("panicked".to_string())));
        assert_eq!(error.exit_code, EXIT_WARNING);
        assert!(error.message.contains("panicked"), "{}", error.message);
    }

    #[test]
    fn test_stdio_mode_without_subcommand() {
        let (mode, _) = resolve_mode(None, &ServerConfig::default());
        assert_eq!(mode, McpServerMode::Stdio);
    }

    #[test]
    fn test_http_mode_falls_back_to_config() {
        let mut config = ServerConfig::default();
        config.http.host = "0.0.0.0".to_string();
        config.http.port = Some(8123);

        let flags = ServeSubcommand::Http {
            port: None,
            host: None,
        };
        let (mode, host) = resolve_mode(Some(&flags), &config);

        assert_eq!(mode, McpServerMode::Http { port: Some(8123) });
        assert_eq!(host, "0.0.0.0");
    }

    #[test]
    fn test_http_flags_override_config() {
        let mut config = ServerConfig::default();
        config.http.port = Some(8123);

        let flags = ServeSubcommand::Http {
            port: Some(0),
            host: Some("localhost".to_string()),
        };
        let (mode, host) = resolve_mode(Some(&flags), &config);

        assert_eq!(mode, McpServerMode::Http { port: Some(0) });
        assert_eq!(host, "localhost");
    }
}
