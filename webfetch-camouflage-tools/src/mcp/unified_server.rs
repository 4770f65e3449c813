//! MCP server startup for the stdio and streamable HTTP transports
//!
//! Both modes return an [`McpServerHandle`] carrying connection information,
//! a shutdown trigger and the background task to wait on.

use crate::error::ServerError;
use rmcp::transport::io::stdio;
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpService,
};
use rmcp::ServiceExt;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::server::McpServer;

/// Health check endpoint handler
async fn health_check() -> axum::response::Json<serde_json::Value> {
    axum::response::Json(serde_json::json!({
        "status": "healthy",
        "service": "webfetch-camouflage"
    }))
}

/// MCP server transport mode configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum McpServerMode {
    /// Standard input/output transport
    Stdio,
    /// HTTP transport with optional port specification
    /// None = random port assignment
    Http { port: Option<u16> },
}

/// Connection information returned after server startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpServerInfo {
    /// The transport mode used
    pub mode: McpServerMode,
    /// Connection URL or identifier
    pub connection_url: String,
    /// Actual bound port (for HTTP mode)
    pub port: Option<u16>,
}

/// Handle for managing MCP server lifecycle
#[derive(Debug)]
pub struct McpServerHandle {
    /// Server information
    pub info: McpServerInfo,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), ServerError>>>,
}

impl McpServerHandle {
    fn new(
        info: McpServerInfo,
        shutdown_tx: oneshot::Sender<()>,
        task: JoinHandle<Result<(), ServerError>>,
    ) -> Self {
        Self {
            info,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }

    /// Get the connection information
    pub fn info(&self) -> &McpServerInfo {
        &self.info
    }

    /// Get the actual port (for HTTP mode)
    pub fn port(&self) -> Option<u16> {
        self.info.port
    }

    /// Get the connection URL
    pub fn url(&self) -> &str {
        &self.info.connection_url
    }

    /// Ask the server to stop. Calling this more than once is harmless.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            if tx.send(()).is_err() {
                tracing::debug!("Server already stopped before shutdown signal");
            }
        }
    }

    /// Wait for the server task to finish, keeping the handle.
    ///
    /// Cancel safe, so it can race a shutdown signal in `tokio::select!`.
    /// Once the task has been awaited further calls return `Ok(())`.
    pub async fn stopped(&mut self) -> Result<(), ServerError> {
        let Some(task) = self.task.as_mut() else {
            return Ok(());
        };
        let result = task.await;
        self.task = None;
        result.map_err(|e| ServerError::Task(e.to_string()))?
    }

    /// Wait for the server task to finish.
    ///
    /// For stdio this returns when the client closes the connection; for HTTP
    /// after [`McpServerHandle::shutdown`].
    pub async fn wait(mut self) -> Result<(), ServerError> {
        self.stopped().await
    }
}

/// Start an MCP server with the specified transport mode
///
/// # Arguments
///
/// * `server` - The handler to serve
/// * `mode` - The transport mode (stdio or HTTP)
/// * `host` - Address to bind in HTTP mode, ignored for stdio
///
/// # Errors
///
/// * `ServerError::Bind` - The HTTP listener could not be bound
pub async fn start_mcp_server(
    server: McpServer,
    mode: McpServerMode,
    host: &str,
) -> Result<McpServerHandle, ServerError> {
    match mode {
        McpServerMode::Stdio => Ok(start_stdio_server(server)),
        McpServerMode::Http { port } => start_http_server(server, host, port).await,
    }
}

fn start_stdio_server(server: McpServer) -> McpServerHandle {
    tracing::info!("Starting MCP server in stdio mode");

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let cancellation = CancellationToken::new();

    let on_shutdown = cancellation.clone();
    tokio::spawn(async move {
        if shutdown_rx.await.is_ok() {
            on_shutdown.cancel();
        }
    });

    let task = tokio::spawn(async move {
        let running = server
            .serve_with_ct(stdio(), cancellation)
            .await
            .map_err(|e| ServerError::Transport(e.to_string()))?;
        tracing::info!("MCP stdio server started");

        let quit_reason = running
            .waiting()
            .await
            .map_err(|e| ServerError::Task(e.to_string()))?;
        tracing::info!("MCP stdio server completed: {:?}", quit_reason);
        Ok(())
    });

    let info = McpServerInfo {
        mode: McpServerMode::Stdio,
        connection_url: "stdio".to_string(),
        port: None,
    };

    McpServerHandle::new(info, shutdown_tx, task)
}

async fn start_http_server(
    server: McpServer,
    host: &str,
    port: Option<u16>,
) -> Result<McpServerHandle, ServerError> {
    let bind_addr = format!("{}:{}", host, port.unwrap_or(0));
    tracing::debug!("Binding HTTP MCP server to {}", bind_addr);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: bind_addr.clone(),
            source,
        })?;
    let actual_port = listener
        .local_addr()
        .map_err(|source| ServerError::Bind {
            addr: bind_addr.clone(),
            source,
        })?
        .port();

    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let router = axum::Router::new()
        .nest_service("/mcp", service)
        .route("/health", axum::routing::get(health_check));

    let connection_url = format!("http://{}:{}/mcp", host, actual_port);
    tracing::info!("HTTP MCP server ready on {}", connection_url);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .map_err(|e| ServerError::Transport(e.to_string()))
    });

    let info = McpServerInfo {
        mode: McpServerMode::Http {
            port: Some(actual_port),
        },
        connection_url,
        port: Some(actual_port),
    };

    Ok(McpServerHandle::new(info, shutdown_tx, task))
}
