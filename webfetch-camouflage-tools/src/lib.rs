//! WebFetch Camouflage Tools
//!
//! MCP surface for the browser-camouflaged fetch pipeline: the tool trait and
//! registry, the `fetch_url` tool, the rmcp server handler and the stdio and
//! streamable HTTP transports.

pub mod error;
pub mod mcp;

pub use error::ServerError;
pub use mcp::{
    register_fetch_tools, start_mcp_server, BaseToolImpl, FetchUrlTool, McpServer,
    McpServerHandle, McpServerInfo, McpServerMode, McpTool, ToolContext, ToolRegistry,
};

/// Version of this crate, reported to MCP clients
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
