//! Model Context Protocol (MCP) server support

pub mod server;
pub mod tool_registry;
pub mod tools;
pub mod unified_server;

pub use server::McpServer;
pub use tool_registry::{BaseToolImpl, McpTool, ToolContext, ToolRegistry};
pub use tools::fetch_url::FetchUrlTool;
pub use tools::register_fetch_tools;
pub use unified_server::{start_mcp_server, McpServerHandle, McpServerInfo, McpServerMode};
