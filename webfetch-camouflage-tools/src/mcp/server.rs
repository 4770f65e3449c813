//! MCP server handler exposing the registered tools

use super::tool_registry::{ToolContext, ToolRegistry};
use super::tools::register_fetch_tools;
use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};
use std::sync::Arc;
use webfetch_camouflage_config::{ServerConfig, ServerIdentity};
use webfetch_camouflage_web::FetchTool;

/// rmcp [`ServerHandler`] backed by a [`ToolRegistry`]
///
/// Cloning is cheap; every MCP session gets a clone sharing the same registry.
#[derive(Clone)]
pub struct McpServer {
    tool_registry: Arc<ToolRegistry>,
    identity: ServerIdentity,
}

fn create_server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        tools: Some(ToolsCapability {
            list_changed: Some(false),
        }),
        ..Default::default()
    }
}

impl McpServer {
    /// Create a server wired to the production fetch pipeline.
    ///
    /// # Arguments
    ///
    /// * `config` - Supplies the server identity and the default impersonation
    pub fn new(config: &ServerConfig) -> Self {
        let fetch = FetchTool::builder()
            .default_impersonate(config.default_impersonate.clone())
            .build();
        Self::with_fetch_tool(config, Arc::new(fetch))
    }

    /// Create a server around an already constructed fetch tool
    pub fn with_fetch_tool(config: &ServerConfig, fetch: Arc<FetchTool>) -> Self {
        let mut registry = ToolRegistry::new();
        register_fetch_tools(&mut registry, fetch);

        tracing::debug!(
            tools = ?registry.list_tool_names(),
            "MCP server tool registry ready"
        );

        Self {
            tool_registry: Arc::new(registry),
            identity: config.server.clone(),
        }
    }

    /// The registered tools
    pub fn tool_registry(&self) -> &ToolRegistry {
        &self.tool_registry
    }

    fn create_server_implementation(&self) -> Implementation {
        Implementation {
            name: self.identity.name.clone(),
            title: Some(format!("{} MCP Server", self.identity.name)),
            version: crate::VERSION.into(),
            description: None,
            website_url: None,
            icons: None,
        }
    }

    /// Look up and run a tool by name
    ///
    /// # Errors
    ///
    /// Returns `invalid_params` for unknown tool names and whatever the tool
    /// itself reports for malformed arguments or cancellation.
    pub async fn execute_tool(
        &self,
        name: &str,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let tool = self.tool_registry.get_tool(name).ok_or_else(|| {
            tracing::warn!("Unknown tool requested: {}", name);
            McpError::invalid_params(format!("Unknown tool: {name}"), None)
        })?;

        let result = tool.execute(arguments, context).await;
        match &result {
            Ok(_) => tracing::debug!("Tool '{}' completed", name),
            Err(e) => tracing::warn!("Tool '{}' failed: {}", name, e.message),
        }
        result
    }
}

impl ServerHandler for McpServer {
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(
            self.tool_registry.list_tools(),
        ))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        tracing::debug!("call_tool invoked for tool: {}", request.name);

        let tool_context = ToolContext::new(context.ct.clone());
        let arguments = request.arguments.unwrap_or_default();

        self.execute_tool(&request.name, arguments, &tool_context)
            .await
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: create_server_capabilities(),
            server_info: self.create_server_implementation(),
            instructions: Some(self.identity.instructions.clone()),
        }
    }
}
