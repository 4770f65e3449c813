//! Tool registry for MCP operations
//!
//! # Architecture Overview
//!
//! 1. **McpTool Trait**: Defines the interface that all tools must implement
//! 2. **ToolRegistry**: Stores tool instances and answers `list_tools` lookups
//! 3. **ToolContext**: Per-call context handed to the executing tool
//! 4. **BaseToolImpl**: Common utility methods for tool implementations
//!
//! # Creating New Tools
//!
//! ```rust,ignore
//! use async_trait::async_trait;
//! use webfetch_camouflage_tools::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
//!
//! pub struct EchoTool;
//!
//! #[async_trait]
//! impl McpTool for EchoTool {
//!     fn name(&self) -> &'static str {
//!         "echo"
//!     }
//!
//!     fn description(&self) -> &'static str {
//!         include_str!("description.md")
//!     }
//!
//!     fn schema(&self) -> serde_json::Value {
//!         serde_json::json!({
//!             "type": "object",
//!             "properties": {
//!                 "text": {"type": "string", "description": "Text to echo"}
//!             },
//!             "required": ["text"]
//!         })
//!     }
//!
//!     async fn execute(
//!         &self,
//!         arguments: serde_json::Map<String, serde_json::Value>,
//!         _context: &ToolContext,
//!     ) -> std::result::Result<CallToolResult, McpError> {
//!         let request: EchoRequest = BaseToolImpl::parse_arguments(arguments)?;
//!         Ok(BaseToolImpl::create_success_response(request.text))
//!     }
//! }
//! ```

use rmcp::model::{CallToolResult, Content, Tool};
use rmcp::ErrorData as McpError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Context passed to a tool for a single invocation
///
/// Carries the cancellation token of the in-flight MCP request. Tools doing
/// network I/O should race their work against
/// [`CancellationToken::cancelled`] so a client-side cancel aborts the
/// outbound request.
#[derive(Clone, Debug, Default)]
pub struct ToolContext {
    /// Cancelled when the client cancels the request or the session ends
    pub cancellation: CancellationToken,
}

impl ToolContext {
    /// Create a new tool context
    pub fn new(cancellation: CancellationToken) -> Self {
        Self { cancellation }
    }
}

/// Trait defining the interface for all MCP tools
///
/// # Implementation Guidelines
///
/// ## Tool Names
/// Names must be unique within the registry and stable across versions.
///
/// ## Descriptions
/// Use `include_str!("description.md")` to load descriptions from separate
/// Markdown files.
///
/// ## Error Handling
/// Return `McpError` only for protocol-level problems such as malformed
/// arguments. Failures of the operation itself belong in the tool's text
/// result.
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Get the tool's unique identifier name
    fn name(&self) -> &'static str;

    /// Get the tool's human-readable description
    fn description(&self) -> &'static str;

    /// Get the tool's JSON schema for argument validation
    ///
    /// The schema must be a JSON object; anything else is published as an
    /// empty object schema.
    fn schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments and context
    ///
    /// # Implementation Pattern
    ///
    /// 1. Parse arguments using `BaseToolImpl::parse_arguments()`
    /// 2. Perform the operation, honouring `context.cancellation`
    /// 3. Return the response using `BaseToolImpl::create_success_response()`
    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError>;
}

/// Registry for managing MCP tools
///
/// Tools are registered once at server construction and looked up by name
/// for every `call_tool` request.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn McpTool>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool in the registry, replacing any tool with the same name
    pub fn register<T: McpTool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), Box::new(tool)).is_some() {
            tracing::warn!("Tool '{}' registered twice; keeping the latest", name);
        }
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<&dyn McpTool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    /// List all registered tool names, sorted
    pub fn list_tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get all registered tools as Tool objects for MCP list_tools response
    pub fn list_tools(&self) -> Vec<Tool> {
        let mut tools: Vec<Tool> = self
            .tools
            .values()
            .map(|tool| {
                let schema_map = match tool.schema() {
                    serde_json::Value::Object(map) => map,
                    _ => serde_json::Map::new(),
                };
                Tool::new(tool.name(), tool.description(), Arc::new(schema_map))
            })
            .collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Common utility functions for tool implementations
pub struct BaseToolImpl;

impl BaseToolImpl {
    /// Parse arguments from a JSON map into a typed request
    ///
    /// # Errors
    ///
    /// Returns `invalid_params` when the arguments do not match `T`.
    pub fn parse_arguments<T: serde::de::DeserializeOwned>(
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> std::result::Result<T, McpError> {
        serde_json::from_value(serde_json::Value::Object(arguments))
            .map_err(|e| McpError::invalid_params(format!("Invalid arguments: {e}"), None))
    }

    /// Create a success response with a single text block
    pub fn create_success_response<T: Into<String>>(content: T) -> CallToolResult {
        CallToolResult::success(vec![Content::text(content.into())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    struct EchoTool;

    #[derive(Deserialize)]
    struct EchoRequest {
        text: String,
    }

    #[async_trait::async_trait]
    impl McpTool for EchoTool {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn description(&self) -> &'static str {
            "Echo the text back"
        }

        fn schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": { "text": { "type": "string" } },
                "required": ["text"]
            })
        }

        async fn execute(
            &self,
            arguments: serde_json::Map<String, serde_json::Value>,
            _context: &ToolContext,
        ) -> std::result::Result<CallToolResult, McpError> {
            let request: EchoRequest = BaseToolImpl::parse_arguments(arguments)?;
            Ok(BaseToolImpl::create_success_response(request.text))
        }
    }

    struct SchemalessTool;

    #[async_trait::async_trait]
    impl McpTool for SchemalessTool {
        fn name(&self) -> &'static str {
            "schemaless"
        }

        fn description(&self) -> &'static str {
            "Tool with a non-object schema"
        }

        fn schema(&self) -> serde_json::Value {
            serde_json::Value::Null
        }

        async fn execute(
            &self,
            _arguments: serde_json::Map<String, serde_json::Value>,
            _context: &ToolContext,
        ) -> std::result::Result<CallToolResult, McpError> {
            Ok(BaseToolImpl::create_success_response(""))
        }
    }

    fn text_of(result: &CallToolResult) -> &str {
        result.content[0]
            .as_text()
            .map(|text| text.text.as_str())
            .unwrap()
    }

    #[test]
    fn test_tool_registry_creation() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.list_tools().is_empty());
    }

    #[test]
    fn test_tool_registration_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);
        registry.register(SchemalessTool);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.list_tool_names(), vec!["echo", "schemaless"]);
        assert_eq!(registry.get_tool("echo").unwrap().name(), "echo");
        assert!(registry.get_tool("missing").is_none());
    }

    #[test]
    fn test_duplicate_registration_keeps_one_entry() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);
        registry.register(EchoTool);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_list_tools_publishes_schema() {
        let mut registry = ToolRegistry::new();
        registry.register(SchemalessTool);
        registry.register(EchoTool);

        let tools = registry.list_tools();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].name, "echo");
        assert_eq!(tools[0].description.as_deref(), Some("Echo the text back"));
        assert_eq!(
            tools[0].input_schema.get("required"),
            Some(&serde_json::json!(["text"]))
        );
        assert!(tools[1].input_schema.is_empty());
    }

    #[tokio::test]
    async fn test_execute_through_registry() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let mut arguments = serde_json::Map::new();
        arguments.insert("text".to_string(), serde_json::json!("hello"));

        let result = registry
            .get_tool("echo")
            .unwrap()
            .execute(arguments, &ToolContext::default())
            .await
            .unwrap();

        assert_eq!(text_of(&result), "hello");
        assert_eq!(result.is_error, Some(false));
    }

    #[test]
    fn test_parse_arguments_rejects_missing_field() {
        let error = BaseToolImpl::parse_arguments::<EchoRequest>(serde_json::Map::new())
            .err()
            .unwrap();
        assert!(error.message.contains("Invalid arguments"));
    }
}
