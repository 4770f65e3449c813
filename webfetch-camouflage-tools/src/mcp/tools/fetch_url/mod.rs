//! `fetch_url` tool: camouflaged page fetch returned as Markdown

use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::ErrorData as McpError;
use std::sync::Arc;
use webfetch_camouflage_web::{FetchRequest, FetchTool};

/// MCP adapter over [`FetchTool::fetch_url`]
///
/// Fetch failures are reported as the tool's text result, not as MCP errors,
/// so callers always receive either Markdown or an `Error fetching URL` line.
pub struct FetchUrlTool {
    fetch: Arc<FetchTool>,
}

impl FetchUrlTool {
    pub fn new(fetch: Arc<FetchTool>) -> Self {
        Self { fetch }
    }
}

#[async_trait]
impl McpTool for FetchUrlTool {
    fn name(&self) -> &'static str {
        "fetch_url"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "URL to fetch"
                },
                "impersonate": {
                    "type": "string",
                    "description": "Browser profile to impersonate: a profile name (e.g. chrome136, safari184_ios), a family alias (chrome, edge, firefox, safari, safari_ios, tor, ...) or 'realworld'",
                    "default": self.fetch.default_impersonate()
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: FetchRequest = BaseToolImpl::parse_arguments(arguments)?;
        tracing::debug!(url = %request.url, "fetch_url invoked");

        tokio::select! {
            text = self.fetch.fetch_url(&request.url, request.impersonate.as_deref()) => {
                Ok(BaseToolImpl::create_success_response(text))
            }
            _ = context.cancellation.cancelled() => {
                tracing::info!(url = %request.url, "fetch_url cancelled");
                Err(McpError::internal_error(
                    format!("fetch_url cancelled for {}", request.url),
                    None,
                ))
            }
        }
    }
}
