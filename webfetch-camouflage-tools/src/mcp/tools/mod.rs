//! MCP tool implementations
//!
//! Each tool lives in its own submodule with a `description.md` alongside.
//! Registration is explicit: the server builds the domain objects and hands
//! them to the `register_*` functions here.

pub mod fetch_url;

use crate::mcp::tool_registry::ToolRegistry;
use std::sync::Arc;
use webfetch_camouflage_web::FetchTool;

/// Register the fetch tools backed by `fetch`
pub fn register_fetch_tools(registry: &mut ToolRegistry, fetch: Arc<FetchTool>) {
    registry.register(fetch_url::FetchUrlTool::new(fetch));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_fetch_tools() {
        let mut registry = ToolRegistry::new();
        register_fetch_tools(&mut registry, Arc::new(FetchTool::new()));

        assert_eq!(registry.len(), 1);
        assert!(registry.get_tool("fetch_url").is_some());
    }
}
