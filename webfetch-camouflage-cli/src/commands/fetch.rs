//! `fetch` command: run the fetch pipeline once from the command line

use crate::commands::write_output;
use crate::error::CliResult;
use webfetch_camouflage_config::ServerConfig;
use webfetch_camouflage_web::FetchTool;

/// Build the fetch tool the same way the MCP server does
pub fn build_fetch_tool(config: &ServerConfig) -> FetchTool {
    FetchTool::builder()
        .default_impersonate(config.default_impersonate.clone())
        .build()
}

/// Fetch `url` and return the text the `fetch_url` tool would return
pub async fn fetch_markdown(config: &ServerConfig, url: &str, impersonate: Option<&str>) -> String {
    build_fetch_tool(config).fetch_url(url, impersonate).await
}

/// Handle the fetch command
///
/// Fetch failures are part of the printed text, so this only fails if
/// stdout cannot be written.
pub async fn handle_command(
    config: &ServerConfig,
    url: &str,
    impersonate: Option<&str>,
) -> CliResult<()> {
    let text = fetch_markdown(config, url, impersonate).await;
    write_output(std::io::stdout().lock(), &format!("{text}\n"))
}
