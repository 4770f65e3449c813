use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "webfetch-camouflage")]
#[command(version)]
#[command(about = "An MCP server that fetches web pages disguised as a real browser")]
#[command(long_about = "
webfetch-camouflage is an MCP (Model Context Protocol) server exposing a single
tool, fetch_url. The tool downloads a page while presenting the request headers
of a real browser, strips <script> and <style> elements and returns the page as
Markdown with links, images and tables preserved.

Global arguments can be used with any command:
  --debug       Enable debug logging
  --quiet       Suppress all log output except errors
  --config      Load an additional TOML configuration file

Example usage:
  webfetch-camouflage serve                                  # MCP over stdio
  webfetch-camouflage serve http --port 8000                 # MCP over HTTP
  webfetch-camouflage fetch https://example.com              # One-off fetch
  webfetch-camouflage fetch https://example.com -i firefox   # Pick a browser
  webfetch-camouflage profiles                               # List browsers
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "debug")]
    pub quiet: bool,

    /// Configuration file layered over the discovered ones
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run as MCP server (stdio unless a transport subcommand is given)
    #[command(long_about = "
Run as MCP server. Without a subcommand the server speaks MCP over stdin and
stdout, which is how MCP clients launch it. Logs always go to stderr.

Example:
  webfetch-camouflage serve        # Stdio mode (default)
  webfetch-camouflage serve http   # HTTP mode
")]
    Serve {
        #[command(subcommand)]
        subcommand: Option<ServeSubcommand>,
    },
    /// Fetch one URL and print it as Markdown
    #[command(long_about = "
Run the fetch_url pipeline once and print the result to stdout. Fetch failures
are printed as 'Error fetching URL <url>: <detail>' exactly as the MCP tool
returns them, and the command still exits successfully.

Example:
  webfetch-camouflage fetch https://example.com
  webfetch-camouflage fetch https://example.com --impersonate safari_ios
")]
    Fetch {
        /// URL to fetch
        url: String,

        /// Browser profile, family alias or 'realworld'
        #[arg(short, long)]
        impersonate: Option<String>,
    },
    /// List the browser profiles that can be impersonated
    Profiles {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ServeSubcommand {
    /// Start HTTP MCP server
    #[command(long_about = "
Start the MCP server on the streamable HTTP transport. The MCP endpoint is
served at /mcp and a health check at /health. Port 0 picks a random free port.
Stop the server with Ctrl+C.

Example:
  webfetch-camouflage serve http --port 8080 --host 127.0.0.1
  webfetch-camouflage serve http --port 0  # Random port
")]
    Http {
        /// Port to bind to (defaults to the configured port, else random)
        #[arg(long, short = 'p', value_parser = clap::value_parser!(u16))]
        port: Option<u16>,

        /// Host to bind to (defaults to the configured host)
        #[arg(long, short = 'H')]
        host: Option<String>,
    },
}
