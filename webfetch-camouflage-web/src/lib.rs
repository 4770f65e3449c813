//! WebFetch Camouflage Web
//!
//! Core crate for browser-camouflaged URL fetching.
//! Provides browser impersonation profiles, a fingerprinted HTTP client,
//! script/style sanitization and HTML-to-markdown conversion, wired together
//! by the [`FetchTool`] pipeline.
//!
//! This crate contains pure web domain logic with no MCP protocol dependency.
//! The MCP tool adapters live in `webfetch-camouflage-tools`.

pub mod client;
pub mod convert;
pub mod error;
pub mod fetch;
pub mod impersonate;
pub mod sanitize;

// Re-export key types
pub use client::{EmulatingFetcher, FetchedPage, PageFetcher};
pub use convert::{ConverterOptions, HtmlToMarkdown, MarkdownConverter};
pub use error::FetchError;
pub use fetch::{
    format_fetch_error, FetchRequest, FetchResult, FetchTool, FetchToolBuilder, MarkdownText,
    DEFAULT_IMPERSONATE,
};
pub use impersonate::{BrowserFamily, BrowserProfile, Impersonate, REALWORLD};
pub use sanitize::{strip_script_and_style, MarkupSanitizer};
