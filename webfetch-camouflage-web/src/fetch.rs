//! Fetch pipeline: fingerprinted GET, sanitize, convert to markdown
//!
//! [`FetchTool::fetch`] is the typed entry point. [`FetchTool::fetch_url`]
//! flattens the result into the single-string contract exposed to tool
//! callers, where failures read `"Error fetching URL {url}: {detail}"`.

use crate::client::{EmulatingFetcher, PageFetcher};
use crate::convert::{HtmlToMarkdown, MarkdownConverter};
use crate::error::FetchError;
use crate::sanitize::MarkupSanitizer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Impersonation used when a request does not name one
pub const DEFAULT_IMPERSONATE: &str = crate::impersonate::REALWORLD;

/// A single fetch invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    /// URL to fetch, handed to the HTTP client as-is
    pub url: String,
    /// Browser profile name; the tool's default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impersonate: Option<String>,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            impersonate: None,
        }
    }

    pub fn with_impersonate(mut self, impersonate: impl Into<String>) -> Self {
        self.impersonate = Some(impersonate.into());
        self
    }
}

/// Markdown produced by a successful fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownText(String);

impl MarkdownText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MarkdownText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<MarkdownText> for String {
    fn from(text: MarkdownText) -> Self {
        text.0
    }
}

pub type FetchResult = Result<MarkdownText, FetchError>;

/// Render a failure in the flat string form returned to tool callers
pub fn format_fetch_error(url: &str, error: &FetchError) -> String {
    format!("Error fetching URL {url}: {error}")
}

/// Orchestrates fetching, sanitizing and converting a page.
///
/// Collaborators are injected so tests and alternative transports can
/// substitute the HTTP client or the converter.
#[derive(Clone)]
pub struct FetchTool {
    fetcher: Arc<dyn PageFetcher>,
    sanitizer: MarkupSanitizer,
    converter: Arc<dyn HtmlToMarkdown>,
    default_impersonate: String,
}

impl fmt::Debug for FetchTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchTool")
            .field("default_impersonate", &self.default_impersonate)
            .finish_non_exhaustive()
    }
}

impl Default for FetchTool {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchTool {
    /// Creates a tool wired to the browser-emulating client and `htmd` converter.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts a builder with production collaborators preselected.
    pub fn builder() -> FetchToolBuilder {
        FetchToolBuilder::default()
    }

    /// Impersonation applied when a request leaves it unset
    pub fn default_impersonate(&self) -> &str {
        &self.default_impersonate
    }

    /// Fetch a page and convert it to markdown.
    ///
    /// # Arguments
    ///
    /// * `request` - URL and optional impersonation profile. The profile name
    ///   is forwarded to the fetcher unchanged.
    ///
    /// # Errors
    ///
    /// Returns whatever the fetcher reports (invalid URL, unsupported profile,
    /// transport failures) and `FetchError::Conversion` if markdown
    /// conversion fails.
    pub async fn fetch(&self, request: &FetchRequest) -> FetchResult {
        let url = request.url.as_str();
        let impersonate = request
            .impersonate
            .as_deref()
            .unwrap_or(self.default_impersonate.as_str());

        tracing::debug!(url, impersonate, "fetching url");

        let result = self.run(url, impersonate).await;
        if let Err(error) = &result {
            tracing::warn!(url, impersonate, kind = error.kind(), %error, "fetch failed");
        }
        result
    }

    async fn run(&self, url: &str, impersonate: &str) -> FetchResult {
        let page = self.fetcher.get(url, impersonate).await?;
        let html = self.sanitizer.sanitize(&page.body);
        let markdown = self.converter.convert(&html)?;

        tracing::info!(
            url,
            status = page.status,
            html_bytes = page.body.len(),
            markdown_bytes = markdown.len(),
            "fetched url"
        );

        Ok(MarkdownText(markdown))
    }

    /// Fetch a page, returning markdown or a descriptive error string.
    ///
    /// This never fails: any error becomes
    /// `"Error fetching URL {url}: {detail}"`.
    pub async fn fetch_url(&self, url: &str, impersonate: Option<&str>) -> String {
        let request = FetchRequest {
            url: url.to_string(),
            impersonate: impersonate.map(str::to_string),
        };

        match self.fetch(&request).await {
            Ok(markdown) => markdown.into_string(),
            Err(error) => format_fetch_error(url, &error),
        }
    }
}

/// Builder for [`FetchTool`]
pub struct FetchToolBuilder {
    fetcher: Option<Arc<dyn PageFetcher>>,
    converter: Option<Arc<dyn HtmlToMarkdown>>,
    sanitizer: MarkupSanitizer,
    default_impersonate: String,
}

impl Default for FetchToolBuilder {
    fn default() -> Self {
        Self {
            fetcher: None,
            converter: None,
            sanitizer: MarkupSanitizer::new(),
            default_impersonate: DEFAULT_IMPERSONATE.to_string(),
        }
    }
}

impl FetchToolBuilder {
    pub fn fetcher(mut self, fetcher: Arc<dyn PageFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn converter(mut self, converter: Arc<dyn HtmlToMarkdown>) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn sanitizer(mut self, sanitizer: MarkupSanitizer) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    /// Impersonation used for requests without one
    pub fn default_impersonate(mut self, impersonate: impl Into<String>) -> Self {
        self.default_impersonate = impersonate.into();
        self
    }

    pub fn build(self) -> FetchTool {
        FetchTool {
            fetcher: self
                .fetcher
                .unwrap_or_else(|| Arc::new(EmulatingFetcher::new()) as Arc<dyn PageFetcher>),
            sanitizer: self.sanitizer,
            converter: self
                .converter
                .unwrap_or_else(|| Arc::new(MarkdownConverter::new()) as Arc<dyn HtmlToMarkdown>),
            default_impersonate: self.default_impersonate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::FetchedPage;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Fetcher that records calls and replays a canned outcome
    struct RecordingFetcher {
        outcome: Result<String, FetchError>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl RecordingFetcher {
        fn returning(body: &str) -> Arc<Self> {
            Arc::new(Self {
                outcome: Ok(body.to_string()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn failing(error: FetchError) -> Arc<Self> {
            Arc::new(Self {
                outcome: Err(error),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for RecordingFetcher {
        async fn get(&self, url: &str, impersonate: &str) -> Result<FetchedPage, FetchError> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), impersonate.to_string()));
            self.outcome.clone().map(|body| FetchedPage {
                status: 200,
                final_url: url.to_string(),
                content_type: Some("text/html".to_string()),
                body,
            })
        }
    }

    struct FailingConverter;

    impl HtmlToMarkdown for FailingConverter {
        fn convert(&self, _html: &str) -> Result<String, FetchError> {
            Err(FetchError::Conversion("unsupported document".to_string()))
        }
    }

    fn tool_with(fetcher: Arc<RecordingFetcher>) -> FetchTool {
        FetchTool::builder().fetcher(fetcher).build()
    }

    #[tokio::test]
    async fn test_fetch_success_returns_markdown() {
        let fetcher = RecordingFetcher::returning(
            "<h1>Title</h1><p>This is a <strong>paragraph</strong> with \
             <a href='http://example.com'>a link</a>.</p>",
        );
        let tool = tool_with(fetcher);

        let markdown = tool.fetch_url("https://example.com", None).await;

        assert!(markdown.contains("# Title"), "got: {markdown}");
        assert!(markdown.contains("paragraph"), "got: {markdown}");
        assert!(markdown.contains("[a link](http://example.com)"), "got: {markdown}");
    }

    #[tokio::test]
    async fn test_impersonate_is_forwarded_unmodified() {
        let fetcher = RecordingFetcher::returning("<p>ok</p>");
        let tool = tool_with(fetcher.clone());

        tool.fetch_url("https://example.com/a", Some("Not A Real Profile"))
            .await;
        tool.fetch_url("https://example.com/b", Some("safari184_ios"))
            .await;

        assert_eq!(
            fetcher.calls(),
            vec![
                (
                    "https://example.com/a".to_string(),
                    "Not A Real Profile".to_string()
                ),
                (
                    "https://example.com/b".to_string(),
                    "safari184_ios".to_string()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_default_impersonate_applies_when_unset() {
        let fetcher = RecordingFetcher::returning("<p>ok</p>");
        let tool = tool_with(fetcher.clone());
        assert_eq!(tool.default_impersonate(), "realworld");

        tool.fetch(&FetchRequest::new("https://example.com"))
            .await
            .unwrap();

        let configured = FetchTool::builder()
            .fetcher(fetcher.clone())
            .default_impersonate("firefox")
            .build();
        configured
            .fetch(&FetchRequest::new("https://example.com"))
            .await
            .unwrap();

        let profiles: Vec<_> = fetcher.calls().into_iter().map(|(_, p)| p).collect();
        assert_eq!(profiles, vec!["realworld", "firefox"]);
    }

    #[tokio::test]
    async fn test_script_and_style_are_excluded() {
        let fetcher = RecordingFetcher::returning(
            "<html><head><style>body { color: red; }</style></head><body>\
             <h1>Visible heading</h1><script>console.log('test');</script>\
             <p>Visible text</p></body></html>",
        );
        let tool = tool_with(fetcher);

        let markdown = tool.fetch_url("https://example.com", None).await;

        assert!(!markdown.contains("console.log"), "got: {markdown}");
        assert!(!markdown.contains("color: red"), "got: {markdown}");
        assert!(markdown.contains("Visible heading"));
        assert!(markdown.contains("Visible text"));
    }

    #[tokio::test]
    async fn test_fetch_failure_becomes_error_string() {
        let fetcher = RecordingFetcher::failing(FetchError::Connect(
            "dns error: failed to lookup address information".to_string(),
        ));
        let tool = tool_with(fetcher);

        let output = tool
            .fetch_url("https://does-not-exist.invalid", None)
            .await;

        assert_eq!(
            output,
            "Error fetching URL https://does-not-exist.invalid: connection failed: \
             dns error: failed to lookup address information"
        );
    }

    #[tokio::test]
    async fn test_typed_fetch_keeps_error_category() {
        let tool = tool_with(RecordingFetcher::failing(FetchError::UnsupportedProfile(
            "mosaic1".to_string(),
        )));

        let error = tool
            .fetch(&FetchRequest::new("https://example.com").with_impersonate("mosaic1"))
            .await
            .unwrap_err();

        assert_eq!(error.kind(), "unsupported_profile");
    }

    #[tokio::test]
    async fn test_conversion_failure_becomes_error_string() {
        let tool = FetchTool::builder()
            .fetcher(RecordingFetcher::returning("<p>ok</p>"))
            .converter(Arc::new(FailingConverter))
            .build();

        let output = tool.fetch_url("https://example.com", None).await;
        assert_eq!(
            output,
            "Error fetching URL https://example.com: markdown conversion failed: unsupported document"
        );
    }

    #[test]
    fn test_format_fetch_error() {
        let error = FetchError::Timeout("operation timed out".to_string());
        assert_eq!(
            format_fetch_error("http://slow.example", &error),
            "Error fetching URL http://slow.example: request timed out: operation timed out"
        );
    }

    #[test]
    fn test_fetch_request_deserializes_without_impersonate() {
        let request: FetchRequest =
            serde_json::from_str(r#"{"url": "https://example.com"}"#).unwrap();
        assert_eq!(request, FetchRequest::new("https://example.com"));

        let request: FetchRequest =
            serde_json::from_str(r#"{"url": "https://example.com", "impersonate": "tor"}"#)
                .unwrap();
        assert_eq!(request.impersonate.as_deref(), Some("tor"));
    }
}
