//! HTML to markdown conversion
//!
//! Wraps the `htmd` converter with the output conventions used throughout
//! the fetch pipeline: ATX headings, inline links and fenced code blocks.

use crate::error::FetchError;
use htmd::options::{CodeBlockStyle, HeadingStyle, LinkStyle, Options};

/// Which structural elements survive conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConverterOptions {
    /// Keep `<a>` elements as `[text](href)`
    pub preserve_links: bool,
    /// Keep `<img>` elements as `![alt](src)`
    pub preserve_images: bool,
    /// Keep `<table>` elements
    pub preserve_tables: bool,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            preserve_links: true,
            preserve_images: true,
            preserve_tables: true,
        }
    }
}

impl ConverterOptions {
    /// Tags the converter should drop, content included
    fn skipped_tags(&self) -> Vec<&'static str> {
        let mut tags = Vec::new();
        if !self.preserve_links {
            tags.push("a");
        }
        if !self.preserve_images {
            tags.push("img");
        }
        if !self.preserve_tables {
            tags.push("table");
        }
        tags
    }
}

/// Converts an HTML document into markdown text
pub trait HtmlToMarkdown: Send + Sync {
    /// Convert `html` to markdown.
    ///
    /// # Errors
    ///
    /// * `FetchError::Conversion` - The converter could not process the document
    fn convert(&self, html: &str) -> Result<String, FetchError>;
}

/// `htmd`-backed converter
#[derive(Debug, Clone, Default)]
pub struct MarkdownConverter {
    options: ConverterOptions,
}

impl MarkdownConverter {
    /// Creates a converter that keeps links, images and tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a converter with explicit element preservation settings.
    ///
    /// # Arguments
    ///
    /// * `options` - Which of links, images and tables to keep
    pub fn with_options(options: ConverterOptions) -> Self {
        Self { options }
    }

    /// The preservation settings in effect
    pub fn options(&self) -> ConverterOptions {
        self.options
    }
}

impl HtmlToMarkdown for MarkdownConverter {
    /// Converts HTML to markdown.
    ///
    /// Leading and trailing blank lines are trimmed from the result. An empty
    /// or whitespace-only document converts to an empty string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use webfetch_camouflage_web::{HtmlToMarkdown, MarkdownConverter};
    ///
    /// let converter = MarkdownConverter::new();
    /// let markdown = converter.convert("<h1>Hello World</h1>")?;
    /// assert_eq!(markdown, "# Hello World");
    /// # Ok::<(), webfetch_camouflage_web::FetchError>(())
    /// ```
    fn convert(&self, html: &str) -> Result<String, FetchError> {
        let options = Options {
            heading_style: HeadingStyle::Atx,
            code_block_style: CodeBlockStyle::Fenced,
            link_style: LinkStyle::Inlined,
            ..Default::default()
        };

        // htmd rejects an empty skip list
        let mut builder = htmd::HtmlToMarkdown::builder().options(options);
        let skipped = self.options.skipped_tags();
        if !skipped.is_empty() {
            builder = builder.skip_tags(skipped);
        }
        let converter = builder.build();

        let markdown = converter
            .convert(html)
            .map_err(|e| FetchError::Conversion(e.to_string()))?;

        Ok(markdown.trim().to_string())
    }
}
