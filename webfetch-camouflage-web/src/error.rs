//! Error types for the fetch pipeline

use thiserror::Error;

/// Failures that can occur while fetching and converting a page.
///
/// Every variant carries a human-readable detail string. At the tool boundary
/// the error is flattened into `"Error fetching URL {url}: {detail}"`, so the
/// `Display` output of each variant is the `{detail}` part of that message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The URL could not be turned into a request (parse failure, bad scheme)
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The requested impersonation profile is not known to the client
    #[error("unsupported impersonation profile '{0}'")]
    UnsupportedProfile(String),

    /// The request did not complete before the client timeout
    #[error("request timed out: {0}")]
    Timeout(String),

    /// DNS resolution, TCP connect or TLS handshake failed
    #[error("connection failed: {0}")]
    Connect(String),

    /// The response body could not be read
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Any other failure raised by the HTTP client
    #[error("request failed: {0}")]
    Request(String),

    /// HTML to markdown conversion failed
    #[error("markdown conversion failed: {0}")]
    Conversion(String),
}

impl FetchError {
    /// Stable snake_case category name, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::InvalidUrl(_) => "invalid_url",
            FetchError::UnsupportedProfile(_) => "unsupported_profile",
            FetchError::Timeout(_) => "timeout",
            FetchError::Connect(_) => "connect",
            FetchError::Body(_) => "body",
            FetchError::Request(_) => "request",
            FetchError::Conversion(_) => "conversion",
        }
    }

    /// Whether the failure happened on the network side of the pipeline
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            FetchError::Timeout(_)
                | FetchError::Connect(_)
                | FetchError::Body(_)
                | FetchError::Request(_)
        )
    }
}

/// Render an error together with its whole `source()` chain.
///
/// HTTP clients keep the useful part of a failure (DNS error, refused
/// connection, certificate problem) in nested sources, while the top-level
/// message is only "error sending request for url (...)".
pub fn error_chain_message(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Layer {
        message: &'static str,
        source: Option<Box<Layer>>,
    }

    impl fmt::Display for Layer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message)
        }
    }

    impl std::error::Error for Layer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            self.source
                .as_deref()
                .map(|s| s as &(dyn std::error::Error + 'static))
        }
    }

    #[test]
    fn test_error_display_includes_detail() {
        let error = FetchError::Connect("dns error: no such host".to_string());
        assert_eq!(error.to_string(), "connection failed: dns error: no such host");

        let error = FetchError::UnsupportedProfile("netscape4".to_string());
        assert_eq!(
            error.to_string(),
            "unsupported impersonation profile 'netscape4'"
        );
    }

    #[test]
    fn test_error_kinds_are_distinct() {
        let errors = [
            FetchError::InvalidUrl(String::new()),
            FetchError::UnsupportedProfile(String::new()),
            FetchError::Timeout(String::new()),
            FetchError::Connect(String::new()),
            FetchError::Body(String::new()),
            FetchError::Request(String::new()),
            FetchError::Conversion(String::new()),
        ];
        let mut kinds: Vec<_> = errors.iter().map(|e| e.kind()).collect();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), errors.len());
    }

    #[test]
    fn test_is_transport() {
        assert!(FetchError::Timeout("t".into()).is_transport());
        assert!(FetchError::Connect("c".into()).is_transport());
        assert!(!FetchError::InvalidUrl("u".into()).is_transport());
        assert!(!FetchError::UnsupportedProfile("p".into()).is_transport());
        assert!(!FetchError::Conversion("x".into()).is_transport());
    }

    #[test]
    fn test_error_chain_message_walks_sources() {
        let error = Layer {
            message: "error sending request",
            source: Some(Box::new(Layer {
                message: "client error (Connect)",
                source: Some(Box::new(Layer {
                    message: "dns error",
                    source: None,
                })),
            })),
        };

        assert_eq!(
            error_chain_message(&error),
            "error sending request: client error (Connect): dns error"
        );
    }

    #[test]
    fn test_error_chain_message_skips_repeated_text() {
        let error = Layer {
            message: "timed out: operation timed out",
            source: Some(Box::new(Layer {
                message: "operation timed out",
                source: None,
            })),
        };

        assert_eq!(error_chain_message(&error), "timed out: operation timed out");
    }
}
