//! Browser-fingerprinted HTTP client
//!
//! [`PageFetcher`] is the seam between the fetch pipeline and the network.
//! [`EmulatingFetcher`] is the production implementation: one `wreq` client
//! per browser profile, each built with that browser's TLS handshake, HTTP/2
//! settings and header order, plus the profile's own navigation headers on
//! every request.

use crate::error::{error_chain_message, FetchError};
use crate::impersonate::{BrowserProfile, Impersonate};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use wreq::header::CONTENT_TYPE;
use wreq::Client;

/// A fetched HTTP response with its body decoded as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// HTTP status code (non-2xx responses are returned, not treated as errors)
    pub status: u16,
    /// URL after redirects
    pub final_url: String,
    /// Value of the `Content-Type` response header, if any
    pub content_type: Option<String>,
    /// Response body decoded as text
    pub body: String,
}

impl FetchedPage {
    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Retrieves pages while presenting a browser fingerprint
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET `url` impersonating the profile named by `impersonate`.
    ///
    /// The profile name is parsed here, so an unknown name fails with
    /// `FetchError::UnsupportedProfile` without touching the network.
    async fn get(&self, url: &str, impersonate: &str) -> Result<FetchedPage, FetchError>;
}

/// [`PageFetcher`] that emulates the selected browser down to the TLS layer
///
/// TLS and HTTP/2 parameters are fixed when a `wreq` client is built, so
/// clients are created lazily, one per profile, and reused afterwards.
#[derive(Debug, Default)]
pub struct EmulatingFetcher {
    clients: Mutex<HashMap<&'static str, Client>>,
}

impl EmulatingFetcher {
    /// Creates a fetcher with no clients built yet
    pub fn new() -> Self {
        Self::default()
    }

    /// The client emulating `profile`, building it on first use
    fn client_for(&self, profile: &'static BrowserProfile) -> Result<Client, FetchError> {
        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = clients.get(profile.name) {
            return Ok(client.clone());
        }

        tracing::debug!(
            profile = profile.name,
            emulation = ?profile.emulation,
            "building emulating client"
        );
        let client = Client::builder()
            .emulation(profile.emulation_option())
            .build()
            .map_err(|e| FetchError::Request(error_chain_message(&e)))?;
        clients.insert(profile.name, client.clone());
        Ok(client)
    }
}

#[async_trait]
impl PageFetcher for EmulatingFetcher {
    async fn get(&self, url: &str, impersonate: &str) -> Result<FetchedPage, FetchError> {
        let profile = Impersonate::parse(impersonate)?.resolve();
        tracing::debug!(url, profile = profile.name, "sending request");

        let response = self
            .client_for(profile)?
            .get(url)
            .headers(profile.headers())
            .send()
            .await
            .map_err(map_wreq_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url, status = status.as_u16(), "non-success status");
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response.text().await.map_err(map_wreq_error)?;

        Ok(FetchedPage {
            status: status.as_u16(),
            final_url,
            content_type,
            body,
        })
    }
}

/// Classify a wreq failure, keeping its whole source chain as the detail.
fn map_wreq_error(error: wreq::Error) -> FetchError {
    let detail = error_chain_message(&error);
    if error.is_builder() {
        FetchError::InvalidUrl(detail)
    } else if error.is_timeout() {
        FetchError::Timeout(detail)
    } else if error.is_connect() {
        FetchError::Connect(detail)
    } else if error.is_body() || error.is_decode() {
        FetchError::Body(detail)
    } else {
        FetchError::Request(detail)
    }
}
