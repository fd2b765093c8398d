//! HTTP client wrapper for resumable downloads.
//!
//! [`FetchClient`] owns the `reqwest::Client` used for the initial request
//! and every resume attempt, and performs the initial GET handshake that
//! produces a [`ResumableBody`].

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, ClientBuilder, StatusCode};
use tracing::{debug, instrument};
use url::Url;

use super::body::{ResumableBody, drain_and_close};
use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::FetchError;
use crate::status::HttpError;

/// HTTP client for opening resumable downloads.
///
/// Designed to be created once and reused, taking advantage of connection
/// pooling. Redirect following, proxies, and TLS are the underlying
/// `reqwest::Client`'s business; supply a configured one through
/// [`with_client`](Self::with_client) when the defaults don't fit.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: Client,
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchClient {
    /// Creates a new client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Read timeout: 5 minutes (for large files)
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a new client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .read_timeout(Duration::from_secs(read_timeout_secs))
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Wraps an existing `reqwest::Client`.
    ///
    /// Resume requests go through this client too, so its redirect policy,
    /// proxy, and timeout settings apply to the whole download.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Returns a reference to the underlying reqwest client.
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Opens a resumable GET download.
    ///
    /// Follows redirects (per the client's policy) and accepts only a final
    /// status of 200 OK or 204 No Content. The returned body streams the
    /// response and transparently resumes with `Range` requests against the
    /// final, post-redirect URL if the transfer is interrupted.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if:
    /// - The URL is invalid
    /// - The request fails (network error, timeout)
    /// - The server responds with any status other than 200 or 204
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get(&self, url: &str) -> Result<ResumableBody, FetchError> {
        self.get_with_headers(url, HeaderMap::new()).await
    }

    /// Opens a resumable GET download with additional request headers.
    ///
    /// The headers are sent on the initial request and replayed on every
    /// resume attempt (with `Range` added on top).
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`get`](Self::get).
    #[instrument(skip(self, headers), fields(url = %url))]
    pub async fn get_with_headers(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> Result<ResumableBody, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;

        let response = self
            .client
            .get(parsed)
            .headers(headers.clone())
            .send()
            .await
            .map_err(|e| FetchError::network(url, e))?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => {}
            status => {
                let status = HttpError::from(status);
                drain_and_close(response).await;
                return Err(FetchError::status(url, status));
            }
        }

        // Keep the post-redirect URL so resume requests hit the resolved
        // location directly.
        let final_url = response.url().clone();
        let total_size = response.content_length();
        debug!(
            final_url = %final_url,
            content_length = total_size,
            "opened resumable download"
        );

        Ok(ResumableBody::new(
            self.client.clone(),
            final_url,
            headers,
            response,
            total_size,
        ))
    }
}

/// One-shot convenience: opens a resumable GET with a fresh default client.
///
/// Prefer constructing a [`FetchClient`] and reusing it when downloading
/// more than once; this skips connection pooling across calls.
///
/// # Errors
///
/// Returns the same errors as [`FetchClient::get`].
pub async fn get(url: &str) -> Result<ResumableBody, FetchError> {
    FetchClient::new().get(url).await
}
