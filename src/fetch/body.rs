//! The resumable response body.
//!
//! [`ResumableBody`] wraps an open HTTP response and a request template. As
//! long as reads succeed it behaves like any streaming body. When a read
//! fails (or the server closes the connection early on a sized resource), it
//! drops the dead response, re-requests the remainder with
//! `Range: bytes=<position>-`, and carries on from exactly where it stopped.
//! Bytes already handed to the caller are never re-delivered or discarded.

use bytes::{Bytes, BytesMut};
use futures_util::Stream;
use reqwest::header::{HeaderMap, RANGE};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, instrument};
use url::Url;

use super::constants::MAX_BODY_SLURP_BYTES;
use super::error::FetchError;
use crate::status::HttpError;

/// Immutable description of the request to replay on resume: the final URL
/// (after any redirects on the initial request) and the caller's headers.
/// A fresh header set with `Range` added is built for every resume attempt;
/// the template itself is never mutated.
#[derive(Debug, Clone)]
pub(super) struct RequestTemplate {
    pub(super) url: Url,
    pub(super) headers: HeaderMap,
}

impl RequestTemplate {
    fn range_value(&self, position: u64) -> String {
        format!("bytes={position}-")
    }
}

/// A streaming response body that transparently resumes after interruptions.
///
/// Obtained from [`FetchClient::get`](super::FetchClient::get). Consume it
/// chunk by chunk with [`chunk`](Self::chunk), as a
/// [`Stream`](futures_util::Stream) via [`bytes_stream`](Self::bytes_stream),
/// or all at once with [`bytes`](Self::bytes).
///
/// Not meant for concurrent use: every operation takes `&mut self`, so one
/// read is in flight at a time by construction.
#[derive(Debug)]
pub struct ResumableBody {
    client: Client,
    template: RequestTemplate,
    /// The currently open response, if any. Replaced on resume; the old
    /// response is always dropped before the new one is installed.
    response: Option<Response>,
    /// Bytes delivered to the caller so far.
    position: u64,
    /// Length of the full resource, when the initial response declared one.
    total_size: Option<u64>,
    /// Set once end-of-stream has been reported or `close` was called.
    /// A finished body never attempts another resume.
    finished: bool,
}

impl ResumableBody {
    pub(super) fn new(
        client: Client,
        url: Url,
        headers: HeaderMap,
        response: Response,
        total_size: Option<u64>,
    ) -> Self {
        Self {
            client,
            template: RequestTemplate { url, headers },
            response: Some(response),
            position: 0,
            total_size,
            finished: false,
        }
    }

    /// The URL this body streams from (the final URL after redirects, which
    /// is also the target of resume requests).
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.template.url
    }

    /// Bytes delivered to the caller so far.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// The declared length of the resource, if the server sent one.
    #[must_use]
    pub fn content_length(&self) -> Option<u64> {
        self.total_size
    }

    /// Whether end-of-stream has been reached (or the body was closed).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Reads the next chunk of the body, resuming once if the current
    /// connection has failed.
    ///
    /// Returns `Ok(None)` at end-of-stream: when the declared length has
    /// been delivered, or, for resources of unknown length, when the server
    /// finishes the body cleanly. A short body on a sized resource and a
    /// mid-transfer read error both trigger a single resume attempt before
    /// this call returns.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Resume`] when the resume request is answered
    /// with anything other than 206 Partial Content (terminal: the stream
    /// should be closed), and [`FetchError::Network`] /
    /// [`FetchError::Timeout`] for transport failures that the one resume
    /// attempt of this call did not recover.
    pub async fn chunk(&mut self) -> Result<Option<Bytes>, FetchError> {
        if self.finished {
            return Ok(None);
        }

        if let Some(response) = self.response.as_mut() {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    self.position += chunk.len() as u64;
                    return Ok(Some(chunk));
                }
                Ok(None) => {
                    // Clean end of this response's body. That is true
                    // end-of-stream unless the resource has a declared
                    // length we have not reached yet.
                    if self.total_size.is_none_or(|size| self.position >= size) {
                        self.finish();
                        return Ok(None);
                    }
                    debug!(
                        position = self.position,
                        total = self.total_size,
                        "response body ended early, resuming"
                    );
                    self.response = None;
                }
                Err(err) => {
                    if self.total_size.is_some_and(|size| self.position >= size) {
                        // Everything was delivered; the trailing error is
                        // connection teardown noise.
                        self.finish();
                        return Ok(None);
                    }
                    // Unknown size included: a read error is not a clean
                    // end-of-stream signal, so try to pick up where we
                    // stopped.
                    debug!(
                        error = %err,
                        position = self.position,
                        "body read failed, resuming"
                    );
                    self.response = None;
                }
            }
        }

        self.resume().await?;

        // One read from the fresh response; its outcome is returned as-is,
        // with no further retry within this call.
        let Some(response) = self.response.as_mut() else {
            return Ok(None);
        };
        match response.chunk().await {
            Ok(Some(chunk)) => {
                self.position += chunk.len() as u64;
                Ok(Some(chunk))
            }
            Ok(None) => {
                self.finish();
                Ok(None)
            }
            Err(err) => Err(FetchError::network(self.template.url.as_str(), err)),
        }
    }

    /// Re-requests the resource from `position` to the end and installs the
    /// new response. The request is rebuilt from the immutable template with
    /// a fresh `Range` header.
    #[instrument(level = "debug", skip(self), fields(url = %self.template.url, position = self.position))]
    async fn resume(&mut self) -> Result<(), FetchError> {
        let response = self
            .client
            .get(self.template.url.clone())
            .headers(self.template.headers.clone())
            .header(RANGE, self.template.range_value(self.position))
            .send()
            .await
            .map_err(|e| FetchError::network(self.template.url.as_str(), e))?;

        if response.status() != StatusCode::PARTIAL_CONTENT {
            let status = HttpError::from(response.status());
            drain_and_close(response).await;
            return Err(FetchError::resume(
                self.template.url.as_str(),
                self.position,
                status,
            ));
        }

        debug!("resumed with 206 Partial Content");
        self.response = Some(response);
        Ok(())
    }

    fn finish(&mut self) {
        self.finished = true;
        self.response = None;
    }

    /// Drops the active response, releasing the underlying connection.
    ///
    /// Safe to call any number of times; a closed body reports end-of-stream
    /// on subsequent reads and never resumes. Dropping the body has the same
    /// effect, so calling this is only needed to stop a download early at a
    /// deterministic point.
    pub fn close(&mut self) {
        self.finish();
    }

    /// Adapts the body into a `Stream` of chunks, in the style of
    /// `reqwest::Response::bytes_stream`.
    pub fn bytes_stream(self) -> impl Stream<Item = Result<Bytes, FetchError>> {
        futures_util::stream::try_unfold(self, |mut body| async move {
            match body.chunk().await? {
                Some(chunk) => Ok(Some((chunk, body))),
                None => Ok(None),
            }
        })
    }

    /// Reads the body to the end, resuming as needed, and returns the full
    /// content.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`chunk`](Self::chunk).
    pub async fn bytes(mut self) -> Result<Bytes, FetchError> {
        let capacity = self
            .total_size
            .and_then(|size| usize::try_from(size).ok())
            .unwrap_or(0);
        let mut buf = BytesMut::with_capacity(capacity);
        while let Some(chunk) = self.chunk().await? {
            buf.extend_from_slice(&chunk);
        }
        Ok(buf.freeze())
    }
}

/// Reads a small rejected body to the end before dropping it, so the client
/// can reuse the connection. Large bodies are dropped outright.
pub(super) async fn drain_and_close(mut response: Response) {
    if response
        .content_length()
        .is_some_and(|len| len > MAX_BODY_SLURP_BYTES)
    {
        return;
    }
    let mut drained: u64 = 0;
    while drained < MAX_BODY_SLURP_BYTES {
        match response.chunk().await {
            Ok(Some(chunk)) => drained += chunk.len() as u64,
            Ok(None) | Err(_) => break,
        }
    }
}
