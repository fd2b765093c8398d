//! Error types for the fetch module.

use thiserror::Error;

use crate::status::HttpError;

/// Errors that can occur while opening or streaming a resumable download.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS resolution, connection refused, TLS errors,
    /// a body read that failed and could not be resumed, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The initial request returned a status other than 200 or 204.
    #[error("fetching {url}: {source}")]
    Status {
        /// The URL that returned an error status.
        url: String,
        /// The status-classified error.
        #[source]
        source: HttpError,
    },

    /// A resume request returned a status other than 206 Partial Content.
    /// The stream cannot continue after this.
    #[error("resuming {url} at byte {position}: expected 206 Partial Content, got {source}")]
    Resume {
        /// The URL being resumed.
        url: String,
        /// The byte offset the resume request asked for.
        position: u64,
        /// The status-classified error.
        #[source]
        source: HttpError,
    },
}

impl FetchError {
    /// Creates a network error from a reqwest error, promoting timeouts to
    /// their own variant.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network { url, source }
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an unacceptable-initial-status error.
    pub fn status(url: impl Into<String>, status: HttpError) -> Self {
        Self::Status {
            url: url.into(),
            source: status,
        }
    }

    /// Creates an unacceptable-resume-status error.
    pub fn resume(url: impl Into<String>, position: u64, status: HttpError) -> Self {
        Self::Resume {
            url: url.into(),
            position,
            source: status,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::status::http_status;

    #[test]
    fn test_status_error_display() {
        let error = FetchError::status("https://example.com/file.bin", HttpError::NOT_FOUND);
        let msg = error.to_string();
        assert!(msg.contains("404"), "Expected '404' in: {msg}");
        assert!(
            msg.contains("https://example.com/file.bin"),
            "Expected URL in: {msg}"
        );
    }

    #[test]
    fn test_resume_error_display() {
        let error = FetchError::resume(
            "https://example.com/file.bin",
            1024,
            HttpError::RANGE_NOT_SATISFIABLE,
        );
        let msg = error.to_string();
        assert!(msg.contains("206"), "Expected '206' in: {msg}");
        assert!(msg.contains("1024"), "Expected offset in: {msg}");
        assert!(msg.contains("416"), "Expected '416' in: {msg}");
    }

    #[test]
    fn test_status_recoverable_through_chain() {
        let error = FetchError::status("https://example.com/", HttpError::FORBIDDEN);
        assert_eq!(http_status(&error), Some(403));

        let error = FetchError::resume("https://example.com/", 7, HttpError::new(500));
        assert_eq!(http_status(&error), Some(500));
    }

    #[test]
    fn test_invalid_url_display() {
        let error = FetchError::invalid_url("not-a-url");
        let msg = error.to_string();
        assert!(msg.contains("invalid URL"), "Expected prefix in: {msg}");
        assert!(msg.contains("not-a-url"), "Expected URL in: {msg}");
    }
}
