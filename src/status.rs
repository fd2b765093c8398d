//! HTTP status codes as error values.
//!
//! [`HttpError`] turns a numeric status code into a proper error type, and
//! [`http_status`] goes the other way: given any error, it digs through the
//! `source()` chain to recover the status code that caused it. The fetch
//! module reports every non-2xx/206 response through these.

use std::error::Error;
use std::fmt;
use std::io;

use reqwest::StatusCode;

/// An HTTP status code carried as an error value.
///
/// Construct one from any `u16`; codes outside the registered ranges still
/// render, just without a reason phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HttpError(u16);

impl HttpError {
    pub const BAD_REQUEST: HttpError = HttpError(400);
    pub const UNAUTHORIZED: HttpError = HttpError(401);
    pub const FORBIDDEN: HttpError = HttpError(403);
    pub const NOT_FOUND: HttpError = HttpError(404);
    pub const RANGE_NOT_SATISFIABLE: HttpError = HttpError(416);
    pub const TOO_MANY_REQUESTS: HttpError = HttpError(429);
    pub const INTERNAL_SERVER_ERROR: HttpError = HttpError(500);
    pub const BAD_GATEWAY: HttpError = HttpError(502);
    pub const SERVICE_UNAVAILABLE: HttpError = HttpError(503);

    /// Wraps a numeric status code.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// The numeric status code.
    #[must_use]
    pub const fn code(self) -> u16 {
        self.0
    }

    /// The registered reason phrase, when the code has one.
    #[must_use]
    pub fn canonical_reason(self) -> Option<&'static str> {
        StatusCode::from_u16(self.0)
            .ok()
            .and_then(|s| s.canonical_reason())
    }

    /// Maps this status onto the closest [`io::ErrorKind`], for callers that
    /// match on filesystem-style error kinds rather than HTTP codes.
    #[must_use]
    pub fn io_error_kind(self) -> Option<io::ErrorKind> {
        match self.0 {
            400 => Some(io::ErrorKind::InvalidInput),
            401 | 403 => Some(io::ErrorKind::PermissionDenied),
            404 => Some(io::ErrorKind::NotFound),
            _ => None,
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.canonical_reason() {
            Some(reason) => write!(f, "HTTP error {}: {reason}", self.0),
            None => write!(f, "HTTP error {}", self.0),
        }
    }
}

impl Error for HttpError {}

impl From<StatusCode> for HttpError {
    fn from(status: StatusCode) -> Self {
        Self(status.as_u16())
    }
}

impl From<HttpError> for io::Error {
    fn from(err: HttpError) -> Self {
        match err.io_error_kind() {
            Some(kind) => io::Error::new(kind, err),
            None => io::Error::other(err),
        }
    }
}

/// Extracts an HTTP status code from an arbitrary error.
///
/// Walks the `source()` chain looking for an [`HttpError`]. Bare
/// [`io::Error`]s are classified by kind: `NotFound` becomes 404,
/// `PermissionDenied` 403, `InvalidInput` 400.
///
/// Returns `None` when no status can be determined.
#[must_use]
pub fn http_status(err: &(dyn Error + 'static)) -> Option<u16> {
    let mut current: Option<&(dyn Error + 'static)> = Some(err);
    while let Some(e) = current {
        if let Some(http) = e.downcast_ref::<HttpError>() {
            return Some(http.code());
        }
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            match io_err.kind() {
                io::ErrorKind::NotFound => return Some(404),
                io::ErrorKind::PermissionDenied => return Some(403),
                io::ErrorKind::InvalidInput => return Some(400),
                _ => {}
            }
        }
        current = e.source();
    }
    None
}
