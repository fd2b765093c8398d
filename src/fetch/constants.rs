//! Constants for the fetch module (timeouts, drain bound).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large files).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Upper bound on how much of a rejected response body is read before the
/// connection is released (2 KiB). Reading a small error body to the end
/// lets the client keep the connection alive for the next request.
pub const MAX_BODY_SLURP_BYTES: u64 = 2 << 10;
