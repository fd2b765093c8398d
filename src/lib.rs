//! Web fetch utilities.
//!
//! The centerpiece is a resumable HTTP GET: [`FetchClient::get`] returns a
//! [`ResumableBody`] that streams the response and transparently re-requests
//! the remaining bytes with a `Range` header whenever the connection drops
//! mid-transfer.
//!
//! # Architecture
//!
//! - [`fetch`] - resumable HTTP GET streaming
//! - [`status`] - HTTP status codes as error values, and status classification
//! - [`datauri`] - `data:` URI decoding
//! - [`phpquery`] - PHP-compatible nested query string parsing/encoding
//! - [`ipport`] - `host[:port]` string parsing

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod datauri;
pub mod fetch;
pub mod ipport;
pub mod phpquery;
pub mod status;

// Re-export commonly used types
pub use datauri::{DataUri, DataUriError, parse_data_uri};
pub use fetch::{FetchClient, FetchError, ResumableBody, get};
pub use ipport::{IpPort, parse_ip_port};
pub use phpquery::{encode_php_query, parse_php_query};
pub use status::{HttpError, http_status};
