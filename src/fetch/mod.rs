//! Resumable HTTP GET streaming.
//!
//! An interrupted download does not have to start over: the body returned by
//! [`FetchClient::get`] remembers how many bytes it has delivered and, when a
//! read fails mid-transfer, quietly reissues the request with
//! `Range: bytes=<position>-` and keeps streaming from that offset.
//!
//! # Example
//!
//! ```no_run
//! use webutil::fetch::FetchClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = FetchClient::new();
//! let mut body = client.get("https://example.com/large-file.bin").await?;
//! while let Some(chunk) = body.chunk().await? {
//!     // chunks survive connection drops transparently
//!     println!("got {} bytes", chunk.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Servers that ignore `Range` requests can't be resumed against: the resume
//! handshake insists on 206 Partial Content and fails the stream otherwise,
//! rather than silently delivering duplicate bytes.

mod body;
mod client;
mod constants;
mod error;

pub use body::ResumableBody;
pub use client::{FetchClient, get};
pub use constants::{CONNECT_TIMEOUT_SECS, MAX_BODY_SLURP_BYTES, READ_TIMEOUT_SECS};
pub use error::FetchError;
