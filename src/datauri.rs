//! `data:` URI decoding.
//!
//! Format: `data:[<media type>][;base64],<data>` — for example
//! `data:text/plain;base64,SGVsbG8gV29ybGQ=`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use thiserror::Error;

/// Decoded payload of a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// The declared media type, defaulting to `application/octet-stream`.
    pub mime: String,
    /// The decoded binary payload.
    pub data: Vec<u8>,
}

/// Errors that can occur while parsing a `data:` URI.
#[derive(Debug, Error)]
pub enum DataUriError {
    /// The input does not start with the `data:` scheme.
    #[error("not a data URI")]
    NotDataUri,

    /// No comma separates the metadata from the payload.
    #[error("could not locate encoded value")]
    MissingValue,

    /// The payload claimed base64 encoding but did not decode.
    #[error("base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Parses a `data:` URI and returns its binary payload and MIME type.
///
/// The metadata section is `;`-separated: the first option is the media
/// type (empty means `application/octet-stream`) and a trailing `base64`
/// option marks the payload as base64. Payloads without the base64 marker
/// are percent-decoded. Base64 padding is optional; stray `=` at the end is
/// tolerated.
///
/// # Errors
///
/// Returns [`DataUriError`] when the scheme is wrong, the payload separator
/// is missing, or base64 decoding fails.
pub fn parse_data_uri(uri: &str) -> Result<DataUri, DataUriError> {
    let rest = uri.strip_prefix("data:").ok_or(DataUriError::NotDataUri)?;

    // Some producers emit data:// with scheme-relative slashes.
    let rest = rest.trim_start_matches('/');

    let (meta, payload) = rest.split_once(',').ok_or(DataUriError::MissingValue)?;

    let mut opts = meta.split(';');
    let mime = match opts.next() {
        Some("") | None => "application/octet-stream".to_owned(),
        Some(m) => m.to_owned(),
    };

    let is_base64 = meta.split(';').next_back() == Some("base64");
    let data = if is_base64 {
        STANDARD_NO_PAD.decode(payload.trim_end_matches('='))?
    } else {
        // Query-style decoding: literal `+` means space, `%2B` stays a plus.
        let payload = payload.replace('+', " ");
        urlencoding::decode_binary(payload.as_bytes()).into_owned()
    };

    Ok(DataUri { mime, data })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_payload() {
        let parsed = parse_data_uri("data:text/plain;base64,SGVsbG8gV29ybGQ=").unwrap();
        assert_eq!(parsed.mime, "text/plain");
        assert_eq!(parsed.data, b"Hello World");
    }

    #[test]
    fn test_base64_without_padding() {
        let parsed = parse_data_uri("data:text/plain;base64,SGVsbG8").unwrap();
        assert_eq!(parsed.data, b"Hello");
    }

    #[test]
    fn test_percent_encoded_payload() {
        let parsed = parse_data_uri("data:,Hello%20World%21").unwrap();
        assert_eq!(parsed.mime, "application/octet-stream");
        assert_eq!(parsed.data, b"Hello World!");
    }

    #[test]
    fn test_plus_decodes_to_space() {
        let parsed = parse_data_uri("data:text/plain,Hello+world").unwrap();
        assert_eq!(parsed.data, b"Hello world");
        let parsed = parse_data_uri("data:text/plain,1%2B1").unwrap();
        assert_eq!(parsed.data, b"1+1");
    }

    #[test]
    fn test_empty_payload() {
        let parsed = parse_data_uri("data:,").unwrap();
        assert_eq!(parsed.mime, "application/octet-stream");
        assert!(parsed.data.is_empty());
    }

    #[test]
    fn test_default_mime() {
        let parsed = parse_data_uri("data:;base64,SGk=").unwrap();
        assert_eq!(parsed.mime, "application/octet-stream");
        assert_eq!(parsed.data, b"Hi");
    }

    #[test]
    fn test_charset_option_keeps_mime() {
        let parsed = parse_data_uri("data:text/html;charset=utf-8,%3Ch1%3Ehi%3C%2Fh1%3E").unwrap();
        assert_eq!(parsed.mime, "text/html");
        assert_eq!(parsed.data, b"<h1>hi</h1>");
    }

    #[test]
    fn test_scheme_relative_slashes() {
        let parsed = parse_data_uri("data://text/plain;base64,SGk=").unwrap();
        assert_eq!(parsed.mime, "text/plain");
        assert_eq!(parsed.data, b"Hi");
    }

    #[test]
    fn test_not_a_data_uri() {
        let err = parse_data_uri("https://example.com/").unwrap_err();
        assert!(matches!(err, DataUriError::NotDataUri));
    }

    #[test]
    fn test_missing_comma() {
        let err = parse_data_uri("data:text/plain;base64").unwrap_err();
        assert!(matches!(err, DataUriError::MissingValue));
    }

    #[test]
    fn test_invalid_base64() {
        let err = parse_data_uri("data:;base64,@@@@").unwrap_err();
        assert!(matches!(err, DataUriError::Base64(_)));
    }
}
