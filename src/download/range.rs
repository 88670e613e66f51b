//! Byte-range negotiation.
//!
//! Decides from the response headers whether the server honored the `Range`
//! request and what the full size of the resource is. The comparison of the
//! server's `Content-Range` with the range that was asked for is intentionally
//! weak: a mismatch is reported, the server's bytes are trusted.

use crate::error::Error;
use crate::utils::{content_range_total, extract_content_length};

use reqwest::header::{HeaderMap, HeaderName, ACCEPT_RANGES, CONTENT_RANGE};
use std::path::{Path, PathBuf};

/// A `Content-Range` that disagrees with the requested range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeMismatch {
    /// Range implied by the staging length and the advertised size.
    pub assumed: String,
    /// Range reported by the server.
    pub actual: String,
    /// Staging file the bytes would be appended to.
    pub staging: PathBuf,
}

impl From<RangeMismatch> for Error {
    fn from(m: RangeMismatch) -> Self {
        Error::ContentRangeMismatch {
            assumed: m.assumed,
            actual: m.actual,
            staging: m.staging,
        }
    }
}

/// Outcome of [`negotiate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negotiation {
    /// The server continues from the requested offset.
    pub supports_range: bool,
    /// Full size of the resource, 0 when unknown.
    pub total: u64,
    /// Set when the reported range differs from the assumed one.
    pub mismatch: Option<RangeMismatch>,
}

/// Whether the response headers say the server serves byte ranges.
pub fn supports_range(headers: &HeaderMap) -> bool {
    let header = |name: HeaderName| headers.get(name).and_then(|v| v.to_str().ok());

    if header(ACCEPT_RANGES) == Some("bytes") {
        return true;
    }
    header(CONTENT_RANGE).is_some_and(|v| v.starts_with("bytes"))
}

/// Inspects a response for range support given `downloaded` staged bytes.
///
/// `content_length` is the transport-reported body size, used when the
/// `Content-Length` header is missing.
pub fn negotiate(
    headers: &HeaderMap,
    content_length: Option<u64>,
    downloaded: u64,
    staging: &Path,
) -> Negotiation {
    let remaining = extract_content_length(headers, content_length);
    let supports_range = supports_range(headers);

    if !supports_range {
        return Negotiation {
            supports_range,
            total: remaining.unwrap_or(0),
            mismatch: None,
        };
    }

    // An advertised length that overflows with the staged bytes is unknown.
    let total = match remaining {
        Some(len) => downloaded.checked_add(len).unwrap_or(0),
        None => content_range_total(headers).unwrap_or(0),
    };

    let actual = headers
        .get(CONTENT_RANGE)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty());

    let mismatch = match actual {
        Some(actual) if total > 0 => {
            let assumed = format!("bytes {}-{}", downloaded, total - 1);
            (!actual.contains(&assumed)).then(|| RangeMismatch {
                assumed,
                actual: actual.to_string(),
                staging: staging.to_path_buf(),
            })
        }
        _ => None,
    };

    Negotiation {
        supports_range,
        total,
        mismatch,
    }
}

/// Whether the body is gzip-encoded.
pub fn is_gzip(headers: &HeaderMap) -> bool {
    headers
        .get(reqwest::header::CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("gzip"))
}
