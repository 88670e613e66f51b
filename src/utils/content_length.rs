//! Content length extraction utilities.
//!
//! This module provides utilities for reading sizes out of response headers,
//! supporting both Content-Range and Content-Length headers.

use reqwest::header::{HeaderMap, CONTENT_LENGTH, CONTENT_RANGE};

/// Extract the number of body bytes announced by the Content-Length header.
///
/// Falls back to `fallback` (usually the size the transport reported) when the
/// header is missing or not an u64.
///
/// # Example
///
/// ```rust
/// use rangefetch::utils::extract_content_length;
/// use reqwest::header::{HeaderMap, HeaderValue, CONTENT_LENGTH};
///
/// let mut headers = HeaderMap::new();
/// headers.insert(CONTENT_LENGTH, HeaderValue::from_static("1024"));
/// assert_eq!(extract_content_length(&headers, None), Some(1024));
/// assert_eq!(extract_content_length(&HeaderMap::new(), Some(7)), Some(7));
/// ```
pub fn extract_content_length(headers: &HeaderMap, fallback: Option<u64>) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .or(fallback)
}

/// Total resource size advertised by a Content-Range header, if any.
pub fn content_range_total(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_RANGE)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_content_range_total)
}

/// Parse Content-Range header to extract total size.
///
/// Content-Range header format: "bytes start-end/total"
/// This function extracts the total size from the header.
///
/// # Example
///
/// ```rust
/// use rangefetch::utils::parse_content_range_total;
///
/// let total = parse_content_range_total("bytes 0-1023/2048");
/// assert_eq!(total, Some(2048));
/// ```
pub fn parse_content_range_total(content_range: &str) -> Option<u64> {
    content_range
        .split('/')
        .nth(1)
        .and_then(|size| size.trim().parse::<u64>().ok())
}
