//! Successful download result.
//!
//! The body of a file download is empty by contract: the bytes live at
//! [`Response::destination`], and callers that need them read the file.
//!
//! # Examples
//!
//! ```rust
//! use rangefetch::download::Response;
//! use reqwest::{header::HeaderMap, StatusCode};
//!
//! let response = Response::new(StatusCode::OK, HeaderMap::new(), "out/file.bin");
//! let (headers, body) = response.into_delivery();
//! assert!(headers.is_empty());
//! assert!(body.is_empty());
//! ```

use crate::http::CacheMeta;

use reqwest::{header::HeaderMap, StatusCode};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Represents a completed download.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code, `200 OK` when no request was needed.
    statuscode: StatusCode,
    /// Response headers.
    headers: HeaderMap,
    /// Always absent for file downloads.
    body: Option<Vec<u8>>,
    /// Cache metadata derived from the headers.
    cache: Option<CacheMeta>,
    /// Where the file was promoted to.
    destination: PathBuf,
}

impl Response {
    /// Create a new [`Response`] without a body.
    pub fn new(statuscode: StatusCode, headers: HeaderMap, destination: impl Into<PathBuf>) -> Self {
        Self {
            statuscode,
            headers,
            body: None,
            cache: None,
            destination: destination.into(),
        }
    }

    /// Attach an in-memory body, for request variants that keep one.
    pub fn with_body(self, body: Vec<u8>) -> Self {
        Self {
            body: Some(body),
            ..self
        }
    }

    /// Attach cache metadata.
    pub fn with_cache(self, cache: Option<CacheMeta>) -> Self {
        Self { cache, ..self }
    }

    /// Get the response's status.
    pub fn statuscode(&self) -> StatusCode {
        self.statuscode
    }

    /// Get a reference to the response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Body bytes; empty for file downloads.
    pub fn body(&self) -> &[u8] {
        self.body.as_deref().unwrap_or_default()
    }

    /// Get the cache metadata.
    pub fn cache(&self) -> Option<&CacheMeta> {
        self.cache.as_ref()
    }

    /// Get the destination of the file.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Header map with unique keys; the last value of a repeated header wins.
    ///
    /// Values that are not visible ASCII are dropped.
    pub fn header_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::with_capacity(self.headers.keys_len());
        for (name, value) in &self.headers {
            if let Ok(value) = value.to_str() {
                map.insert(name.as_str().to_string(), value.to_string());
            }
        }
        map
    }

    /// Splits into what a success callback receives. An absent body becomes
    /// an empty vector.
    pub fn into_delivery(self) -> (HashMap<String, String>, Vec<u8>) {
        let headers = self.header_map();
        (headers, self.body.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderValue, SET_COOKIE};

    #[test]
    fn test_header_map_keys_are_unique() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("a=1"));
        headers.append(SET_COOKIE, HeaderValue::from_static("b=2"));

        let response = Response::new(StatusCode::OK, headers, "f");
        let map = response.header_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("set-cookie").map(String::as_str), Some("b=2"));
    }

    #[test]
    fn test_body_is_empty() {
        let response = Response::new(StatusCode::PARTIAL_CONTENT, HeaderMap::new(), "f");
        assert!(response.body().is_empty());
        assert_eq!(response.statuscode(), StatusCode::PARTIAL_CONTENT);
        assert!(response.cache().is_none());
        let (_, body) = response.into_delivery();
        assert_eq!(body, Vec::<u8>::new());
    }
}
