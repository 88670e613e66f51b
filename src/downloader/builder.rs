//! Builder pattern implementation for creating file requests.
//!
//! # Examples
//!
//! ```rust
//! use rangefetch::downloader::{FileRequestBuilder, Priority};
//! use reqwest::header::{self, HeaderValue};
//!
//! # fn main() -> Result<(), rangefetch::Error> {
//! let request = FileRequestBuilder::new("https://example.com/big.iso", "downloads/big.iso")
//!     .header(header::USER_AGENT, HeaderValue::from_static("rangefetch/0.1"))
//!     .priority(Priority::High)
//!     .on_success(|headers, _body| println!("done: {:?}", headers.get("etag")))
//!     .on_failure(|e| eprintln!("failed: {e}"))
//!     .build()?;
//! assert!(request.staging_path().ends_with("big.iso.tmp"));
//! # Ok(())
//! # }
//! ```

use super::config::{FailureCallback, RequestConfig, SuccessCallback};
use super::file_request::FileRequest;
use super::request::Priority;
use crate::download::Download;
use crate::error::{Error, Result};
use crate::progress::ProgressListener;

use reqwest::header::{HeaderMap, HeaderValue, IntoHeaderName};
use std::{collections::HashMap, path::PathBuf, sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;

/// A builder used to create a [`FileRequest`].
pub struct FileRequestBuilder {
    url: String,
    destination: PathBuf,
    headers: HeaderMap,
    config: RequestConfig,
    expected_size: Option<u64>,
    cancel: Option<CancellationToken>,
    progress: Option<Arc<dyn ProgressListener>>,
    on_success: Option<SuccessCallback>,
    on_failure: Option<FailureCallback>,
}

impl FileRequestBuilder {
    /// Starts a request for `url`, saved at `destination`.
    pub fn new(url: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            destination: destination.into(),
            headers: HeaderMap::new(),
            config: RequestConfig::default(),
            expected_size: None,
            cancel: None,
            progress: None,
            on_success: None,
            on_failure: None,
        }
    }

    /// Add an http header.
    ///
    /// Repeated names are all sent. `Range` and `Accept-Encoding` are set by
    /// the engine for every attempt and cannot be overridden.
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Add every header of `headers`, keeping values already added.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        for (name, value) in headers.iter() {
            self.headers.append(name.clone(), value.clone());
        }
        self
    }

    /// Replace the whole request configuration.
    pub fn config(mut self, config: RequestConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the scheduling priority.
    pub fn priority(mut self, priority: Priority) -> Self {
        self.config.priority = priority;
        self
    }

    /// Fail on a `Content-Range` that disagrees with the requested offset.
    pub fn strict_content_range(mut self, strict: bool) -> Self {
        self.config.strict_content_range = strict;
        self
    }

    /// Set the read size of the copy loop.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.config.chunk_size = chunk_size;
        self
    }

    /// Derive cache metadata from the server's cache headers.
    pub fn use_server_control(mut self, enabled: bool) -> Self {
        self.config.use_server_control = enabled;
        self
    }

    /// Freshness applied when server cache control is off.
    pub fn cache_time(mut self, cache_time: Duration) -> Self {
        self.config.cache_time = cache_time;
        self
    }

    /// Total size learned from an earlier attempt.
    pub fn expected_size(mut self, size: u64) -> Self {
        self.expected_size = Some(size);
        self
    }

    /// Share a cancellation token, e.g. with a parent task.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Register a progress listener.
    pub fn progress<L>(mut self, listener: L) -> Self
    where
        L: ProgressListener + 'static,
    {
        self.progress = Some(Arc::new(listener));
        self
    }

    /// Set callback for a successful download.
    ///
    /// It receives the response headers, one value per name, and an empty body.
    pub fn on_success<F>(mut self, callback: F) -> Self
    where
        F: Fn(HashMap<String, String>, Vec<u8>) + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(callback));
        self
    }

    /// Set callback for a failed download.
    pub fn on_failure<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        self.on_failure = Some(Arc::new(callback));
        self
    }

    /// Create the [`FileRequest`], validating the URL.
    pub fn build(self) -> Result<FileRequest> {
        let mut download = Download::try_from((self.url.as_str(), self.destination.as_path()))?;
        for (name, value) in self.headers.iter() {
            download.put_header(name.clone(), value.clone());
        }
        download.set_expected_size(self.expected_size);
        download.set_progress_listener(self.progress);
        if let Some(token) = self.cancel {
            download.set_cancellation(token);
        }

        Ok(FileRequest::new(
            download,
            self.config,
            self.on_success,
            self.on_failure,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{ACCEPT, USER_AGENT};

    #[test]
    fn test_header_accumulates() {
        let mut extra = HeaderMap::new();
        extra.insert(ACCEPT, HeaderValue::from_static("*/*"));
        extra.insert(USER_AGENT, HeaderValue::from_static("two"));

        let request = FileRequestBuilder::new("https://example.com/a", "a")
            .header(USER_AGENT, HeaderValue::from_static("one"))
            .headers(extra)
            .build()
            .unwrap();

        let headers = request.download().headers();
        assert_eq!(headers.get_all(USER_AGENT).iter().count(), 2);
        assert_eq!(headers.get(ACCEPT).unwrap(), "*/*");
    }

    #[test]
    fn test_build_rejects_bad_url() {
        let err = FileRequestBuilder::new("file:///etc/passwd", "a")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_shared_cancellation() {
        let token = CancellationToken::new();
        let request = FileRequestBuilder::new("https://example.com/a", "a")
            .cancellation(token.clone())
            .build()
            .unwrap();
        token.cancel();
        assert!(request.download().is_canceled());
    }
}
