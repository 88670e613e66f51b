//! The per-attempt download descriptor.
//!
//! A [`Download`] names the resource, where it ends up on disk, and the
//! staging file that accumulates bytes until promotion. Creating one performs
//! no I/O; [`Download::prepare`] does the best-effort filesystem setup.
//!
//! # Examples
//!
//! ```rust
//! use rangefetch::download::Download;
//! use reqwest::Url;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let url = Url::parse("https://example.com/file.zip")?;
//! let download = Download::new(&url, "downloads/file.zip");
//! assert!(download.staging_path().ends_with("file.zip.tmp"));
//! # Ok(())
//! # }
//! ```

use super::staging;
use crate::error::Result;
use crate::progress::ProgressListener;

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, ACCEPT_ENCODING, RANGE},
    Url,
};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Represents a file to be downloaded.
#[derive(Clone)]
pub struct Download {
    /// URL of the file to download.
    pub url: Url,
    destination: PathBuf,
    staging: PathBuf,
    headers: HeaderMap,
    expected_size: Option<u64>,
    progress: Option<Arc<dyn ProgressListener>>,
    cancel: CancellationToken,
}

impl fmt::Debug for Download {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Download")
            .field("url", &self.url)
            .field("destination", &self.destination)
            .field("staging", &self.staging)
            .field("headers", &self.headers)
            .field("expected_size", &self.expected_size)
            .field("progress", &self.progress.is_some())
            .field("canceled", &self.cancel.is_cancelled())
            .finish()
    }
}

impl Download {
    /// Creates a new [`Download`] of `url` into `destination`.
    ///
    /// The staging path is always `<destination>.tmp`.
    pub fn new(url: &Url, destination: impl Into<PathBuf>) -> Self {
        let destination = destination.into();
        Self {
            url: url.clone(),
            staging: staging::staging_path_for(&destination),
            destination,
            headers: HeaderMap::new(),
            expected_size: None,
            progress: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Final location of the file.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Location of the staging file.
    pub fn staging_path(&self) -> &Path {
        &self.staging
    }

    /// Total size remembered from an earlier attempt, if any.
    pub fn expected_size(&self) -> Option<u64> {
        self.expected_size
    }

    /// Records the total size learned from an earlier attempt.
    ///
    /// With it, a destination that already has exactly this length is
    /// accepted without any network I/O.
    pub fn set_expected_size(&mut self, size: Option<u64>) {
        self.expected_size = size;
    }

    /// Registered progress listener.
    pub fn progress_listener(&self) -> Option<&Arc<dyn ProgressListener>> {
        self.progress.as_ref()
    }

    /// Registers a progress listener.
    pub fn set_progress_listener(&mut self, listener: Option<Arc<dyn ProgressListener>>) {
        self.progress = listener;
    }

    /// Appends a caller-supplied outbound header.
    ///
    /// Headers are contributions: repeated names are all sent, in order.
    /// `Range` and `Accept-Encoding` are always overridden per attempt.
    pub fn put_header(&mut self, name: HeaderName, value: HeaderValue) -> &HeaderMap {
        self.headers.append(name, value);
        &self.headers
    }

    /// Caller-supplied headers, without the per-attempt ones.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Replaces the cancellation token, e.g. to share one with a parent task.
    pub fn set_cancellation(&mut self, token: CancellationToken) {
        self.cancel = token;
    }

    /// The cancellation token observed by the copy loop.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Requests cooperative cancellation.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether cancellation was requested.
    pub fn is_canceled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Builds the header set for one attempt.
    ///
    /// `resume_offset` is the current staging length. A fresh map is built on
    /// every call, so repeated attempts never stack duplicate `Range` values.
    pub fn outbound_headers(&self, resume_offset: u64) -> HeaderMap {
        let mut headers = self.headers.clone();
        headers.insert(RANGE, format_range(resume_offset));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));
        headers
    }

    /// Creates parent directories and an empty staging placeholder.
    ///
    /// Existing staging bytes are kept.
    pub async fn prepare(&self) -> Result<()> {
        staging::prepare(&self.staging).await
    }
}

fn format_range(offset: u64) -> HeaderValue {
    // Digits and ASCII only, always a valid header value.
    HeaderValue::from_str(&format!("bytes={}-", offset))
        .unwrap_or_else(|_| HeaderValue::from_static("bytes=0-"))
}

impl TryFrom<(&str, &Path)> for Download {
    type Error = crate::error::Error;

    fn try_from((url, destination): (&str, &Path)) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| {
            crate::error::Error::InvalidUrl(format!("The url \"{}\" cannot be parsed: {}", url, e))
        })?;
        match url.scheme() {
            "http" | "https" => Ok(Download::new(&url, destination)),
            other => Err(crate::error::Error::InvalidUrl(format!(
                "The url \"{}\" uses unsupported scheme \"{}\"",
                url, other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::USER_AGENT;

    fn download() -> Download {
        Download::new(&Url::parse("http://example.com/a.bin").unwrap(), "/tmp/out/a.bin")
    }

    #[test]
    fn test_outbound_headers_are_rebuilt() {
        let mut d = download();
        d.put_header(USER_AGENT, HeaderValue::from_static("ua"));

        let first = d.outbound_headers(0);
        let second = d.outbound_headers(128);

        assert_eq!(first.get(RANGE).unwrap(), "bytes=0-");
        assert_eq!(second.get(RANGE).unwrap(), "bytes=128-");
        assert_eq!(second.get_all(RANGE).iter().count(), 1);
        assert_eq!(second.get(ACCEPT_ENCODING).unwrap(), "identity");
        assert_eq!(second.get(USER_AGENT).unwrap(), "ua");
    }

    #[test]
    fn test_caller_cannot_override_accept_encoding() {
        let mut d = download();
        d.put_header(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
        let headers = d.outbound_headers(0);
        assert_eq!(headers.get_all(ACCEPT_ENCODING).iter().count(), 1);
        assert_eq!(headers.get(ACCEPT_ENCODING).unwrap(), "identity");
    }

    #[test]
    fn test_cancel_is_shared_with_clones() {
        let d = download();
        let clone = d.clone();
        d.cancel();
        assert!(clone.is_canceled());
    }

    #[test]
    fn test_try_from_rejects_other_schemes() {
        assert!(Download::try_from(("ftp://example.com/a", Path::new("a"))).is_err());
        assert!(Download::try_from(("not a url", Path::new("a"))).is_err());
        assert!(Download::try_from(("https://example.com/a", Path::new("a"))).is_ok());
    }
}
