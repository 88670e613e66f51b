use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use bytes::Bytes;
use flate2::{write::GzEncoder, Compression};
use futures::stream;
use rangefetch::http::{Body, RemoteResponse, Transport};
use rangefetch::{ProgressListener, Result};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, RANGE,
    USER_AGENT,
};
use reqwest::{StatusCode, Url};
use tempfile::TempDir;

// Common test constants
pub const TEST_URL: &str = "http://domain.com/file.bin";
pub const TEST_USER_AGENT: &str = "rangefetch-test-agent";
pub const MOCK_CHUNK: usize = 1000;

/// Routes `tracing` output to the test harness once per binary.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates a temporary file with the given content
pub fn create_temp_file(dir: &Path, filename: &str, content: &[u8]) -> PathBuf {
    let file_path = dir.join(filename);
    fs::write(&file_path, content).expect("Failed to write temporary file");
    file_path
}

/// Creates test file content of specified size
pub fn create_test_content(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 251) as u8).collect()
}

/// Gzip-compresses `content`.
pub fn gzip(content: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(content).expect("Failed to compress");
    encoder.finish().expect("Failed to finish compression")
}

/// Creates test headers with common user agent
pub fn create_test_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(TEST_USER_AGENT));
    headers
}

/// Asserts that a file exists with exactly `expected` as content
pub fn assert_file_content(path: &Path, expected: &[u8]) {
    let actual = fs::read(path).unwrap_or_else(|e| panic!("Failed to read {:?}: {}", path, e));
    assert_eq!(actual.len(), expected.len(), "File size mismatch at {:?}", path);
    assert!(actual == expected, "File content mismatch at {:?}", path);
}

/// Asserts that nothing exists at the given path
pub fn assert_missing(path: &Path) {
    assert!(!path.exists(), "Nothing should exist at path: {:?}", path);
}

// === Progress Helpers ===

/// Records every progress update it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    updates: Arc<Mutex<Vec<(u64, u64)>>>,
}

impl RecordingListener {
    pub fn updates(&self) -> Vec<(u64, u64)> {
        self.updates.lock().unwrap().clone()
    }
}

impl ProgressListener for RecordingListener {
    fn on_progress(&self, downloaded: u64, total: u64) {
        self.updates.lock().unwrap().push((downloaded, total));
    }
}

// === Transport Helpers ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Honors `Range`: 206 with `Content-Range` for a non-zero offset.
    Ranged,
    /// Ignores `Range` and always sends the whole body with 200.
    Whole,
    /// Answers with a bare status and no body.
    Status(StatusCode),
}

/// In-memory [`Transport`] that serves one resource and records each call.
#[derive(Debug)]
pub struct MockTransport {
    content: Vec<u8>,
    mode: Mode,
    extra: HeaderMap,
    content_range: Option<String>,
    with_length: bool,
    fail_after: Option<usize>,
    calls: AtomicUsize,
    requests: Mutex<Vec<HeaderMap>>,
}

impl MockTransport {
    fn new(content: Vec<u8>, mode: Mode) -> Self {
        Self {
            content,
            mode,
            extra: HeaderMap::new(),
            content_range: None,
            with_length: true,
            fail_after: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A server that supports byte ranges.
    pub fn ranged(content: Vec<u8>) -> Self {
        Self::new(content, Mode::Ranged)
    }

    /// A server that ignores byte ranges.
    pub fn whole(content: Vec<u8>) -> Self {
        Self::new(content, Mode::Whole)
    }

    /// A server that answers every request with `status`.
    pub fn status(status: StatusCode) -> Self {
        Self::new(Vec::new(), Mode::Status(status))
    }

    /// Adds a response header.
    pub fn with_header(mut self, name: HeaderName, value: &'static str) -> Self {
        self.extra.insert(name, HeaderValue::from_static(value));
        self
    }

    /// Forces the `Content-Range` response header.
    pub fn with_content_range(mut self, value: &str) -> Self {
        self.content_range = Some(value.to_string());
        self
    }

    /// Omits the body length from both the headers and the transport.
    pub fn without_length(mut self) -> Self {
        self.with_length = false;
        self
    }

    /// Breaks the body stream after `bytes` bytes of this response.
    pub fn failing_after(mut self, bytes: usize) -> Self {
        self.fail_after = Some(bytes);
        self
    }

    /// Number of requests served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Outbound headers of every request, in order.
    pub fn requests(&self) -> Vec<HeaderMap> {
        self.requests.lock().unwrap().clone()
    }

    fn requested_offset(headers: &HeaderMap) -> usize {
        headers
            .get(RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("bytes="))
            .and_then(|v| v.trim_end_matches('-').parse().ok())
            .unwrap_or(0)
    }

    fn body(&self, bytes: &[u8]) -> Body {
        let mut chunks: Vec<io::Result<Bytes>> = Vec::new();
        let limit = self.fail_after.unwrap_or(usize::MAX).min(bytes.len());
        for chunk in bytes[..limit].chunks(MOCK_CHUNK) {
            chunks.push(Ok(Bytes::copy_from_slice(chunk)));
        }
        if self.fail_after.is_some_and(|n| n < bytes.len()) {
            chunks.push(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )));
        }
        Body::from_stream(stream::iter(chunks))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, _url: &Url, headers: HeaderMap) -> Result<RemoteResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let offset = Self::requested_offset(&headers);
        self.requests.lock().unwrap().push(headers);

        let mut response_headers = self.extra.clone();
        let (status, served) = match self.mode {
            Mode::Status(status) => {
                return Ok(RemoteResponse {
                    status,
                    headers: response_headers,
                    content_length: Some(0),
                    body: Body::empty(),
                })
            }
            Mode::Whole => (StatusCode::OK, &self.content[..]),
            Mode::Ranged => {
                response_headers.insert(ACCEPT_RANGES, HeaderValue::from_static("bytes"));
                if offset == 0 {
                    (StatusCode::OK, &self.content[..])
                } else if offset >= self.content.len() {
                    let range = format!("bytes */{}", self.content.len());
                    response_headers.insert(CONTENT_RANGE, range.parse().unwrap());
                    (StatusCode::PARTIAL_CONTENT, &self.content[..0])
                } else {
                    let range = format!(
                        "bytes {}-{}/{}",
                        offset,
                        self.content.len() - 1,
                        self.content.len()
                    );
                    response_headers.insert(CONTENT_RANGE, range.parse().unwrap());
                    (StatusCode::PARTIAL_CONTENT, &self.content[offset..])
                }
            }
        };

        if let Some(range) = &self.content_range {
            response_headers.insert(CONTENT_RANGE, range.parse().unwrap());
        }
        let content_length = self.with_length.then_some(served.len() as u64);
        if let Some(len) = content_length {
            response_headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
        }

        Ok(RemoteResponse {
            status,
            headers: response_headers,
            content_length,
            body: self.body(served),
        })
    }
}

/// Shares one [`MockTransport`] between the test and the downloader.
#[derive(Debug, Clone)]
pub struct SharedTransport(pub Arc<MockTransport>);

#[async_trait]
impl Transport for SharedTransport {
    async fn execute(&self, url: &Url, headers: HeaderMap) -> Result<RemoteResponse> {
        self.0.execute(url, headers).await
    }
}

/// Wraps `transport` so the test can inspect it after handing it over.
pub fn shared(transport: MockTransport) -> (SharedTransport, Arc<MockTransport>) {
    let inner = Arc::new(transport);
    (SharedTransport(inner.clone()), inner)
}
