//! HTTP client setup and middleware configuration.
//!
//! The client never asks for transparent decompression: downloads send
//! `Accept-Encoding: identity` and gzip bodies are decoded by the stream
//! copier, so the bytes on disk are always under this crate's control.
//!
//! # Examples
//!
//! ```rust
//! use rangefetch::http::{create_http_client, HttpClientConfig};
//! use reqwest::header::{HeaderMap, USER_AGENT};
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut headers = HeaderMap::new();
//! headers.insert(USER_AGENT, "MyDownloader/1.0".parse()?);
//!
//! let config = HttpClientConfig {
//!     proxy: None,
//!     headers: Some(headers),
//!     timeout: Some(Duration::from_secs(30)),
//! };
//!
//! let client = create_http_client(config)?;
//! # Ok(())
//! # }
//! ```

use reqwest::{header::HeaderMap, Proxy};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use std::time::Duration;

/// Configuration for HTTP client setup.
#[derive(Debug, Clone, Default)]
pub struct HttpClientConfig {
    /// Optional proxy configuration.
    pub proxy: Option<Proxy>,
    /// Default headers to include with all requests.
    pub headers: Option<HeaderMap>,
    /// Total request timeout. Downloads have none by default.
    pub timeout: Option<Duration>,
}

/// Builds the reqwest client used by [`ReqwestTransport`](super::ReqwestTransport),
/// wrapped in request tracing.
///
/// There is no retry middleware. The caller's queue reschedules failed
/// attempts and each one rebuilds its `Range` header from the staging file.
pub fn create_http_client(
    config: HttpClientConfig,
) -> Result<ClientWithMiddleware, reqwest::Error> {
    let HttpClientConfig {
        proxy,
        headers,
        timeout,
    } = config;

    let mut builder = reqwest::Client::builder();
    if let Some(proxy) = proxy {
        builder = builder.proxy(proxy);
    }
    if let Some(headers) = headers {
        builder = builder.default_headers(headers);
    }
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    // Each request becomes a span under the caller's subscriber.
    Ok(ClientBuilder::new(builder.build()?)
        .with(TracingMiddleware::default())
        .build())
}
