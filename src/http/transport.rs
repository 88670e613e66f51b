//! Transport seam between the download engine and the network.
//!
//! The engine issues exactly one request per attempt through [`Transport`] and
//! consumes the returned [`RemoteResponse`] once. [`ReqwestTransport`] is the
//! stock implementation; tests and embedders can plug in their own.

use crate::error::{Error, Result};
use crate::http::client::{create_http_client, HttpClientConfig};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use futures::Stream;
use reqwest::{header::HeaderMap, StatusCode, Url};
use reqwest_middleware::ClientWithMiddleware;
use std::fmt;
use std::io;
use tokio_util::io::StreamReader;
use tracing::debug;

/// Response body as a stream of byte chunks.
pub struct Body {
    stream: BoxStream<'static, io::Result<Bytes>>,
    decoded: bool,
}

impl Body {
    /// Wraps an arbitrary chunk stream.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = io::Result<Bytes>> + Send + 'static,
    {
        Self {
            stream: stream.boxed(),
            decoded: false,
        }
    }

    /// A body made of a single in-memory buffer.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self::from_stream(stream::iter([Ok(bytes.into())]))
    }

    /// A body with no bytes at all.
    pub fn empty() -> Self {
        Self::from_stream(stream::empty())
    }

    /// Marks the body as already content-decoded by the transport.
    ///
    /// The stream copier then never wraps it in a second gzip decoder.
    pub fn decoded(mut self) -> Self {
        self.decoded = true;
        self
    }

    /// Whether the transport already removed the content encoding.
    pub fn is_decoded(&self) -> bool {
        self.decoded
    }

    /// The raw chunk stream.
    pub fn into_stream(self) -> BoxStream<'static, io::Result<Bytes>> {
        self.stream
    }

    pub(crate) fn into_reader(self) -> StreamReader<BoxStream<'static, io::Result<Bytes>>, Bytes> {
        StreamReader::new(self.stream)
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("decoded", &self.decoded)
            .finish_non_exhaustive()
    }
}

/// What the transport hands back for one request.
#[derive(Debug)]
pub struct RemoteResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Body size as reported by the transport, when known.
    pub content_length: Option<u64>,
    /// Body stream, read exactly once.
    pub body: Body,
}

/// Issues one HTTP request and yields status, headers and a body stream.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a GET for `url` with exactly the given headers.
    async fn execute(&self, url: &Url, headers: HeaderMap) -> Result<RemoteResponse>;
}

/// [`Transport`] backed by a reqwest client with middleware.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: ClientWithMiddleware,
}

impl ReqwestTransport {
    /// Uses an already configured client.
    pub fn new(client: ClientWithMiddleware) -> Self {
        Self { client }
    }

    /// Builds a client from `config` via [`create_http_client`].
    pub fn from_config(config: HttpClientConfig) -> Result<Self> {
        Ok(Self::new(create_http_client(config)?))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, url: &Url, headers: HeaderMap) -> Result<RemoteResponse> {
        debug!("Fetching {}", url);
        let res = self
            .client
            .get(url.clone())
            .headers(headers)
            .send()
            .await
            .map_err(Error::from)?;

        let status = res.status();
        let headers = res.headers().clone();
        let content_length = res.content_length();
        let body = Body::from_stream(res.bytes_stream().map_err(io::Error::other));

        Ok(RemoteResponse {
            status,
            headers,
            content_length,
            body,
        })
    }
}
