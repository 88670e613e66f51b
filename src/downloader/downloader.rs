//! Request execution.
//!
//! The [`Downloader`] runs one request at a time through a [`Transport`] and
//! routes the outcome through a [`Delivery`]. Queueing, retries and worker
//! pools live outside; they call [`Downloader::perform`] per request.
//!
//! # Examples
//!
//! ```rust,no_run
//! use rangefetch::downloader::{Downloader, FileRequestBuilder};
//! use rangefetch::http::HttpClientConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = Downloader::from_config(HttpClientConfig::default())?;
//! let request = FileRequestBuilder::new("https://example.com/file.zip", "downloads/file.zip")
//!     .progress(|downloaded: u64, total: u64| println!("{downloaded}/{total}"))
//!     .build()?;
//!
//! let response = downloader.execute(&request).await?;
//! println!("Saved to {:?}", response.destination());
//! # Ok(())
//! # }
//! ```

use super::delivery::{Delivery, ImmediateDelivery};
use super::request::Request;
use crate::download::Response;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, ReqwestTransport, Transport};

use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Represents the download controller.
#[derive(Clone)]
pub struct Downloader {
    transport: Arc<dyn Transport>,
    delivery: Arc<dyn Delivery>,
}

impl fmt::Debug for Downloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downloader").finish_non_exhaustive()
    }
}

impl Downloader {
    /// Creates a downloader over `transport` that delivers in place.
    pub fn new<T>(transport: T) -> Self
    where
        T: Transport + 'static,
    {
        Self {
            transport: Arc::new(transport),
            delivery: Arc::new(ImmediateDelivery),
        }
    }

    /// Creates a downloader backed by a reqwest client.
    pub fn from_config(config: HttpClientConfig) -> Result<Self> {
        Ok(Self::new(ReqwestTransport::from_config(config)?))
    }

    /// Replaces how results and progress reach their listeners.
    pub fn with_delivery<D>(mut self, delivery: D) -> Self
    where
        D: Delivery + 'static,
    {
        self.delivery = Arc::new(delivery);
        self
    }

    /// Runs one attempt of `request` and returns its result.
    ///
    /// A non-2xx status fails before any local file is touched. Progress is
    /// routed through the delivery; the result is not.
    pub async fn execute(&self, request: &dyn Request) -> Result<Response> {
        debug!(
            "Executing {} (priority {:?})",
            request.url(),
            request.priority()
        );
        if let Err(e) = request.prepare().await {
            warn!("Could not prepare {}: {}", request.url(), e);
        }

        if request.is_canceled() {
            return Err(Error::Canceled);
        }

        if let Some(response) = request.local_response(self.delivery.as_ref()).await? {
            return Ok(response);
        }

        let headers = request.headers().await?;
        let response = self.transport.execute(request.url(), headers).await?;
        if !response.status.is_success() {
            debug!("{} answered {}", request.url(), response.status);
            return Err(Error::HttpStatus(response.status));
        }

        request
            .parse_response(response, self.delivery.as_ref())
            .await
    }

    /// Runs one attempt and hands the outcome to the request's callbacks.
    ///
    /// Returns whether the attempt succeeded.
    pub async fn perform(&self, request: &dyn Request) -> bool {
        match self.execute(request).await {
            Ok(response) => {
                self.delivery.post_response(request, response);
                true
            }
            Err(e) => {
                match e {
                    Error::Canceled => debug!("{} canceled", request.url()),
                    _ => warn!("{} failed: {}", request.url(), e),
                }
                self.delivery.post_error(request, e);
                false
            }
        }
    }
}
