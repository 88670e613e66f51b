//! The resumable file download request.
//!
//! One attempt goes through these phases:
//!
//! 1. the outbound headers ask for `bytes=<staged>-` with identity encoding;
//! 2. the response headers decide resume vs restart and the expected total;
//! 3. a destination that already holds the whole file skips the body;
//! 4. the body is appended to `<destination>.tmp`, decoding gzip on the way;
//! 5. the staging file is renamed over the destination.
//!
//! A failure or cancellation at any point leaves the staging file behind so
//! the next attempt resumes where this one stopped.

use super::config::{FailureCallback, RequestConfig, SuccessCallback};
use super::delivery::Delivery;
use super::request::{Priority, Request};
use crate::download::{
    copier::{self, CopyOptions},
    finalize, range, staging, Download, Response, StagingFile,
};
use crate::error::{Error, Result};
use crate::http::{parse_cache_headers, RemoteResponse};

use async_trait::async_trait;
use reqwest::{header::HeaderMap, StatusCode, Url};
use std::fmt;
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

/// A download of one URL into one local file.
pub struct FileRequest {
    download: Download,
    config: RequestConfig,
    on_success: Option<SuccessCallback>,
    on_failure: Option<FailureCallback>,
}

impl fmt::Debug for FileRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileRequest")
            .field("download", &self.download)
            .field("config", &self.config)
            .field("on_success", &self.on_success.is_some())
            .field("on_failure", &self.on_failure.is_some())
            .finish()
    }
}

impl FileRequest {
    pub(crate) fn new(
        download: Download,
        config: RequestConfig,
        on_success: Option<SuccessCallback>,
        on_failure: Option<FailureCallback>,
    ) -> Self {
        Self {
            download,
            config,
            on_success,
            on_failure,
        }
    }

    /// The underlying download descriptor.
    pub fn download(&self) -> &Download {
        &self.download
    }

    /// Mutable access, e.g. to add headers after building.
    pub fn download_mut(&mut self) -> &mut Download {
        &mut self.download
    }

    /// Per-request options.
    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    /// Final path of the downloaded file.
    pub fn destination(&self) -> &Path {
        self.download.destination()
    }

    /// Where bytes accumulate before promotion.
    pub fn staging_path(&self) -> &Path {
        self.download.staging_path()
    }

    /// Requests cooperative cancellation.
    pub fn cancel(&self) {
        self.download.cancel();
    }

    fn post_progress(&self, delivery: &dyn Delivery, downloaded: u64, total: u64) {
        if let Some(listener) = self.download.progress_listener() {
            delivery.post_progress(listener.as_ref(), downloaded, total);
        }
    }

    /// Reuses a destination that already holds all `total` bytes.
    ///
    /// The file is moved into the staging slot so finalization promotes it
    /// back unchanged. A cancellation that lands in between moves it back.
    async fn reuse_complete(
        &self,
        delivery: &dyn Delivery,
        total: u64,
        status: StatusCode,
        headers: HeaderMap,
    ) -> Result<Response> {
        if self.download.is_canceled() {
            return Err(Error::Canceled);
        }
        debug!(
            "{:?} already holds all {} bytes, skipping the transfer",
            self.destination(),
            total
        );
        fs::rename(self.destination(), self.staging_path()).await?;
        self.post_progress(delivery, total, total);

        let finished = self.finish(status, headers).await;
        if matches!(finished, Err(Error::Canceled)) {
            if let Err(e) = fs::rename(self.staging_path(), self.destination()).await {
                warn!(
                    "Could not restore {:?} from {:?}: {}",
                    self.destination(),
                    self.staging_path(),
                    e
                );
            }
        }
        finished
    }

    /// Negotiates the response and copies its body into the staging file.
    ///
    /// Returns the total size instead when the destination is already complete.
    async fn transfer(
        &self,
        response: RemoteResponse,
        delivery: &dyn Delivery,
    ) -> Result<Option<u64>> {
        let RemoteResponse {
            headers,
            content_length,
            body,
            ..
        } = response;

        let staged = staging::file_len(self.staging_path()).await;
        let negotiation = range::negotiate(&headers, content_length, staged, self.staging_path());

        if let Some(mismatch) = negotiation.mismatch {
            if self.config.strict_content_range {
                return Err(mismatch.into());
            }
            warn!(
                "The Content-Range header is invalid: assumed [{}] vs real [{}], please remove the staging file {:?}",
                mismatch.assumed, mismatch.actual, mismatch.staging
            );
        }

        let total = negotiation.total;
        if total > 0 && staging::file_len(self.destination()).await == total {
            return Ok(Some(total));
        }

        let mut file = StagingFile::open(self.staging_path(), negotiation.supports_range).await?;
        if negotiation.supports_range {
            debug!("Resuming {} from byte {}", self.download.url, file.offset());
        } else if staged > 0 {
            debug!(
                "{} does not support ranges, discarding {} staged bytes",
                self.download.url, staged
            );
        }

        let options = CopyOptions {
            start: file.offset(),
            total,
            gzip: range::is_gzip(&headers),
            chunk_size: self.config.chunk_size,
            cancel: self.download.cancellation(),
        };
        let copied = copier::copy(body, file.writer(), options, |downloaded, total| {
            self.post_progress(delivery, downloaded, total)
        })
        .await;
        file.close().await;

        let downloaded = copied?;
        debug!(
            "Staged {} bytes (expected {}) in {:?}",
            downloaded,
            total,
            self.staging_path()
        );
        Ok(None)
    }

    /// Promotes the staging file and builds the result.
    async fn finish(&self, status: StatusCode, headers: HeaderMap) -> Result<Response> {
        let cache = parse_cache_headers(
            self.config.use_server_control,
            self.config.cache_time,
            &headers,
        );
        let response = Response::new(status, headers, self.destination()).with_cache(cache);
        finalize::finalize(self.download.cancellation(), self.staging_path(), response).await
    }
}

#[async_trait]
impl Request for FileRequest {
    fn url(&self) -> &Url {
        &self.download.url
    }

    fn priority(&self) -> Priority {
        self.config.priority
    }

    fn cache_key(&self) -> String {
        String::new()
    }

    fn should_cache(&self) -> bool {
        false
    }

    fn is_canceled(&self) -> bool {
        self.download.is_canceled()
    }

    async fn prepare(&self) -> Result<()> {
        self.download.prepare().await
    }

    async fn local_response(&self, delivery: &dyn Delivery) -> Result<Option<Response>> {
        let Some(total) = self.download.expected_size().filter(|size| *size > 0) else {
            return Ok(None);
        };
        if staging::file_len(self.destination()).await != total {
            return Ok(None);
        }

        self.reuse_complete(delivery, total, StatusCode::OK, HeaderMap::new())
            .await
            .map(Some)
    }

    async fn headers(&self) -> Result<HeaderMap> {
        let offset = staging::file_len(self.staging_path()).await;
        debug!("Fetching {} from byte {}", self.download.url, offset);
        Ok(self.download.outbound_headers(offset))
    }

    async fn parse_response(
        &self,
        response: RemoteResponse,
        delivery: &dyn Delivery,
    ) -> Result<Response> {
        let status = response.status;
        let headers = response.headers.clone();
        match self.transfer(response, delivery).await? {
            Some(total) => self.reuse_complete(delivery, total, status, headers).await,
            None => self.finish(status, headers).await,
        }
    }

    fn deliver_response(&self, response: Response) {
        if let Some(callback) = &self.on_success {
            let (headers, body) = response.into_delivery();
            callback(headers, body);
        }
    }

    fn deliver_error(&self, error: &Error) {
        if let Some(callback) = &self.on_failure {
            callback(error);
        }
    }
}
