//! The capability interface a dispatch queue drives.
//!
//! A queue only needs to know how to build a request's outbound headers, turn
//! a transport response into a typed result, rank the request against others,
//! and hand the result back. Each request variant implements [`Request`].

use super::delivery::Delivery;
use crate::download::Response;
use crate::error::{Error, Result};
use crate::http::RemoteResponse;

use async_trait::async_trait;
use reqwest::{header::HeaderMap, Url};

/// Scheduling priority relative to other in-flight requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Immediate,
}

/// One schedulable network operation.
#[async_trait]
pub trait Request: Send + Sync {
    /// Target URL.
    fn url(&self) -> &Url;

    /// Ranking used by the dispatch queue.
    fn priority(&self) -> Priority {
        Priority::Normal
    }

    /// Key under which a response cache would store the result.
    fn cache_key(&self) -> String {
        self.url().to_string()
    }

    /// Whether the result may be stored in a response cache.
    fn should_cache(&self) -> bool {
        true
    }

    /// Whether cancellation was requested.
    fn is_canceled(&self) -> bool;

    /// Best-effort setup before the attempt. Failures are logged by the caller.
    async fn prepare(&self) -> Result<()> {
        Ok(())
    }

    /// A result that can be produced without touching the network, if any.
    async fn local_response(&self, _delivery: &dyn Delivery) -> Result<Option<Response>> {
        Ok(None)
    }

    /// Outbound headers for this attempt.
    async fn headers(&self) -> Result<HeaderMap>;

    /// Consumes the transport response and produces the typed result.
    async fn parse_response(
        &self,
        response: RemoteResponse,
        delivery: &dyn Delivery,
    ) -> Result<Response>;

    /// Hands a successful result to the caller.
    fn deliver_response(&self, response: Response);

    /// Hands a failure to the caller.
    fn deliver_error(&self, error: &Error);
}
