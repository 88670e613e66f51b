//! Routing of results and progress back to the caller.
//!
//! Implementations decide on which thread or task callbacks run. The
//! download engine never synchronizes anything itself; it only calls into a
//! [`Delivery`].

use super::request::Request;
use crate::download::Response;
use crate::error::Error;
use crate::progress::ProgressListener;

/// Marshals results and progress updates to their listeners.
pub trait Delivery: Send + Sync {
    /// Routes one progress update.
    fn post_progress(&self, listener: &dyn ProgressListener, downloaded: u64, total: u64);

    /// Routes a successful result to the request's callback.
    fn post_response(&self, request: &dyn Request, response: Response);

    /// Routes a failure to the request's callback.
    fn post_error(&self, request: &dyn Request, error: Error);
}

/// Calls listeners in place on the current task.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateDelivery;

impl Delivery for ImmediateDelivery {
    fn post_progress(&self, listener: &dyn ProgressListener, downloaded: u64, total: u64) {
        listener.on_progress(downloaded, total);
    }

    fn post_response(&self, request: &dyn Request, response: Response) {
        request.deliver_response(response);
    }

    fn post_error(&self, request: &dyn Request, error: Error) {
        request.deliver_error(&error);
    }
}
