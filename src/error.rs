//! Error handling for the rangefetch library.
//!
//! Every terminal outcome of a download attempt other than success maps to one
//! variant of [`Error`]. None of them remove the staging file, so a later
//! attempt can always resume from whatever bytes were already written.

use reqwest::StatusCode;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can happen while downloading a file.
#[derive(Error, Debug)]
pub enum Error {
    /// The attempt was canceled before its staging file could be promoted.
    #[error("Request was canceled")]
    Canceled,

    /// The staging file is unreadable or empty at finalization time.
    #[error("Download staging file {0:?} was invalid")]
    InvalidStagingFile(PathBuf),

    /// Promoting the staging file to its destination failed.
    ///
    /// Typical causes are a cross-device rename or missing permissions on the
    /// destination directory.
    #[error("Can't rename the staging file {from:?} to {to:?}")]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The server's `Content-Range` does not match the range that was asked for.
    ///
    /// Only raised when strict range validation is enabled. Otherwise the
    /// mismatch is logged and the transfer carries on.
    #[error("Content-Range mismatch for {staging:?}: assumed [{assumed}] vs real [{actual}]")]
    ContentRangeMismatch {
        assumed: String,
        actual: String,
        staging: PathBuf,
    },

    /// The server answered with a non-success status code.
    #[error("Unexpected HTTP status {0}")]
    HttpStatus(StatusCode),

    /// Error from the underlying URL parser or the expected URL format.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// An outbound header name or value could not be encoded.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Error from an underlying system.
    #[error("Internal error: {0}")]
    Internal(String),

    /// I/O Error.
    ///
    /// Raised when opening, reading or writing the body stream or the staging
    /// file fails. The attempt is aborted without promotion.
    #[error("I/O error")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    #[error("Reqwest Error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    /// Error from the HTTP middleware stack.
    #[error("Reqwest middleware error")]
    ReqwestMiddleware {
        #[from]
        source: reqwest_middleware::Error,
    },
}

impl Error {
    /// Whether a later attempt can pick up from the bytes already staged.
    ///
    /// Cancellation, I/O and transport failures leave the staging file usable.
    /// Configuration mistakes (bad URL, bad header) will fail the same way
    /// every time.
    pub fn is_resumable(&self) -> bool {
        !matches!(
            self,
            Error::InvalidUrl(_) | Error::InvalidHeader(_) | Error::Internal(_)
        )
    }
}

/// Result type alias for operations that can fail with a rangefetch error.
pub type Result<T> = std::result::Result<T, Error>;
