//! Rangefetch is a crate for resumable file downloads over HTTP(S).
//!
//! Bytes accumulate in `<destination>.tmp`. Every attempt asks the server for
//! the missing suffix with a `Range` header and appends to the staging file;
//! a server that ignores ranges restarts the file from zero. Only a complete
//! transfer is renamed over the destination, so an interrupted or canceled
//! attempt leaves the staging file for the next one.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rangefetch::{Downloader, Error, FileRequestBuilder, HttpClientConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! let request = FileRequestBuilder::new(
//!     "https://github.com/seanmonstar/reqwest/archive/refs/tags/v0.11.9.zip",
//!     "output/reqwest-v0.11.9.zip",
//! )
//! .build()?;
//! let downloader = Downloader::from_config(HttpClientConfig::default())?;
//! downloader.execute(&request).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`download`] - The pieces of one transfer: range negotiation, staging, copying, finalization
//! - [`downloader`] - The `FileRequest`, its builder, and the `Downloader` that runs it
//! - [`error`] - Centralized error handling with the `Error` enum
//! - [`http`] - HTTP client, the transport seam and cache metadata
//! - [`progress`] - Progress listeners and the progress bar display
//! - [`utils`] - Header helpers

pub mod download;
pub mod downloader;
pub mod error;
pub mod http;
pub mod progress;
pub mod utils;

pub use download::{Download, Response};
pub use downloader::{
    Delivery, Downloader, FileRequest, FileRequestBuilder, ImmediateDelivery, Priority, Request,
    RequestConfig,
};
pub use error::{Error, Result};
pub use http::{create_http_client, CacheMeta, HttpClientConfig, ReqwestTransport, Transport};
pub use progress::{ProgressBarOpts, ProgressDisplay, ProgressListener};
pub use utils::content_length::{extract_content_length, parse_content_range_total};
