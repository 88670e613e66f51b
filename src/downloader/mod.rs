//! Request orchestration: the file request, its builder, and the executor.
//!
//! - `request` - the capability interface a dispatch queue drives
//! - `delivery` - routing of results and progress to the caller
//! - `file_request` - the resumable file download request
//! - `builder` - [`FileRequestBuilder`] for configuring one request
//! - `config` - per-request settings and callback types
//! - `downloader` - [`Downloader`], which runs one attempt
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
//!     .on_success(|_headers, _body| println!("done"))
//!     .on_failure(|e| eprintln!("failed: {e}"))
//!     .build()?;
//!
//! // Interrupted attempts resume from `downloads/file.zip.tmp`.
//! downloader.perform(&request).await;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod delivery;
pub mod downloader;
pub mod file_request;
pub mod request;

pub use builder::FileRequestBuilder;
pub use config::{FailureCallback, RequestConfig, SuccessCallback, DEFAULT_CACHE_TIME};
pub use delivery::{Delivery, ImmediateDelivery};
pub use downloader::Downloader;
pub use file_request::FileRequest;
pub use request::{Priority, Request};
