//! HTTP module: client setup, the transport seam and cache metadata.
//!
//! - [`client`] - HTTP client creation and middleware configuration
//! - [`transport`] - The [`Transport`] trait and its reqwest implementation
//! - [`cache`] - Cache-control metadata attached to successful responses
//!
//! # Examples
//!
//! ```rust
//! use rangefetch::http::{HttpClientConfig, ReqwestTransport};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = ReqwestTransport::from_config(HttpClientConfig::default())?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod transport;

pub use cache::{parse_cache_headers, CacheMeta};
pub use client::{create_http_client, HttpClientConfig};
pub use transport::{Body, RemoteResponse, ReqwestTransport, Transport};
