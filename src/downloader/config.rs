//! Configuration structures and defaults for file requests.
//!
//! # Examples
//!
//! ```rust
//! use rangefetch::downloader::{Priority, RequestConfig};
//! use std::time::Duration;
//!
//! let config = RequestConfig {
//!     priority: Priority::High,
//!     cache_time: Duration::from_secs(60),
//!     ..RequestConfig::default()
//! };
//! assert!(!config.strict_content_range);
//! ```

use super::request::Priority;
use crate::download::DEFAULT_CHUNK_SIZE;
use crate::error::Error;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Callback type for successful downloads: unique-key headers and the body,
/// which is empty for file downloads.
pub type SuccessCallback = Arc<dyn Fn(HashMap<String, String>, Vec<u8>) + Send + Sync>;

/// Callback type for failed downloads.
pub type FailureCallback = Arc<dyn Fn(&Error) + Send + Sync>;

/// Default freshness when server cache control is not used.
pub const DEFAULT_CACHE_TIME: Duration = Duration::from_secs(5 * 60);

/// Per-request configuration.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Scheduling priority.
    pub priority: Priority,
    /// Derive cache metadata from the server's cache headers.
    pub use_server_control: bool,
    /// Freshness used when `use_server_control` is off.
    pub cache_time: Duration,
    /// Fail instead of warn when `Content-Range` disagrees with the request.
    pub strict_content_range: bool,
    /// Read size of the copy loop.
    pub chunk_size: usize,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            priority: Priority::Low,
            use_server_control: false,
            cache_time: DEFAULT_CACHE_TIME,
            strict_content_range: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RequestConfig::default();
        assert_eq!(config.priority, Priority::Low);
        assert!(!config.use_server_control);
        assert!(!config.strict_content_range);
        assert_eq!(config.chunk_size, 6 * 1024);
        assert_eq!(config.cache_time, Duration::from_secs(300));
    }
}
