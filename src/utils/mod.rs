//! Shared utility functions.
//!
//! This module contains header helpers used by the range negotiation and the
//! transport layer.
//!
//! # Examples
//!
//! ```rust
//! use rangefetch::utils::parse_content_range_total;
//!
//! // Extract total size from a Content-Range header
//! let header_value = "bytes 0-1023/2048";
//! if let Some(total_size) = parse_content_range_total(header_value) {
//!     println!("Total file size: {} bytes", total_size);
//! }
//! ```

pub mod content_length;

// Re-export commonly used utilities
pub use content_length::{content_range_total, extract_content_length, parse_content_range_total};
