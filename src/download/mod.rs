//! Download module: the pieces of one resumable transfer.
//!
//! An attempt runs these leaves in order:
//!
//! - [`range`] - decides whether the server resumes and how large the file is
//! - [`staging`] - owns the `<destination>.tmp` file and its seek/truncate policy
//! - [`copier`] - copies the body in bounded chunks, decoding gzip on the way
//! - [`finalize`] - promotes the staging file or reports why it cannot
//!
//! [`Download`] describes the attempt and [`Response`] is its successful result.
//! [`crate::downloader`] wires them together.

pub mod copier;
pub mod download;
pub mod finalize;
pub mod range;
pub mod response;
pub mod staging;

pub use copier::{CopyOptions, DEFAULT_CHUNK_SIZE};
pub use download::Download;
pub use range::{Negotiation, RangeMismatch};
pub use response::Response;
pub use staging::{staging_path_for, StagingFile};
