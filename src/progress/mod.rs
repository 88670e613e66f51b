//! Progress reporting.
//!
//! A [`ProgressListener`] receives `(downloaded, total)` after every chunk
//! written to the staging file. `total` is 0 when the server did not announce
//! a size. Plain closures are listeners, and [`ProgressDisplay`] renders the
//! updates as an indicatif progress bar.
//!
//! # Examples
//!
//! ```rust
//! use rangefetch::progress::{ProgressBarOpts, ProgressDisplay, ProgressListener};
//!
//! let log = |downloaded: u64, total: u64| println!("{downloaded}/{total}");
//! log.on_progress(10, 100);
//!
//! let bar = ProgressDisplay::new(ProgressBarOpts::hidden());
//! bar.on_progress(50, 100);
//! assert_eq!(bar.position(), 50);
//! ```

pub(crate) mod display;
pub(crate) mod style;

pub use display::ProgressDisplay;
pub use style::ProgressBarOpts;

/// Receives transfer progress.
pub trait ProgressListener: Send + Sync {
    /// Called with the bytes in the staging file so far and the expected
    /// total (0 if unknown).
    fn on_progress(&self, downloaded: u64, total: u64);
}

impl<F> ProgressListener for F
where
    F: Fn(u64, u64) + Send + Sync,
{
    fn on_progress(&self, downloaded: u64, total: u64) {
        self(downloaded, total)
    }
}
