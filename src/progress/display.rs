//! Progress bar display for a single download.
//!
//! # Examples
//!
//! ```rust,no_run
//! use rangefetch::progress::{ProgressBarOpts, ProgressDisplay};
//!
//! let display = ProgressDisplay::new(ProgressBarOpts::pip());
//! // Clones share the same bar. Hand one to the request builder via
//! // `.progress(display.clone())`, then once the download is over:
//! display.finish();
//! ```

use super::{ProgressBarOpts, ProgressListener};
use indicatif::ProgressBar;

/// Renders download progress as an indicatif bar.
#[derive(Debug, Clone)]
pub struct ProgressDisplay {
    bar: ProgressBar,
    clear: bool,
}

impl ProgressDisplay {
    /// Create a new display with the given bar options.
    ///
    /// The bar length is unknown until the first update with a total.
    pub fn new(opts: ProgressBarOpts) -> Self {
        let clear = opts.clear;
        Self {
            bar: opts.to_progress_bar(0),
            clear,
        }
    }

    /// Get the underlying progress bar.
    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }

    /// Current position in bytes.
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Finish the bar, clearing it if the options say so.
    pub fn finish(&self) {
        if self.clear {
            self.bar.finish_and_clear();
        } else {
            self.bar.finish();
        }
    }
}

impl ProgressListener for ProgressDisplay {
    fn on_progress(&self, downloaded: u64, total: u64) {
        if total > 0 && self.bar.length() != Some(total) {
            self.bar.set_length(total);
        }
        // A restart after a non-resumable response moves the counter back.
        self.bar.set_position(downloaded);
    }
}
