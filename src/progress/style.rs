//! How a [`ProgressDisplay`](super::ProgressDisplay) draws its bar.
//!
//! # Examples
//!
//! ```rust
//! use rangefetch::progress::ProgressBarOpts;
//!
//! let custom = ProgressBarOpts::default()
//!     .template("[{bar:40.cyan/blue}] {bytes}/{total_bytes}")
//!     .chars("#>-")
//!     .keep_on_finish();
//! let quiet = ProgressBarOpts::hidden();
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

const PIP_TEMPLATE: &str =
    "{bar:40.green/black} {bytes:>11.green}/{total_bytes:<11.green} {bytes_per_sec:>13.red} eta {eta:.blue}";
const PIP_CHARS: &str = "━╾╴─";

/// Drawing options for a download bar.
///
/// The default is indicatif's plain bar, cleared once the download is over.
#[derive(Debug, Clone)]
pub struct ProgressBarOpts {
    template: Option<String>,
    /// At least three characters: filled, current and to do.
    chars: Option<String>,
    hidden: bool,
    pub(crate) clear: bool,
}

impl Default for ProgressBarOpts {
    fn default() -> Self {
        Self {
            template: None,
            chars: None,
            hidden: false,
            clear: true,
        }
    }
}

impl ProgressBarOpts {
    /// A bar in the style of the pip installer, with transfer rate and eta.
    pub fn pip() -> Self {
        Self::default().template(PIP_TEMPLATE).chars(PIP_CHARS)
    }

    /// Draws nothing. Position and length are still tracked.
    pub fn hidden() -> Self {
        Self {
            hidden: true,
            ..Self::default()
        }
    }

    /// Uses an indicatif template. An invalid one falls back to the plain bar.
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Uses custom progress characters.
    pub fn chars(mut self, chars: impl Into<String>) -> Self {
        self.chars = Some(chars.into());
        self
    }

    /// Leaves the finished bar on screen.
    pub fn keep_on_finish(mut self) -> Self {
        self.clear = false;
        self
    }

    fn style(&self) -> ProgressStyle {
        let mut style = match &self.template {
            Some(template) => ProgressStyle::default_bar()
                .template(template)
                .unwrap_or_else(|e| {
                    warn!("Ignoring invalid progress template {:?}: {}", template, e);
                    ProgressStyle::default_bar()
                }),
            None => ProgressStyle::default_bar(),
        };
        if let Some(chars) = &self.chars {
            style = style.progress_chars(chars);
        }
        style
    }

    /// Builds a bar of `len` bytes.
    pub fn to_progress_bar(&self, len: u64) -> ProgressBar {
        if self.hidden {
            return ProgressBar::hidden();
        }
        ProgressBar::new(len).with_style(self.style())
    }
}
