//! The on-disk staging file.
//!
//! Bytes are written to `<destination>.tmp` and only reach the destination
//! through a rename. The staging length is the authoritative resume offset.

use crate::error::Result;

use std::ffi::OsString;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use tracing::{debug, warn};

/// Suffix appended to the destination to form the staging path.
pub const STAGING_SUFFIX: &str = ".tmp";

/// Staging path for `destination`.
pub fn staging_path_for(destination: &Path) -> PathBuf {
    let mut name = OsString::from(destination.as_os_str());
    name.push(STAGING_SUFFIX);
    PathBuf::from(name)
}

/// Length of the file at `path`, 0 if it does not exist.
pub async fn file_len(path: &Path) -> u64 {
    fs::metadata(path).await.map(|m| m.len()).unwrap_or(0)
}

/// Creates the parent directories and an empty staging file if none exists.
pub async fn prepare(staging: &Path) -> Result<()> {
    if let Some(dir) = staging.parent().filter(|p| !p.as_os_str().is_empty()) {
        debug!("Creating staging directory {:?}", dir);
        fs::create_dir_all(dir).await?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(staging)
        .await?;
    Ok(())
}

/// Exclusive write handle on the staging file for one copy.
#[derive(Debug)]
pub struct StagingFile {
    path: PathBuf,
    file: File,
    offset: u64,
}

impl StagingFile {
    /// Opens the staging file for the next write.
    ///
    /// With range support the handle is positioned at the current end so the
    /// new bytes extend what is there. Without it the file is truncated and
    /// the download restarts from zero.
    pub async fn open(path: &Path, supports_range: bool) -> Result<Self> {
        debug!("Opening staging file {:?} (resume: {})", path, supports_range);
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .await?;

        let offset = if supports_range {
            file.seek(SeekFrom::End(0)).await?
        } else {
            file.set_len(0).await?;
            file.seek(SeekFrom::Start(0)).await?
        };

        Ok(Self {
            path: path.to_path_buf(),
            file,
            offset,
        })
    }

    /// Byte count already present when the handle was opened.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Path of the staging file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writer for the copy loop.
    pub fn writer(&mut self) -> &mut File {
        &mut self.file
    }

    /// Flushes and releases the handle.
    ///
    /// Failures are logged; by the time the handle is closed the outcome of
    /// the copy is already decided.
    pub async fn close(mut self) {
        if let Err(e) = self.file.flush().await {
            warn!("Error flushing staging file {:?}: {}", self.path, e);
        }
        if let Err(e) = self.file.sync_all().await {
            warn!("Error syncing staging file {:?}: {}", self.path, e);
        }
    }
}
