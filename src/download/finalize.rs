//! Terminal decision of an attempt: promote the staging file or fail.

use super::response::Response;
use crate::error::{Error, Result};

use std::path::Path;
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Promotes `staging` to `response.destination()`.
///
/// Checked in order: cancellation, then a readable non-empty staging file,
/// then the rename itself. Every failure leaves the staging file in place.
pub async fn finalize(
    cancel: &CancellationToken,
    staging: &Path,
    response: Response,
) -> Result<Response> {
    if cancel.is_cancelled() {
        return Err(Error::Canceled);
    }

    if readable_len(staging).await == 0 {
        return Err(Error::InvalidStagingFile(staging.to_path_buf()));
    }

    debug!("Promoting {:?} to {:?}", staging, response.destination());
    fs::rename(staging, response.destination())
        .await
        .map_err(|source| Error::RenameFailed {
            from: staging.to_path_buf(),
            to: response.destination().to_path_buf(),
            source,
        })?;

    Ok(response)
}

async fn readable_len(path: &Path) -> u64 {
    let Ok(file) = fs::File::open(path).await else {
        return 0;
    };
    file.metadata()
        .await
        .ok()
        .filter(|m| m.is_file())
        .map_or(0, |m| m.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::{header::HeaderMap, StatusCode};

    #[tokio::test]
    async fn test_canceled_wins() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join("f.tmp");
        std::fs::write(&staging, b"data").unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let response = Response::new(StatusCode::OK, HeaderMap::new(), dir.path().join("f"));
        let result = finalize(&cancel, &staging, response).await;

        assert!(matches!(result, Err(Error::Canceled)));
        assert!(staging.exists());
        assert!(!dir.path().join("f").exists());
    }

    #[tokio::test]
    async fn test_empty_or_missing_staging_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join("f.tmp");
        let cancel = CancellationToken::new();

        let response = Response::new(StatusCode::OK, HeaderMap::new(), dir.path().join("f"));
        let result = finalize(&cancel, &staging, response.clone()).await;
        assert!(matches!(result, Err(Error::InvalidStagingFile(_))));

        std::fs::write(&staging, b"").unwrap();
        let result = finalize(&cancel, &staging, response).await;
        assert!(matches!(result, Err(Error::InvalidStagingFile(_))));
        assert!(staging.exists());
    }

    #[tokio::test]
    async fn test_rename_promotes() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join("f.tmp");
        let destination = dir.path().join("f");
        std::fs::write(&staging, b"data").unwrap();
        std::fs::write(&destination, b"old").unwrap();

        let response = Response::new(StatusCode::OK, HeaderMap::new(), &destination);
        let response = finalize(&CancellationToken::new(), &staging, response)
            .await
            .unwrap();

        assert!(response.body().is_empty());
        assert!(!staging.exists());
        assert_eq!(std::fs::read(&destination).unwrap(), b"data");
    }

    #[tokio::test]
    async fn test_rename_failure_keeps_staging() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join("f.tmp");
        std::fs::write(&staging, b"data").unwrap();
        // A non-empty directory cannot be replaced by a file.
        let destination = dir.path().join("occupied");
        std::fs::create_dir(&destination).unwrap();
        std::fs::write(destination.join("inner"), b"x").unwrap();

        let response = Response::new(StatusCode::OK, HeaderMap::new(), &destination);
        let result = finalize(&CancellationToken::new(), &staging, response).await;

        assert!(matches!(result, Err(Error::RenameFailed { .. })));
        assert!(staging.exists());
    }
}
