//! Chunked body copy into the staging file.

use crate::error::Result;
use crate::http::Body;

use flate2::write::GzDecoder;
use std::io::Write;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Default read size of the copy loop.
pub const DEFAULT_CHUNK_SIZE: usize = 6 * 1024;

/// Parameters of one copy.
#[derive(Debug, Clone, Copy)]
pub struct CopyOptions<'a> {
    /// Bytes already in the staging file.
    pub start: u64,
    /// Expected total, 0 when unknown. Only forwarded to progress.
    pub total: u64,
    /// The body carries `Content-Encoding: gzip`.
    pub gzip: bool,
    /// Read buffer size.
    pub chunk_size: usize,
    /// Checked after every chunk.
    pub cancel: &'a CancellationToken,
}

/// Copies `body` into `sink` and returns the downloaded byte count.
///
/// The count starts at `options.start` and grows by the number of decoded
/// bytes written. `on_progress(downloaded, total)` runs after every write.
/// Cancellation stops the loop and returns normally; it is the caller's job
/// to report it.
pub async fn copy<W, F>(
    body: Body,
    sink: &mut W,
    options: CopyOptions<'_>,
    mut on_progress: F,
) -> Result<u64>
where
    W: AsyncWrite + Unpin,
    F: FnMut(u64, u64),
{
    let mut decoder = (options.gzip && !body.is_decoded())
        .then(|| GzDecoder::new(Vec::with_capacity(options.chunk_size)));
    let mut reader = body.into_reader();
    let mut buffer = vec![0u8; options.chunk_size.max(1)];
    let mut downloaded = options.start;

    debug!("Retrieving chunks (gzip: {})...", decoder.is_some());
    loop {
        let read = reader.read(&mut buffer).await?;
        if read == 0 {
            break;
        }

        let written = match decoder.as_mut() {
            Some(decoder) => {
                // The decoder may hold back output until its next write; the
                // remainder is drained after `try_finish`.
                decoder.write_all(&buffer[..read])?;
                drain(decoder, sink).await?
            }
            None => {
                sink.write_all(&buffer[..read]).await?;
                read
            }
        };

        if written > 0 {
            downloaded += written as u64;
            on_progress(downloaded, options.total);
        }

        if options.cancel.is_cancelled() {
            debug!("Copy canceled after {} bytes", downloaded);
            return Ok(downloaded);
        }
    }

    if let Some(mut decoder) = decoder {
        decoder.try_finish()?;
        let written = drain(&mut decoder, sink).await?;
        if written > 0 {
            downloaded += written as u64;
            on_progress(downloaded, options.total);
        }
    }

    Ok(downloaded)
}

async fn drain<W>(decoder: &mut GzDecoder<Vec<u8>>, sink: &mut W) -> Result<usize>
where
    W: AsyncWrite + Unpin,
{
    let out = decoder.get_mut();
    if out.is_empty() {
        return Ok(0);
    }
    sink.write_all(out).await?;
    let written = out.len();
    out.clear();
    Ok(written)
}
