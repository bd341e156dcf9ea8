//! Local resource handle → in-memory upload payload.

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

use crate::source::MediaHandle;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to read local resource '{uri}': {source}")]
    Unreadable {
        uri: String,
        source: std::io::Error,
    },

    #[error("Attachment too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },
}

/// An in-memory payload ready for upload.
#[derive(Debug, Clone)]
pub struct BlobPayload {
    pub bytes: Bytes,
    /// BLAKE3 content hash, hex-encoded.
    pub content_hash: String,
}

/// Read the resource behind `handle` into memory.
///
/// Fails when the resource is unreadable or exceeds `max_size`.
pub async fn fetch_blob(handle: &MediaHandle, max_size: usize) -> Result<BlobPayload, FetchError> {
    let path = handle.to_path();
    let data = tokio::fs::read(&path)
        .await
        .map_err(|e| FetchError::Unreadable {
            uri: handle.as_uri().to_string(),
            source: e,
        })?;

    if data.len() > max_size {
        return Err(FetchError::TooLarge {
            size: data.len(),
            max: max_size,
        });
    }

    let content_hash = hex::encode(blake3::hash(&data).as_bytes());

    debug!(
        uri = %handle,
        size = data.len(),
        hash = %content_hash,
        "fetched attachment payload"
    );

    Ok(BlobPayload {
        bytes: Bytes::from(data),
        content_hash,
    })
}
