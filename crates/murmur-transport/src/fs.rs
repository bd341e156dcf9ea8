//! Filesystem-backed upload transport.
//!
//! Objects land under a base directory and are addressed from a configured
//! public base URL.  The payload is written in fixed-size chunks with one
//! progress event per chunk, so consumers see the same event shape the HTTP
//! transport produces.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use murmur_shared::constants::UPLOAD_CHUNK_SIZE;

use crate::session::{UploadEvent, UploadSession, EVENT_CHANNEL_CAPACITY};
use crate::transport::{TransportError, UploadTransport};

#[derive(Debug, Clone)]
pub struct FsTransport {
    base_path: PathBuf,
    public_base_url: String,
    max_size: usize,
}

impl FsTransport {
    pub async fn new(
        base_path: PathBuf,
        public_base_url: impl Into<String>,
        max_size: usize,
    ) -> Result<Self, TransportError> {
        fs::create_dir_all(&base_path).await.map_err(|e| {
            TransportError::Storage(format!(
                "Failed to create object directory '{}': {}",
                base_path.display(),
                e
            ))
        })?;

        info!(path = %base_path.display(), "Filesystem transport initialized");

        Ok(Self {
            base_path,
            public_base_url: public_base_url.into(),
            max_size,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve `key` below the base directory, rejecting traversal.
    ///
    /// Keys may contain forward-slash separated segments (`audio/<id>.m4a`)
    /// but no empty segments, parent references, or absolute paths.
    fn object_path(&self, key: &str) -> Result<PathBuf, TransportError> {
        let valid = !key.is_empty()
            && !key.starts_with('/')
            && !key.contains('\\')
            && !key.contains("..")
            && key.split('/').all(|segment| !segment.is_empty());

        if !valid {
            return Err(TransportError::InvalidKey(key.to_string()));
        }
        Ok(self.base_path.join(key))
    }
}

impl UploadTransport for FsTransport {
    async fn start_upload(
        &self,
        key: &str,
        payload: Bytes,
    ) -> Result<UploadSession, TransportError> {
        if payload.is_empty() {
            return Err(TransportError::EmptyPayload);
        }
        if payload.len() > self.max_size {
            return Err(TransportError::TooLarge {
                size: payload.len(),
                max: self.max_size,
            });
        }

        let path = self.object_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let total = payload.len() as u64;
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let key_owned = key.to_string();

        tokio::spawn(async move {
            match write_chunked(&path, &payload, total, &tx).await {
                Ok(()) => {
                    debug!(key = %key_owned, size = total, "Upload complete");
                    let _ = tx.send(UploadEvent::Completed).await;
                }
                Err(e) => {
                    warn!(key = %key_owned, error = %e, "Upload failed");
                    let _ = tx
                        .send(UploadEvent::Failed {
                            reason: e.to_string(),
                        })
                        .await;
                }
            }
        });

        Ok(UploadSession::new(key.to_string(), total, rx))
    }

    async fn resolve_locator(&self, key: &str) -> Result<String, TransportError> {
        let path = self.object_path(key)?;
        if !path.exists() {
            return Err(TransportError::NotFound(key.to_string()));
        }
        Ok(format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            key
        ))
    }
}

async fn write_chunked(
    path: &Path,
    payload: &Bytes,
    total: u64,
    tx: &mpsc::Sender<UploadEvent>,
) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    let mut written: u64 = 0;

    let _ = tx
        .send(UploadEvent::Progress {
            bytes_transferred: 0,
            total_bytes: total,
        })
        .await;

    for chunk in payload.chunks(UPLOAD_CHUNK_SIZE) {
        file.write_all(chunk).await?;
        written += chunk.len() as u64;
        let _ = tx
            .send(UploadEvent::Progress {
                bytes_transferred: written,
                total_bytes: total,
            })
            .await;
    }

    file.flush().await?;
    Ok(())
}
