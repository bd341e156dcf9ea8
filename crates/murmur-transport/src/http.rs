//! HTTP upload transport.
//!
//! Uploads run as a `PUT {base}/{key}` with the payload fed to the request
//! body chunk by chunk; each chunk pulled by the client maps to one progress
//! event, so a slow link reports progress at the pace bytes actually leave.

use bytes::Bytes;
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use murmur_shared::constants::UPLOAD_CHUNK_SIZE;

use crate::session::{UploadEvent, UploadSession, EVENT_CHANNEL_CAPACITY};
use crate::transport::{TransportError, UploadTransport};

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Use a preconfigured client (timeouts, proxies, TLS settings).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

impl UploadTransport for HttpTransport {
    async fn start_upload(
        &self,
        key: &str,
        payload: Bytes,
    ) -> Result<UploadSession, TransportError> {
        if payload.is_empty() {
            return Err(TransportError::EmptyPayload);
        }

        let total = payload.len() as u64;
        let url = self.object_url(key);
        let client = self.client.clone();
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let key_owned = key.to_string();

        tokio::spawn(async move {
            let _ = tx
                .send(UploadEvent::Progress {
                    bytes_transferred: 0,
                    total_bytes: total,
                })
                .await;

            // Chunks are materialized up front; the stream closure counts
            // them out as reqwest pulls the body.
            let chunks: Vec<Result<Bytes, std::io::Error>> = payload
                .chunks(UPLOAD_CHUNK_SIZE)
                .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
                .collect();

            let progress_tx = tx.clone();
            let mut sent: u64 = 0;
            let stream = futures::stream::iter(chunks).map(move |item| {
                if let Ok(ref chunk) = item {
                    sent += chunk.len() as u64;
                    // A full channel just drops this progress tick.
                    let _ = progress_tx.try_send(UploadEvent::Progress {
                        bytes_transferred: sent,
                        total_bytes: total,
                    });
                }
                item
            });

            let result = client
                .put(&url)
                .body(reqwest::Body::wrap_stream(stream))
                .send()
                .await;

            match result {
                Ok(response) if response.status().is_success() => {
                    debug!(key = %key_owned, size = total, "Upload complete");
                    let _ = tx.send(UploadEvent::Completed).await;
                }
                Ok(response) => {
                    warn!(key = %key_owned, status = %response.status(), "Upload rejected");
                    let _ = tx
                        .send(UploadEvent::Failed {
                            reason: format!("Server responded {}", response.status()),
                        })
                        .await;
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
        Ok(self.object_url(key))
    }
}
