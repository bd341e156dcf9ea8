use bytes::Bytes;
use thiserror::Error;

use crate::session::UploadSession;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Empty payload")]
    EmptyPayload,

    #[error("Payload too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Object storage the pipeline uploads attachment payloads to.
#[allow(async_fn_in_trait)]
pub trait UploadTransport {
    /// Start uploading `payload` under `key`.
    ///
    /// Returns immediately with a session whose event stream reports
    /// progress and the terminal outcome; the transfer itself runs as a
    /// background task.
    async fn start_upload(&self, key: &str, payload: Bytes)
        -> Result<UploadSession, TransportError>;

    /// Durable, retrievable locator for an object uploaded under `key`.
    async fn resolve_locator(&self, key: &str) -> Result<String, TransportError>;
}
