//! Client configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the client can start with zero
//! configuration for local development.

use std::path::PathBuf;

use murmur_shared::constants::MAX_ATTACHMENT_SIZE;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Directory where the filesystem transport stores uploaded objects.
    /// Env: `BLOB_STORAGE_PATH`
    /// Default: `./blobs`
    pub blob_storage_path: PathBuf,

    /// Base URL prefixed to object keys when resolving locators.
    /// Env: `PUBLIC_BASE_URL`
    /// Default: `http://localhost:8080/objects`
    pub public_base_url: String,

    /// Maximum accepted attachment payload in bytes.
    /// Env: `MAX_ATTACHMENT_SIZE`
    /// Default: 25 MiB
    pub max_attachment_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            blob_storage_path: PathBuf::from("./blobs"),
            public_base_url: "http://localhost:8080/objects".to_string(),
            max_attachment_size: MAX_ATTACHMENT_SIZE,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("BLOB_STORAGE_PATH") {
            config.blob_storage_path = PathBuf::from(path);
        }

        if let Ok(url) = std::env::var("PUBLIC_BASE_URL") {
            config.public_base_url = url;
        }

        if let Ok(val) = std::env::var("MAX_ATTACHMENT_SIZE") {
            if let Ok(n) = val.parse::<usize>() {
                config.max_attachment_size = n;
            } else {
                tracing::warn!(
                    value = %val,
                    "Invalid MAX_ATTACHMENT_SIZE, using default"
                );
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}
