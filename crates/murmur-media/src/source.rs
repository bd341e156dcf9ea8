use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Microphone permission denied")]
    PermissionDenied,

    #[error("A capture is already running")]
    CaptureInProgress,

    #[error("Media device error: {0}")]
    Device(String),
}

/// Handle to a locally captured or picked media resource.
///
/// Wraps the `file://` URI the device layer hands back; plain filesystem
/// paths are accepted too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaHandle(String);

impl MediaHandle {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn from_path(path: &Path) -> Self {
        Self(format!("file://{}", path.display()))
    }

    pub fn as_uri(&self) -> &str {
        &self.0
    }

    /// Filesystem path of the resource, with any `file://` scheme stripped.
    pub fn to_path(&self) -> PathBuf {
        PathBuf::from(self.0.strip_prefix("file://").unwrap_or(&self.0))
    }
}

impl std::fmt::Display for MediaHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Image picking and audio capture, as exposed by the device layer.
///
/// Implementations wrap the platform picker/recorder; the pipeline only sees
/// local resource handles coming out.
#[allow(async_fn_in_trait)]
pub trait MediaSource {
    /// Open the image picker.  `None` means the user cancelled.
    async fn pick_image(&mut self) -> Result<Option<MediaHandle>, MediaError>;

    /// Ask the user for microphone access.
    async fn request_audio_permission(&mut self) -> Result<bool, MediaError>;

    /// Begin capturing audio.  Fails with [`MediaError::CaptureInProgress`]
    /// if a capture is already running.
    async fn start_recording(&mut self) -> Result<(), MediaError>;

    /// End the active capture and return the recorded clip, or `None` when
    /// nothing was being recorded.
    async fn stop_recording(&mut self) -> Result<Option<MediaHandle>, MediaError>;
}
