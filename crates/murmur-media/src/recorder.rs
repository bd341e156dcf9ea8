//! Recording session tracking and the file-backed media source used by
//! tests and headless runs.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::source::{MediaError, MediaHandle, MediaSource};

/// Lifecycle of one audio capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    Idle,
    Recording,
    Stopped,
}

/// Tracks one audio capture from start to stop.
///
/// At most one session is active at a time; the owner enforces this by
/// holding an `Option<RecordingSession>` and refusing a second start while
/// one is live.
#[derive(Debug, Clone)]
pub struct RecordingSession {
    started_at: DateTime<Utc>,
    state: RecordingState,
}

impl RecordingSession {
    /// Begin a session, stamping the start time.
    pub fn begin() -> Self {
        Self {
            started_at: Utc::now(),
            state: RecordingState::Recording,
        }
    }

    /// Mark the session stopped.  Idempotent.
    pub fn finish(&mut self) {
        self.state = RecordingState::Stopped;
    }

    pub fn is_active(&self) -> bool {
        self.state == RecordingState::Recording
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }
}

/// A [`MediaSource`] backed by plain files.
///
/// "Picking" returns a preloaded file and "recording" hands back a preloaded
/// clip when the capture stops, which lets the full pipeline run without any
/// device layer.
#[derive(Debug, Default)]
pub struct FixtureMediaSource {
    pick_result: Option<PathBuf>,
    clip: Option<PathBuf>,
    permission_granted: bool,
    capturing: bool,
}

impl FixtureMediaSource {
    /// A source that grants permission and yields nothing until loaded.
    pub fn new() -> Self {
        Self {
            permission_granted: true,
            ..Self::default()
        }
    }

    /// File returned by the next [`MediaSource::pick_image`] call.
    pub fn with_picked_file(mut self, path: PathBuf) -> Self {
        self.pick_result = Some(path);
        self
    }

    /// Clip returned when a capture is stopped.
    pub fn with_clip(mut self, path: PathBuf) -> Self {
        self.clip = Some(path);
        self
    }

    /// Make permission requests come back denied.
    pub fn deny_permission(mut self) -> Self {
        self.permission_granted = false;
        self
    }
}

impl MediaSource for FixtureMediaSource {
    async fn pick_image(&mut self) -> Result<Option<MediaHandle>, MediaError> {
        let picked = self
            .pick_result
            .as_ref()
            .map(|path| MediaHandle::from_path(path));
        debug!(cancelled = picked.is_none(), "image pick finished");
        Ok(picked)
    }

    async fn request_audio_permission(&mut self) -> Result<bool, MediaError> {
        Ok(self.permission_granted)
    }

    async fn start_recording(&mut self) -> Result<(), MediaError> {
        if self.capturing {
            return Err(MediaError::CaptureInProgress);
        }
        self.capturing = true;
        debug!("capture started");
        Ok(())
    }

    async fn stop_recording(&mut self) -> Result<Option<MediaHandle>, MediaError> {
        if !self.capturing {
            return Ok(None);
        }
        self.capturing = false;
        debug!("capture stopped");
        Ok(self.clip.as_ref().map(|path| MediaHandle::from_path(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_transitions() {
        let mut session = RecordingSession::begin();
        assert!(session.is_active());
        assert_eq!(session.state(), RecordingState::Recording);

        session.finish();
        assert!(!session.is_active());
        assert_eq!(session.state(), RecordingState::Stopped);

        // finish is idempotent
        session.finish();
        assert_eq!(session.state(), RecordingState::Stopped);
    }

    #[tokio::test]
    async fn stop_without_start_yields_nothing() {
        let mut source = FixtureMediaSource::new().with_clip(PathBuf::from("/tmp/clip.m4a"));
        assert_eq!(source.stop_recording().await.unwrap(), None);
    }

    #[tokio::test]
    async fn second_start_is_rejected() {
        let mut source = FixtureMediaSource::new();
        source.start_recording().await.unwrap();
        assert!(matches!(
            source.start_recording().await,
            Err(MediaError::CaptureInProgress)
        ));
    }

    #[tokio::test]
    async fn record_cycle_returns_clip() {
        let mut source = FixtureMediaSource::new().with_clip(PathBuf::from("/tmp/clip.m4a"));
        source.start_recording().await.unwrap();
        let handle = source.stop_recording().await.unwrap().unwrap();
        assert_eq!(handle.to_path(), PathBuf::from("/tmp/clip.m4a"));
    }

    #[tokio::test]
    async fn cancelled_pick_returns_none() {
        let mut source = FixtureMediaSource::new();
        assert_eq!(source.pick_image().await.unwrap(), None);
    }
}
