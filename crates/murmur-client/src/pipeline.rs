//! The attachment pipeline: capture → fetch → upload → compose.
//!
//! One pipeline instance backs one chat screen.  Each user action runs the
//! stages strictly in sequence and suspends at every I/O boundary; a message
//! is appended only after the transport confirms the uploaded object is
//! durable, so the conversation never references media that does not exist.

use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use murmur_media::{
    fetch_blob, FetchError, MediaError, MediaHandle, MediaSource, RecordingSession,
};
use murmur_shared::{AttachmentKind, AuthorIdentity, ConversationId};
use murmur_store::MessageStore;
use murmur_transport::{percent, TransportError, UploadEvent, UploadTransport};

use crate::composer::{ComposeError, MessageComposer};
use crate::config::ClientConfig;
use crate::events::{UiEvent, UiEvents};
use crate::state::ChatState;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Compose error: {0}")]
    Compose(#[from] ComposeError),

    /// The transport reported a terminal failure mid-transfer.
    #[error("Upload failed: {0}")]
    Upload(String),
}

/// Orchestrates one attachment send from user action to delivered message.
pub struct AttachmentPipeline<S, T, M> {
    composer: MessageComposer<S>,
    transport: T,
    media: M,
    author: AuthorIdentity,
    state: Arc<Mutex<ChatState>>,
    events: UiEvents,
    recording: Option<RecordingSession>,
    max_attachment_size: usize,
}

impl<S, T, M> AttachmentPipeline<S, T, M>
where
    S: MessageStore,
    T: UploadTransport,
    M: MediaSource,
{
    pub fn new(
        store: S,
        transport: T,
        media: M,
        conversation_id: ConversationId,
        author: AuthorIdentity,
        config: &ClientConfig,
    ) -> Self {
        Self {
            composer: MessageComposer::new(store, conversation_id),
            transport,
            media,
            author,
            state: Arc::new(Mutex::new(ChatState::default())),
            events: UiEvents::new(),
            recording: None,
            max_attachment_size: config.max_attachment_size,
        }
    }

    /// Snapshot of the screen flags.
    pub fn state(&self) -> ChatState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribe to UI events (progress, failures, appended messages).
    pub fn subscribe_events(&self) -> broadcast::Receiver<UiEvent> {
        self.events.subscribe()
    }

    /// Flip the attachment menu and return its new visibility.
    pub fn toggle_attach_menu(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.show_attach_menu = !state.show_attach_menu;
        state.show_attach_menu
    }

    /// Let the user pick an image and send it.  Cancelling the picker is a
    /// no-op.
    pub async fn pick_image(&mut self) -> Result<(), PipelineError> {
        self.set_flag(|s, v| s.show_attach_menu = v, false);

        match self.media.pick_image().await {
            Ok(Some(handle)) => self.upload(handle, AttachmentKind::Image).await,
            Ok(None) => {
                debug!("Image pick cancelled");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Image pick failed");
                Err(e.into())
            }
        }
    }

    /// Ask for microphone access and begin a recording session.
    ///
    /// A denied permission is surfaced as a logged no-op so the screen stays
    /// usable without audio; a second start while recording is also a no-op.
    pub async fn start_recording(&mut self) -> Result<(), PipelineError> {
        if self.recording.as_ref().is_some_and(RecordingSession::is_active) {
            debug!("Recording already in progress");
            return Ok(());
        }

        match self.media.request_audio_permission().await {
            Ok(true) => {}
            Ok(false) => {
                warn!("Microphone permission denied");
                return Ok(());
            }
            Err(e) => {
                warn!(error = %e, "Permission request failed");
                return Err(e.into());
            }
        }

        self.media.start_recording().await.map_err(|e| {
            warn!(error = %e, "Failed to start recording");
            PipelineError::Media(e)
        })?;

        self.recording = Some(RecordingSession::begin());
        self.set_flag(|s, v| s.is_recording = v, true);
        self.events.emit(UiEvent::RecordingStarted);
        info!("Recording started");
        Ok(())
    }

    /// End the active recording and send the captured clip.
    ///
    /// Calling this with no active session is a no-op: no upload attempt, no
    /// state change.
    pub async fn stop_recording(&mut self) -> Result<(), PipelineError> {
        let Some(mut session) = self.recording.take() else {
            debug!("No active recording to stop");
            return Ok(());
        };
        session.finish();
        self.set_flag(|s, v| s.is_recording = v, false);
        self.events.emit(UiEvent::RecordingStopped);

        let handle = self.media.stop_recording().await.map_err(|e| {
            warn!(error = %e, "Failed to stop recording");
            PipelineError::Media(e)
        })?;

        match handle {
            Some(handle) => {
                info!(uri = %handle, "Recording stopped");
                self.upload(handle, AttachmentKind::Audio).await
            }
            None => Ok(()),
        }
    }

    /// Run the fetch → upload → compose sequence for one attachment.
    ///
    /// Stages are strictly sequential.  There is no cancellation once the
    /// transfer has started and no automatic retry on failure; a failed
    /// stage resets the `uploading` flag, emits [`UiEvent::UploadFailed`],
    /// and leaves the conversation untouched.
    pub async fn upload(
        &mut self,
        handle: MediaHandle,
        kind: AttachmentKind,
    ) -> Result<(), PipelineError> {
        self.set_flag(|s, v| s.uploading = v, true);
        let result = self.upload_inner(&handle, kind).await;
        self.set_flag(|s, v| s.uploading = v, false);

        if let Err(ref e) = result {
            warn!(kind = kind.as_str(), error = %e, "Attachment send failed");
            self.events.emit(UiEvent::UploadFailed {
                kind,
                reason: e.to_string(),
            });
        }
        result
    }

    async fn upload_inner(
        &mut self,
        handle: &MediaHandle,
        kind: AttachmentKind,
    ) -> Result<(), PipelineError> {
        let payload = fetch_blob(handle, self.max_attachment_size).await?;

        let key = kind.storage_key(Uuid::new_v4());
        debug!(
            key = %key,
            size = payload.bytes.len(),
            hash = %payload.content_hash,
            "Starting attachment upload"
        );

        let mut session = self.transport.start_upload(&key, payload.bytes).await?;
        loop {
            match session.next_event().await {
                Some(UploadEvent::Progress {
                    bytes_transferred,
                    total_bytes,
                }) => {
                    let percent = percent(bytes_transferred, total_bytes);
                    debug!(key = %key, percent, "Upload progress");
                    self.events.emit(UiEvent::UploadProgress { kind, percent });
                }
                Some(UploadEvent::Failed { reason }) => {
                    return Err(PipelineError::Upload(reason));
                }
                Some(UploadEvent::Completed) => break,
                // Channel closed without a terminal event.
                None => {
                    return Err(PipelineError::Upload(
                        "Upload ended without completing".into(),
                    ));
                }
            }
        }

        let locator = self.transport.resolve_locator(&key).await?;
        let message = self.composer.compose(kind, &locator, &self.author);
        let message_id = message.id;
        self.composer.submit(message).await?;

        self.events.emit(UiEvent::MessageAppended { message_id });
        info!(kind = kind.as_str(), key = %key, "Attachment sent");
        Ok(())
    }

    /// Send a text-only message (emoji quick-send).  Same submission path as
    /// attachments, with no media locator.
    pub async fn send_emoji(&mut self, emoji: &str) -> Result<(), PipelineError> {
        let message = self.composer.compose_text(emoji, &self.author);
        let message_id = message.id;

        self.composer.submit(message).await.map_err(|e| {
            warn!(error = %e, "Emoji send failed");
            PipelineError::Compose(e)
        })?;

        self.events.emit(UiEvent::MessageAppended { message_id });
        Ok(())
    }

    fn set_flag(&self, apply: impl FnOnce(&mut ChatState, bool), value: bool) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        apply(&mut state, value);
    }
}
