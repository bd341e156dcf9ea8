use serde::Serialize;
use tokio::sync::broadcast;

use murmur_shared::{AttachmentKind, MessageId};

/// Capacity of the UI event channel.
const UI_EVENT_CAPACITY: usize = 64;

/// Events surfaced to the UI layer.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UiEvent {
    UploadProgress {
        kind: AttachmentKind,
        percent: u8,
    },
    /// An upload or submission failed; no message was appended.
    UploadFailed {
        kind: AttachmentKind,
        reason: String,
    },
    MessageAppended {
        message_id: MessageId,
    },
    RecordingStarted,
    RecordingStopped,
}

/// Fan-out handle the UI subscribes to.
#[derive(Debug, Clone)]
pub struct UiEvents {
    tx: broadcast::Sender<UiEvent>,
}

impl UiEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(UI_EVENT_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.tx.subscribe()
    }

    pub(crate) fn emit(&self, event: UiEvent) {
        // A send only fails when no UI is listening.
        let _ = self.tx.send(event);
    }
}

impl Default for UiEvents {
    fn default() -> Self {
        Self::new()
    }
}
