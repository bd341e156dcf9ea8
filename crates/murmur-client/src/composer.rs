//! Message assembly and submission.

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use murmur_shared::{AttachmentKind, AuthorIdentity, ConversationId, Message, MessageId};
use murmur_store::{MessageStore, StoreError};

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Conversation store error: {0}")]
    Store(#[from] StoreError),
}

/// Builds message records and submits them to the conversation document.
#[derive(Clone)]
pub struct MessageComposer<S> {
    store: S,
    conversation_id: ConversationId,
}

impl<S: MessageStore> MessageComposer<S> {
    pub fn new(store: S, conversation_id: ConversationId) -> Self {
        Self {
            store,
            conversation_id,
        }
    }

    pub fn conversation_id(&self) -> ConversationId {
        self.conversation_id
    }

    /// Fresh media message carrying `locator` in the slot matching `kind`:
    /// new id, `created_at` now, empty text, delivery flags stamped for a
    /// send.
    pub fn compose(
        &self,
        kind: AttachmentKind,
        locator: &str,
        author: &AuthorIdentity,
    ) -> Message {
        let mut message = Message {
            id: MessageId::new(),
            created_at: Utc::now(),
            text: String::new(),
            image: String::new(),
            audio: String::new(),
            author: author.clone(),
            sent: true,
            received: false,
        };
        match kind {
            AttachmentKind::Image => message.image = locator.to_string(),
            AttachmentKind::Audio => message.audio = locator.to_string(),
        }
        message
    }

    /// Fresh text-only message (the emoji quick-send path).
    pub fn compose_text(&self, text: &str, author: &AuthorIdentity) -> Message {
        Message {
            id: MessageId::new(),
            created_at: Utc::now(),
            text: text.to_string(),
            image: String::new(),
            audio: String::new(),
            author: author.clone(),
            sent: true,
            received: false,
        }
    }

    /// Append `message` to the conversation and write the document back.
    ///
    /// Read-then-append-then-write: the cycle is not atomic, and two
    /// concurrent submissions from different devices can race last-write-
    /// wins at the store.  Within one process the shipped stores serialize
    /// the individual read and write calls, so same-tick sends both land.
    pub async fn submit(&self, message: Message) -> Result<(), ComposeError> {
        let message_id = message.id;

        let mut document = self.store.read_full(self.conversation_id).await?;
        document.append(message);
        self.store
            .write_merge(self.conversation_id, document)
            .await?;

        info!(
            message_id = %message_id,
            conversation = %self.conversation_id,
            "Message submitted"
        );
        Ok(())
    }
}
