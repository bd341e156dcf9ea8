//! The message and conversation-document models.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to the UI layer and stored as a JSON document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AuthorIdentity, MessageId};

/// A single chat message.
///
/// Messages are immutable once created; any change to a conversation
/// replaces the entire ordered sequence (see [`ConversationDocument`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub created_at: DateTime<Utc>,
    /// Body text. Empty when the message carries media.
    pub text: String,
    /// Locator of an uploaded image, or empty. At most one of `image` and
    /// `audio` is populated per message.
    #[serde(default)]
    pub image: String,
    /// Locator of an uploaded audio clip, or empty.
    #[serde(default)]
    pub audio: String,
    pub author: AuthorIdentity,
    /// Stamped by the sender at submission time and never updated afterwards.
    pub sent: bool,
    pub received: bool,
}

/// The full message sequence for one conversation.
///
/// The document is read and replaced wholesale on every write; `messages` is
/// ordered chronologically with new messages appended after existing ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationDocument {
    pub messages: Vec<Message>,
    pub last_updated: DateTime<Utc>,
}

impl ConversationDocument {
    /// A conversation that has never been written to.
    pub fn empty() -> Self {
        Self {
            messages: Vec::new(),
            last_updated: DateTime::UNIX_EPOCH,
        }
    }

    /// Append `message` after all existing ones and refresh `last_updated`.
    pub fn append(&mut self, message: Message) {
        self.last_updated = Utc::now();
        self.messages.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AuthorIdentity;

    fn author() -> AuthorIdentity {
        AuthorIdentity {
            id: "tester@example.com".into(),
            display_name: "Tester".into(),
            avatar_url: "https://i.pravatar.cc/300".into(),
        }
    }

    #[test]
    fn message_json_roundtrip() {
        let msg = Message {
            id: MessageId::new(),
            created_at: Utc::now(),
            text: String::new(),
            image: "https://store/obj123".into(),
            audio: String::new(),
            author: author(),
            sent: true,
            received: false,
        };

        let json = serde_json::to_string(&msg).unwrap();
        let restored: Message = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, msg);
        assert_eq!(restored.image, "https://store/obj123");
        assert!(restored.audio.is_empty());
    }

    #[test]
    fn missing_media_fields_default_to_empty() {
        // Older documents omit the media fields entirely.
        let json = format!(
            r#"{{"id":"{}","created_at":"2024-01-01T00:00:00Z","text":"hi",
                "author":{{"id":"a","display_name":"A","avatar_url":""}},
                "sent":true,"received":false}}"#,
            uuid::Uuid::new_v4()
        );
        let msg: Message = serde_json::from_str(&json).unwrap();
        assert!(msg.image.is_empty());
        assert!(msg.audio.is_empty());
    }

    #[test]
    fn append_orders_after_existing() {
        let mut doc = ConversationDocument::empty();
        let first = Message {
            id: MessageId::new(),
            created_at: Utc::now(),
            text: "first".into(),
            image: String::new(),
            audio: String::new(),
            author: author(),
            sent: true,
            received: false,
        };
        let mut second = first.clone();
        second.id = MessageId::new();
        second.text = "second".into();

        doc.append(first);
        doc.append(second.clone());

        assert_eq!(doc.messages.len(), 2);
        assert_eq!(doc.messages[1], second);
        assert!(doc.last_updated > DateTime::UNIX_EPOCH);
    }
}
