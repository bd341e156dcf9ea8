use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a conversation document. Exactly one document exists per id.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ConversationId(pub Uuid);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Client-generated message identifier, assigned before the send.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MessageId(pub Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which media slot an uploaded attachment occupies on a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Audio,
}

impl AttachmentKind {
    /// Object key for a fresh upload of this kind.
    ///
    /// Audio clips keep the `audio/` prefix and `.m4a` suffix the mobile
    /// recorder produces; images are stored under the bare id.
    pub fn storage_key(&self, id: Uuid) -> String {
        match self {
            Self::Image => id.to_string(),
            Self::Audio => format!("audio/{id}.m4a"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
        }
    }
}

/// Identity stamped on every composed message.
///
/// Always passed explicitly into the composer; there is no ambient
/// current-user global.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorIdentity {
    /// Opaque account identifier (the mobile client uses the email).
    pub id: String,
    pub display_name: String,
    pub avatar_url: String,
}
