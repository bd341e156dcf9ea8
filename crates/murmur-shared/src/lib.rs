// Core domain types shared by every murmur crate.

pub mod constants;
pub mod message;
pub mod types;
pub mod validation;

pub use message::{ConversationDocument, Message};
pub use types::{AttachmentKind, AuthorIdentity, ConversationId, MessageId};
