//! # murmur-store
//!
//! Local storage for the murmur chat client, backed by SQLite.
//!
//! The crate exposes two layers: a synchronous [`Database`] handle wrapping a
//! `rusqlite::Connection` with typed helpers for every persisted record, and
//! the async [`MessageStore`] seam the attachment pipeline writes through —
//! a per-conversation document that is read and replaced wholesale, with a
//! change feed that fires on every write.

pub mod conversations;
pub mod database;
pub mod migrations;
pub mod preferences;
pub mod store;
pub mod users;

mod error;

pub use database::Database;
pub use error::StoreError;
pub use store::{MemoryStore, MessageStore, SqliteStore};
pub use users::UserProfile;
