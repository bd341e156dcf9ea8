//! The conversation document store seam.
//!
//! [`MessageStore`] is the interface the attachment pipeline writes through:
//! a per-conversation document that is read and replaced wholesale, plus a
//! change feed that fires on every write — local and remote alike, the
//! writer included.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;
use tracing::debug;

use murmur_shared::{ConversationDocument, ConversationId};

use crate::database::Database;
use crate::error::{Result, StoreError};

/// Capacity of each per-conversation change feed.
const CHANGE_FEED_CAPACITY: usize = 64;

/// A per-conversation document store with change notifications.
///
/// Each call executes atomically, but the read-then-write cycle callers
/// build on top does not: a store shared by several devices resolves
/// concurrent document replacements last-write-wins.  Within one process
/// the shipped implementations serialize individual calls behind a lock, so
/// two sends in the same scheduler tick cannot lose an append.
#[allow(async_fn_in_trait)]
pub trait MessageStore {
    /// Subscribe to the conversation's change feed.  Every successful
    /// [`write_merge`](Self::write_merge) publishes the new document to all
    /// subscribers.  Dropping the receiver unsubscribes.
    fn subscribe(&self, id: ConversationId) -> Result<broadcast::Receiver<ConversationDocument>>;

    /// Current full message sequence.  A conversation that has never been
    /// written reads as an empty document.
    async fn read_full(&self, id: ConversationId) -> Result<ConversationDocument>;

    /// Replace the `messages` and `last_updated` fields of the conversation
    /// document, preserving any fields this write does not name.
    async fn write_merge(&self, id: ConversationId, document: ConversationDocument) -> Result<()>;
}

fn lock<'a, T>(mutex: &'a Mutex<T>) -> Result<MutexGuard<'a, T>> {
    mutex.lock().map_err(|_| StoreError::LockPoisoned)
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryInner {
    documents: HashMap<ConversationId, ConversationDocument>,
    feeds: HashMap<ConversationId, broadcast::Sender<ConversationDocument>>,
}

/// In-memory document store used by tests and headless runs.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn feed_entry(
    feeds: &mut HashMap<ConversationId, broadcast::Sender<ConversationDocument>>,
    id: ConversationId,
) -> broadcast::Sender<ConversationDocument> {
    feeds
        .entry(id)
        .or_insert_with(|| broadcast::channel(CHANGE_FEED_CAPACITY).0)
        .clone()
}

impl MessageStore for MemoryStore {
    fn subscribe(&self, id: ConversationId) -> Result<broadcast::Receiver<ConversationDocument>> {
        let mut inner = lock(&self.inner)?;
        Ok(feed_entry(&mut inner.feeds, id).subscribe())
    }

    async fn read_full(&self, id: ConversationId) -> Result<ConversationDocument> {
        let inner = lock(&self.inner)?;
        Ok(inner
            .documents
            .get(&id)
            .cloned()
            .unwrap_or_else(ConversationDocument::empty))
    }

    async fn write_merge(&self, id: ConversationId, document: ConversationDocument) -> Result<()> {
        let mut inner = lock(&self.inner)?;
        inner.documents.insert(id, document.clone());
        let sender = feed_entry(&mut inner.feeds, id);
        // Send fails only when nobody is subscribed.
        let _ = sender.send(document);
        debug!(conversation = %id, "document replaced");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SqliteStore
// ---------------------------------------------------------------------------

struct SqliteInner {
    db: Mutex<Database>,
    feeds: Mutex<HashMap<ConversationId, broadcast::Sender<ConversationDocument>>>,
}

/// SQLite-backed document store: one JSON document row per conversation.
///
/// Change notifications cover writes made through this handle (and its
/// clones); a row changed by another process is not observed until the next
/// read.
#[derive(Clone)]
pub struct SqliteStore {
    inner: Arc<SqliteInner>,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self {
            inner: Arc::new(SqliteInner {
                db: Mutex::new(db),
                feeds: Mutex::new(HashMap::new()),
            }),
        }
    }
}

impl MessageStore for SqliteStore {
    fn subscribe(&self, id: ConversationId) -> Result<broadcast::Receiver<ConversationDocument>> {
        let mut feeds = lock(&self.inner.feeds)?;
        Ok(feed_entry(&mut feeds, id).subscribe())
    }

    async fn read_full(&self, id: ConversationId) -> Result<ConversationDocument> {
        let db = lock(&self.inner.db)?;
        match db.read_document(id) {
            Ok(document) => Ok(document),
            Err(StoreError::NotFound) => Ok(ConversationDocument::empty()),
            Err(other) => Err(other),
        }
    }

    async fn write_merge(&self, id: ConversationId, document: ConversationDocument) -> Result<()> {
        {
            let db = lock(&self.inner.db)?;
            db.put_document(id, &document)?;
        }

        let mut feeds = lock(&self.inner.feeds)?;
        let sender = feed_entry(&mut feeds, id);
        let _ = sender.send(document);
        debug!(conversation = %id, "document replaced");
        Ok(())
    }
}
