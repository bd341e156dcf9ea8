//! End-to-end attachment pipeline tests: fixture media source, filesystem
//! transport, and both document stores.

use std::path::PathBuf;

use tempfile::TempDir;

use murmur_client::{AttachmentPipeline, ClientConfig, PipelineError, UiEvent};
use murmur_media::{FixtureMediaSource, MediaHandle};
use murmur_shared::{AttachmentKind, AuthorIdentity, ConversationId};
use murmur_store::{Database, MemoryStore, MessageStore, SqliteStore};
use murmur_transport::FsTransport;

fn author() -> AuthorIdentity {
    AuthorIdentity {
        id: "tester@example.com".into(),
        display_name: "Tester".into(),
        avatar_url: "https://i.pravatar.cc/300".into(),
    }
}

fn config() -> ClientConfig {
    ClientConfig::default()
}

async fn fs_transport(dir: &TempDir) -> FsTransport {
    FsTransport::new(
        dir.path().join("objects"),
        "https://store",
        ClientConfig::default().max_attachment_size,
    )
    .await
    .unwrap()
}

fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn drain_events(
    rx: &mut tokio::sync::broadcast::Receiver<UiEvent>,
) -> Vec<UiEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn picked_image_becomes_exactly_one_message() {
    let dir = TempDir::new().unwrap();
    let photo = write_file(&dir, "photo.jpg", b"jpeg-ish bytes");

    let store = MemoryStore::new();
    let conversation = ConversationId::new();
    let media = FixtureMediaSource::new().with_picked_file(photo);
    let mut pipeline = AttachmentPipeline::new(
        store.clone(),
        fs_transport(&dir).await,
        media,
        conversation,
        author(),
        &config(),
    );

    pipeline.pick_image().await.unwrap();

    let doc = store.read_full(conversation).await.unwrap();
    assert_eq!(doc.messages.len(), 1);

    let message = &doc.messages[0];
    assert!(message.image.starts_with("https://store/"));
    assert!(message.audio.is_empty());
    assert!(message.text.is_empty());
    assert!(message.sent);
    assert!(!message.received);
    assert_eq!(message.author, author());

    assert!(!pipeline.state().uploading);
}

#[tokio::test]
async fn cancelled_pick_sends_nothing() {
    let dir = TempDir::new().unwrap();
    let store = MemoryStore::new();
    let conversation = ConversationId::new();
    let mut pipeline = AttachmentPipeline::new(
        store.clone(),
        fs_transport(&dir).await,
        FixtureMediaSource::new(),
        conversation,
        author(),
        &config(),
    );

    pipeline.pick_image().await.unwrap();

    let doc = store.read_full(conversation).await.unwrap();
    assert!(doc.messages.is_empty());
}

#[tokio::test]
async fn two_megabyte_image_reports_progress_and_locator() {
    let dir = TempDir::new().unwrap();
    let photo = write_file(&dir, "big.jpg", &vec![42u8; 2 * 1024 * 1024]);

    let store = MemoryStore::new();
    let conversation = ConversationId::new();
    let media = FixtureMediaSource::new().with_picked_file(photo);
    let mut pipeline = AttachmentPipeline::new(
        store.clone(),
        fs_transport(&dir).await,
        media,
        conversation,
        author(),
        &config(),
    );
    let mut events = pipeline.subscribe_events();

    pipeline.pick_image().await.unwrap();

    let seen = drain_events(&mut events);
    let percents: Vec<u8> = seen
        .iter()
        .filter_map(|e| match e {
            UiEvent::UploadProgress { percent, .. } => Some(*percent),
            _ => None,
        })
        .collect();

    // 2 MiB in 1 MiB chunks: 0%, 50%, 100%.
    assert_eq!(percents, vec![0, 50, 100]);
    assert!(percents.windows(2).all(|w| w[0] <= w[1]));
    assert!(seen
        .iter()
        .any(|e| matches!(e, UiEvent::MessageAppended { .. })));

    let doc = store.read_full(conversation).await.unwrap();
    assert_eq!(doc.messages.len(), 1);
    assert!(doc.messages[0].image.starts_with("https://store/"));
    assert_eq!(doc.messages[0].text, "");
}

#[tokio::test]
async fn unreadable_resource_leaves_store_unchanged() {
    let dir = TempDir::new().unwrap();
    let store = MemoryStore::new();
    let conversation = ConversationId::new();
    let mut pipeline = AttachmentPipeline::new(
        store.clone(),
        fs_transport(&dir).await,
        FixtureMediaSource::new(),
        conversation,
        author(),
        &config(),
    );
    let mut events = pipeline.subscribe_events();

    let missing = MediaHandle::new("file:///definitely/not/here.jpg");
    let result = pipeline.upload(missing, AttachmentKind::Image).await;
    assert!(matches!(result, Err(PipelineError::Fetch(_))));

    let doc = store.read_full(conversation).await.unwrap();
    assert!(doc.messages.is_empty());
    assert!(!pipeline.state().uploading);

    let seen = drain_events(&mut events);
    assert!(seen
        .iter()
        .any(|e| matches!(e, UiEvent::UploadFailed { .. })));
}

#[tokio::test]
async fn transport_rejection_leaves_store_unchanged() {
    let dir = TempDir::new().unwrap();
    let photo = write_file(&dir, "photo.jpg", b"sixteen bytes!!!");

    // Transport cap below the payload size forces a transport failure.
    let transport = FsTransport::new(dir.path().join("objects"), "https://store", 8)
        .await
        .unwrap();

    let store = MemoryStore::new();
    let conversation = ConversationId::new();
    let media = FixtureMediaSource::new().with_picked_file(photo);
    let mut pipeline = AttachmentPipeline::new(
        store.clone(),
        transport,
        media,
        conversation,
        author(),
        &config(),
    );

    let result = pipeline.pick_image().await;
    assert!(matches!(result, Err(PipelineError::Transport(_))));

    let doc = store.read_full(conversation).await.unwrap();
    assert!(doc.messages.is_empty());
    assert!(!pipeline.state().uploading);
}

#[tokio::test]
async fn stop_without_recording_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let store = MemoryStore::new();
    let conversation = ConversationId::new();
    let mut pipeline = AttachmentPipeline::new(
        store.clone(),
        fs_transport(&dir).await,
        FixtureMediaSource::new(),
        conversation,
        author(),
        &config(),
    );

    pipeline.stop_recording().await.unwrap();

    let doc = store.read_full(conversation).await.unwrap();
    assert!(doc.messages.is_empty());
    assert_eq!(pipeline.state(), Default::default());
}

#[tokio::test]
async fn denied_permission_never_starts_recording() {
    let dir = TempDir::new().unwrap();
    let store = MemoryStore::new();
    let mut pipeline = AttachmentPipeline::new(
        store.clone(),
        fs_transport(&dir).await,
        FixtureMediaSource::new().deny_permission(),
        ConversationId::new(),
        author(),
        &config(),
    );

    pipeline.start_recording().await.unwrap();
    assert!(!pipeline.state().is_recording);

    // And the matching stop stays a no-op.
    pipeline.stop_recording().await.unwrap();
}

#[tokio::test]
async fn recorded_clip_becomes_audio_message() {
    let dir = TempDir::new().unwrap();
    let clip = write_file(&dir, "clip.m4a", b"aac frames");

    let store = MemoryStore::new();
    let conversation = ConversationId::new();
    let media = FixtureMediaSource::new().with_clip(clip);
    let mut pipeline = AttachmentPipeline::new(
        store.clone(),
        fs_transport(&dir).await,
        media,
        conversation,
        author(),
        &config(),
    );

    pipeline.start_recording().await.unwrap();
    assert!(pipeline.state().is_recording);

    pipeline.stop_recording().await.unwrap();
    assert!(!pipeline.state().is_recording);

    let doc = store.read_full(conversation).await.unwrap();
    assert_eq!(doc.messages.len(), 1);

    let message = &doc.messages[0];
    assert!(message.audio.contains("/audio/"));
    assert!(message.audio.ends_with(".m4a"));
    assert!(message.image.is_empty());
    assert!(message.text.is_empty());
}

#[tokio::test]
async fn emoji_send_uses_the_same_submission_path() {
    let dir = TempDir::new().unwrap();
    let store = MemoryStore::new();
    let conversation = ConversationId::new();
    let mut pipeline = AttachmentPipeline::new(
        store.clone(),
        fs_transport(&dir).await,
        FixtureMediaSource::new(),
        conversation,
        author(),
        &config(),
    );

    pipeline.send_emoji("🎉").await.unwrap();

    let doc = store.read_full(conversation).await.unwrap();
    assert_eq!(doc.messages.len(), 1);
    assert_eq!(doc.messages[0].text, "🎉");
    assert!(doc.messages[0].image.is_empty());
    assert!(doc.messages[0].audio.is_empty());
}

#[tokio::test]
async fn subscribers_see_the_appended_message() {
    let dir = TempDir::new().unwrap();
    let photo = write_file(&dir, "photo.jpg", b"bytes");

    let store = MemoryStore::new();
    let conversation = ConversationId::new();
    let mut feed = store.subscribe(conversation).unwrap();

    let media = FixtureMediaSource::new().with_picked_file(photo);
    let mut pipeline = AttachmentPipeline::new(
        store.clone(),
        fs_transport(&dir).await,
        media,
        conversation,
        author(),
        &config(),
    );

    pipeline.pick_image().await.unwrap();

    let pushed = feed.recv().await.unwrap();
    assert_eq!(pushed.messages.len(), 1);
    assert!(pushed.messages[0].image.starts_with("https://store/"));
}

#[tokio::test]
async fn sqlite_store_persists_the_sent_attachment() {
    let dir = TempDir::new().unwrap();
    let photo = write_file(&dir, "photo.jpg", b"bytes on disk");
    let db_path = dir.path().join("murmur.db");

    let conversation = ConversationId::new();
    {
        let store = SqliteStore::new(Database::open_at(&db_path).unwrap());
        let media = FixtureMediaSource::new().with_picked_file(photo);
        let mut pipeline = AttachmentPipeline::new(
            store,
            fs_transport(&dir).await,
            media,
            conversation,
            author(),
            &config(),
        );
        pipeline.pick_image().await.unwrap();
    }

    // Reopen the database; the appended message must survive.
    let reopened = SqliteStore::new(Database::open_at(&db_path).unwrap());
    let doc = reopened.read_full(conversation).await.unwrap();
    assert_eq!(doc.messages.len(), 1);
    assert!(doc.messages[0].image.starts_with("https://store/"));
}

#[tokio::test]
async fn attach_menu_toggles_and_closes_on_pick() {
    let dir = TempDir::new().unwrap();
    let photo = write_file(&dir, "photo.jpg", b"bytes");

    let store = MemoryStore::new();
    let media = FixtureMediaSource::new().with_picked_file(photo);
    let mut pipeline = AttachmentPipeline::new(
        store,
        fs_transport(&dir).await,
        media,
        ConversationId::new(),
        author(),
        &config(),
    );

    assert!(pipeline.toggle_attach_menu());
    assert!(pipeline.state().show_attach_menu);

    pipeline.pick_image().await.unwrap();
    assert!(!pipeline.state().show_attach_menu);
}
