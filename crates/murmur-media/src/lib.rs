// Device media seam: image picking, audio capture, and the local-resource
// byte fetcher feeding the upload pipeline.

pub mod fetcher;
pub mod recorder;
pub mod source;

pub use fetcher::{fetch_blob, BlobPayload, FetchError};
pub use recorder::{FixtureMediaSource, RecordingSession, RecordingState};
pub use source::{MediaError, MediaHandle, MediaSource};
