/// Application name
pub const APP_NAME: &str = "Murmur";

/// Maximum attachment payload size in bytes (25 MiB)
pub const MAX_ATTACHMENT_SIZE: usize = 25 * 1024 * 1024;

/// Upload chunk size in bytes (1 MiB); one progress event is emitted per chunk
pub const UPLOAD_CHUNK_SIZE: usize = 1024 * 1024;

/// Language preference used when none has been saved
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default avatar served for accounts without a custom one
pub const DEFAULT_AVATAR_URL: &str = "https://i.pravatar.cc/300";
