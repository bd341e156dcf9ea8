//! # murmur-transport
//!
//! Object storage transports for attachment uploads.  Each upload runs as a
//! background task reporting progress over an event channel terminated by a
//! single completed or failed event; the caller holds an [`UploadSession`]
//! and drains it to observe the transfer.

pub mod fs;
pub mod http;
pub mod session;
pub mod transport;

pub use fs::FsTransport;
pub use http::HttpTransport;
pub use session::{percent, UploadEvent, UploadSession, UploadState};
pub use transport::{TransportError, UploadTransport};
