//! # murmur-client
//!
//! Chat-screen glue: the attachment pipeline, message composer, sign-up
//! flow, and the UI-facing state and event surface.

pub mod accounts;
pub mod composer;
pub mod config;
pub mod events;
pub mod pipeline;
pub mod state;

pub use composer::{ComposeError, MessageComposer};
pub use config::ClientConfig;
pub use events::{UiEvent, UiEvents};
pub use pipeline::{AttachmentPipeline, PipelineError};
pub use state::ChatState;

use tracing_subscriber::{fmt, EnvFilter};

/// Initialise structured logging for binaries and examples embedding the
/// murmur crates.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("murmur_client=debug,murmur_transport=debug,murmur_store=info,murmur_media=info,warn")
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
