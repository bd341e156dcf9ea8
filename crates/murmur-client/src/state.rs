//! Per-screen UI state.
//!
//! The [`ChatState`] struct is wrapped in `Arc<Mutex<>>` by the pipeline so
//! that UI callbacks and in-flight uploads observe the same flags.

/// Transient state owned by one chat screen instance.
///
/// None of these flags are shared across screens; each pipeline carries its
/// own copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChatState {
    /// An attachment upload is in flight.
    pub uploading: bool,

    /// An audio capture is running.
    pub is_recording: bool,

    /// The attachment menu is open.
    pub show_attach_menu: bool,
}
