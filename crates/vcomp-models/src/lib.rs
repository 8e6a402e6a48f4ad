//! Shared data models for the video composer wizard.
//!
//! This crate provides Serde-serializable types for:
//! - Uploaded video descriptors and probe info
//! - Transition effects and their allowed durations
//! - Compose requests and results
//! - Backend response envelopes

pub mod api;
pub mod compose;
pub mod transition;
pub mod utils;
pub mod video;

// Re-export common types
pub use api::{
    ApiEnvelope, ComposeResponse, ErrorBody, FilesResponse, HealthResponse, StoredFile,
    TransitionDescriptor, TransitionsResponse, UploadResponse, STATUS_SUCCESS,
};
pub use compose::{output_filename, ComposeRequest, ComposeResult, DEFAULT_OUTPUT_PREFIX};
pub use transition::{
    validate_duration, TransitionError, TransitionKind, TransitionSpec, DEFAULT_DURATION,
    DURATION_OPTIONS,
};
pub use utils::{format_duration, format_file_size};
pub use video::{UploadedVideo, VideoInfo};
