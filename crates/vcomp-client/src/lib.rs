//! HTTP client for the video composition backend.
//!
//! This crate provides:
//! - Multipart upload of local video files
//! - Compose job submission
//! - Download and preview URL construction, streamed downloads
//! - Health, transition catalog and file listing queries

pub mod client;
pub mod config;
pub mod error;
pub mod local;

pub use client::{ComposerClient, DownloadedFile};
pub use config::{ClientConfig, DEFAULT_API_URL};
pub use error::{ClientError, ClientResult};
pub use local::LocalVideoFile;
