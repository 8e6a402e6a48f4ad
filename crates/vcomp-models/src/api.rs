//! Response envelopes returned by the composition backend.
//!
//! Every JSON endpoint except health answers with a `status` field that is
//! `"success"` on the happy path and an `error` string otherwise.

use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::compose::ComposeResult;
use crate::video::UploadedVideo;

/// Value of `status` on successful responses.
pub const STATUS_SUCCESS: &str = "success";

/// Common accessors over backend envelopes.
pub trait ApiEnvelope {
    fn status(&self) -> Option<&str>;

    fn error(&self) -> Option<&str>;

    fn is_success(&self) -> bool {
        self.status() == Some(STATUS_SUCCESS)
    }
}

macro_rules! impl_envelope {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ApiEnvelope for $ty {
                fn status(&self) -> Option<&str> {
                    self.status.as_deref()
                }

                fn error(&self) -> Option<&str> {
                    self.error.as_deref()
                }
            }
        )+
    };
}

/// Body of any error response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ErrorBody {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of `POST /api/upload`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UploadResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub files: Vec<UploadedVideo>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of `POST /api/compose`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ComposeResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub result: Option<ComposeResult>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Catalog entry from `GET /api/transitions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TransitionDescriptor {
    /// Wire name (kept as a string so unknown effects still list)
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Response of `GET /api/transitions`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TransitionsResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub transitions: Vec<TransitionDescriptor>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A file stored on the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StoredFile {
    pub filename: String,
    pub size: u64,
    /// Local time of last modification, as reported by the backend
    pub modified: NaiveDateTime,
}

/// Response of `GET /api/files`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FilesResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub upload_files: Vec<StoredFile>,
    #[serde(default)]
    pub output_files: Vec<StoredFile>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: NaiveDateTime,
    pub version: String,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

impl_envelope!(
    ErrorBody,
    UploadResponse,
    ComposeResponse,
    TransitionsResponse,
    FilesResponse,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_error_envelope() {
        let response: ComposeResponse =
            serde_json::from_str(r#"{"status": "error", "error": "disk full"}"#).unwrap();
        assert!(!response.is_success());
        assert_eq!(response.error(), Some("disk full"));
        assert!(response.result.is_none());
    }

    #[test]
    fn test_upload_envelope_without_status() {
        // Backend validation failures only carry `error`.
        let response: UploadResponse =
            serde_json::from_str(r#"{"error": "no file selected"}"#).unwrap();
        assert!(!response.is_success());
        assert!(response.files.is_empty());
    }

    #[test]
    fn test_files_listing() {
        let json = r#"{
            "status": "success",
            "upload_files": [{"filename": "a.mp4", "size": 10, "modified": "2024-05-01T10:20:30.123456"}],
            "output_files": []
        }"#;
        let response: FilesResponse = serde_json::from_str(json).unwrap();
        assert!(response.is_success());
        assert_eq!(response.upload_files[0].filename, "a.mp4");
        assert!(response.output_files.is_empty());
    }

    #[test]
    fn test_health() {
        let json = r#"{"status": "healthy", "timestamp": "2024-05-01T10:20:30.5", "version": "1.0.0"}"#;
        let response: HealthResponse = serde_json::from_str(json).unwrap();
        assert!(response.is_healthy());
        assert_eq!(response.version, "1.0.0");
    }
}
