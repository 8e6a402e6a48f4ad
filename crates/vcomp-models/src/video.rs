//! Uploaded video descriptors.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Probe data the backend attaches to every uploaded file.
///
/// Every field is optional: when probing fails the backend only returns
/// `{"error": "..."}` and the file is still accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoInfo {
    /// Duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// Frame size as `[width, height]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<[u32; 2]>,

    /// Frames per second
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,

    /// Whether an audio track was found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_audio: Option<bool>,

    /// Probe error reported by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VideoInfo {
    /// Resolution formatted as `WxH`, if known.
    pub fn resolution(&self) -> Option<String> {
        self.size.map(|[w, h]| format!("{}x{}", w, h))
    }
}

/// A video accepted and stored by the backend.
///
/// Position in the wizard's video list decides composition order and
/// which gap each transition occupies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UploadedVideo {
    /// Server-side path, sent back verbatim in compose requests
    pub path: String,

    /// Stored (unique) file name, used for preview URLs
    pub filename: String,

    /// Name of the file as selected by the user
    pub original_name: String,

    /// Size in bytes
    pub size: u64,

    /// Probe data
    #[serde(default)]
    pub info: VideoInfo,
}

impl UploadedVideo {
    /// Duration in seconds, or zero when the backend could not probe it.
    pub fn duration_secs(&self) -> f64 {
        self.info.duration.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_descriptor() {
        let json = r#"{
            "original_name": "intro.mp4",
            "filename": "3f2a.mp4",
            "path": "uploads/3f2a.mp4",
            "size": 10485760,
            "info": {"duration": 12.5, "size": [1920, 1080], "fps": 30.0, "has_audio": true}
        }"#;

        let video: UploadedVideo = serde_json::from_str(json).unwrap();
        assert_eq!(video.original_name, "intro.mp4");
        assert_eq!(video.size, 10 * 1024 * 1024);
        assert_eq!(video.info.resolution().as_deref(), Some("1920x1080"));
        assert!((video.duration_secs() - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_probe_failure_info() {
        let json = r#"{
            "original_name": "broken.mkv",
            "filename": "aa.mkv",
            "path": "uploads/aa.mkv",
            "size": 42,
            "info": {"error": "moov atom not found"}
        }"#;

        let video: UploadedVideo = serde_json::from_str(json).unwrap();
        assert_eq!(video.info.error.as_deref(), Some("moov atom not found"));
        assert_eq!(video.info.resolution(), None);
        assert_eq!(video.duration_secs(), 0.0);
    }
}
