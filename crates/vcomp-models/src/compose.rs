//! Compose request and result types.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::transition::TransitionSpec;
use crate::video::UploadedVideo;

/// Prefix of generated output file names.
pub const DEFAULT_OUTPUT_PREFIX: &str = "enterprise_composed";

/// Body of `POST /api/compose`.
///
/// The backend accepts one transition per gap, so `transitions` may in
/// principle differ per gap. [`ComposeRequest::uniform`] is the only
/// constructor the wizard uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ComposeRequest {
    /// Server-side video paths, in composition order
    pub video_files: Vec<String>,

    /// One transition per gap (`video_files.len() - 1` entries)
    pub transitions: Vec<TransitionSpec>,

    /// Name of the file the backend should produce
    pub output_filename: String,
}

impl ComposeRequest {
    /// Build a request applying the same transition to every gap.
    pub fn uniform(
        videos: &[UploadedVideo],
        transition: TransitionSpec,
        output_filename: impl Into<String>,
    ) -> Self {
        Self {
            video_files: videos.iter().map(|v| v.path.clone()).collect(),
            transitions: transition.repeat_for(videos.len()),
            output_filename: output_filename.into(),
        }
    }

    /// Number of gaps between clips.
    pub fn gap_count(&self) -> usize {
        self.video_files.len().saturating_sub(1)
    }
}

/// Generate an output file name of the form `<prefix>_<unix_ms>.mp4`.
pub fn output_filename(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{}_{}.mp4", prefix, at.timestamp_millis())
}

/// Artifact produced by a successful compose call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ComposeResult {
    /// File name to use with the download and preview endpoints
    pub output_filename: String,

    /// Server-side path of the output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,

    /// Backend task status (e.g. `SUCCESS`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComposeResult {
    pub fn new(output_filename: impl Into<String>) -> Self {
        Self {
            output_filename: output_filename.into(),
            output_path: None,
            status: None,
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::TransitionKind;
    use crate::video::VideoInfo;
    use chrono::TimeZone;

    fn video(path: &str) -> UploadedVideo {
        UploadedVideo {
            path: path.to_string(),
            filename: path.rsplit('/').next().unwrap_or(path).to_string(),
            original_name: path.to_string(),
            size: 1,
            info: VideoInfo::default(),
        }
    }

    #[test]
    fn test_uniform_request() {
        let videos = vec![video("u/a.mp4"), video("u/b.mp4"), video("u/c.mp4")];
        let spec = TransitionSpec::new(TransitionKind::ZoomOut, 0.5).unwrap();

        let request = ComposeRequest::uniform(&videos, spec, "out.mp4");

        assert_eq!(request.video_files, vec!["u/a.mp4", "u/b.mp4", "u/c.mp4"]);
        assert_eq!(request.gap_count(), 2);
        assert_eq!(request.transitions, vec![spec, spec]);
        assert_eq!(request.output_filename, "out.mp4");
    }

    #[test]
    fn test_output_filename_uses_unix_millis() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(
            output_filename(DEFAULT_OUTPUT_PREFIX, at),
            "enterprise_composed_1700000000123.mp4"
        );
    }

    #[test]
    fn test_result_from_backend() {
        let json = r#"{
            "status": "SUCCESS",
            "output_path": "outputs/out.mp4",
            "output_filename": "out.mp4",
            "message": "done"
        }"#;
        let result: ComposeResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.output_filename, "out.mp4");
        assert_eq!(result.output_path.as_deref(), Some("outputs/out.mp4"));
    }
}
