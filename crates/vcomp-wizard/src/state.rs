//! Wizard state and derived statistics.

use vcomp_models::{format_duration, format_file_size, ComposeResult, UploadedVideo};

use crate::settings::TransitionSettings;
use crate::step::{can_jump, WizardStep};

/// Everything the wizard screens render from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardState {
    pub step: WizardStep,
    /// Uploaded videos in composition order
    pub videos: Vec<UploadedVideo>,
    pub settings: TransitionSettings,
    pub result: Option<ComposeResult>,
    pub composing: bool,
    pub uploads_in_flight: usize,
}

impl WizardState {
    /// Navigation guard applied to the current state.
    pub fn can_jump(&self, target: WizardStep) -> bool {
        can_jump(target, self.step, self.videos.len(), self.result.is_some())
    }

    /// Side-panel statistics for the current video list.
    pub fn stats(&self) -> ProjectStats {
        ProjectStats::from_videos(&self.videos)
    }
}

/// Summary shown next to every step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProjectStats {
    pub video_count: usize,
    pub transition_count: usize,
    pub total_bytes: u64,
    /// Sum of known durations in seconds
    pub total_duration: f64,
}

impl ProjectStats {
    pub fn from_videos(videos: &[UploadedVideo]) -> Self {
        Self {
            video_count: videos.len(),
            transition_count: videos.len().saturating_sub(1),
            total_bytes: videos.iter().map(|v| v.size).sum(),
            total_duration: videos.iter().map(UploadedVideo::duration_secs).sum(),
        }
    }

    /// Total size, human formatted.
    pub fn total_size_display(&self) -> String {
        format_file_size(self.total_bytes)
    }

    pub fn total_duration_display(&self) -> String {
        format_duration(self.total_duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vcomp_models::VideoInfo;

    fn video(size: u64, duration: Option<f64>) -> UploadedVideo {
        UploadedVideo {
            path: "uploads/x.mp4".into(),
            filename: "x.mp4".into(),
            original_name: "x.mp4".into(),
            size,
            info: VideoInfo {
                duration,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_stats() {
        let videos = vec![
            video(10 * 1024 * 1024, Some(30.0)),
            video(20 * 1024 * 1024, None),
            video(2 * 1024 * 1024, Some(45.5)),
        ];
        let stats = ProjectStats::from_videos(&videos);

        assert_eq!(stats.video_count, 3);
        assert_eq!(stats.transition_count, 2);
        assert_eq!(stats.total_size_display(), "32 MB");
        assert_eq!(stats.total_duration_display(), "1:15");
    }

    #[test]
    fn test_empty_stats() {
        let stats = WizardState::default().stats();
        assert_eq!(stats.transition_count, 0);
        assert_eq!(stats.total_size_display(), "0 Bytes");
    }

    #[test]
    fn test_state_guard() {
        let mut state = WizardState::default();
        assert!(!state.can_jump(WizardStep::Configure));

        state.videos = vec![video(1, None), video(1, None)];
        assert!(state.can_jump(WizardStep::Configure));
        assert!(!state.can_jump(WizardStep::Done));

        state.result = Some(ComposeResult::new("out.mp4"));
        assert!(state.can_jump(WizardStep::Done));
    }
}
