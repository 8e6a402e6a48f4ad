//! Wizard steps and the navigation guard.

use std::fmt;

/// Videos required before the configure step unlocks.
pub const MIN_VIDEOS: usize = 2;

/// One of the four linear wizard stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum WizardStep {
    #[default]
    Upload,
    Configure,
    Processing,
    Done,
}

impl WizardStep {
    pub const ALL: &'static [WizardStep] = &[
        WizardStep::Upload,
        WizardStep::Configure,
        WizardStep::Processing,
        WizardStep::Done,
    ];

    /// Zero-based position in the wizard.
    pub fn index(&self) -> usize {
        match self {
            WizardStep::Upload => 0,
            WizardStep::Configure => 1,
            WizardStep::Processing => 2,
            WizardStep::Done => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Title shown in the step indicator.
    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Upload => "Upload videos",
            WizardStep::Configure => "Configure transitions",
            WizardStep::Processing => "Processing",
            WizardStep::Done => "Done",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Whether a direct jump to `target` is allowed.
///
/// Earlier (or the current) steps are always reachable; configure needs
/// two videos; done needs a stored result. Processing is only entered by
/// composing.
pub fn can_jump(target: WizardStep, current: WizardStep, video_count: usize, has_result: bool) -> bool {
    target <= current
        || (target == WizardStep::Configure && video_count >= MIN_VIDEOS)
        || (target == WizardStep::Done && has_result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for step in WizardStep::ALL {
            assert_eq!(WizardStep::from_index(step.index()), Some(*step));
        }
        assert_eq!(WizardStep::from_index(4), None);
    }

    #[test]
    fn test_backward_jumps_always_allowed() {
        assert!(can_jump(WizardStep::Upload, WizardStep::Done, 0, false));
        assert!(can_jump(WizardStep::Processing, WizardStep::Done, 0, false));
        assert!(can_jump(WizardStep::Configure, WizardStep::Configure, 0, false));
    }

    #[test]
    fn test_forward_jumps_need_preconditions() {
        assert!(!can_jump(WizardStep::Configure, WizardStep::Upload, 1, false));
        assert!(can_jump(WizardStep::Configure, WizardStep::Upload, 2, false));

        assert!(!can_jump(WizardStep::Processing, WizardStep::Configure, 5, true));

        assert!(!can_jump(WizardStep::Done, WizardStep::Configure, 3, false));
        assert!(can_jump(WizardStep::Done, WizardStep::Upload, 0, true));
    }
}
