//! Transition settings chosen on the configure step.

use vcomp_models::{TransitionError, TransitionKind, TransitionSpec};

/// Holds the transition applied to every gap.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransitionSettings {
    spec: TransitionSpec,
}

impl TransitionSettings {
    pub fn kind(&self) -> TransitionKind {
        self.spec.kind
    }

    pub fn duration(&self) -> f64 {
        self.spec.duration
    }

    /// The transition applied to every gap.
    pub fn spec(&self) -> TransitionSpec {
        self.spec
    }

    /// Change the transition type. Every kind is valid.
    pub fn set_kind(&mut self, kind: TransitionKind) {
        self.spec.kind = kind;
    }

    /// Change the duration; only the offered options are accepted.
    pub fn set_duration(&mut self, duration: f64) -> Result<(), TransitionError> {
        self.spec = TransitionSpec::new(self.spec.kind, duration)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = TransitionSettings::default();
        assert_eq!(settings.kind(), TransitionKind::Fade);
        assert_eq!(settings.duration(), 1.0);
    }

    #[test]
    fn test_invalid_duration_keeps_previous_value() {
        let mut settings = TransitionSettings::default();
        settings.set_kind(TransitionKind::SlideUp);
        settings.set_duration(3.0).unwrap();

        assert!(settings.set_duration(4.0).is_err());
        assert_eq!(settings.duration(), 3.0);
        assert_eq!(settings.kind(), TransitionKind::SlideUp);
    }
}
