//! Transition effect definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Transition durations (seconds) offered by the configuration step.
pub const DURATION_OPTIONS: &[f64] = &[0.5, 1.0, 1.5, 2.0, 3.0];

/// Duration selected before the user changes anything.
pub const DEFAULT_DURATION: f64 = 1.0;

/// Visual effect applied at the boundary between two consecutive clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Cross-fade through opacity
    #[default]
    Fade,
    /// Next clip slides in from the right
    SlideLeft,
    /// Next clip slides in from the left
    SlideRight,
    /// Next clip slides in from the bottom
    SlideUp,
    /// Next clip slides in from the top
    SlideDown,
    /// Zoom into the next clip
    ZoomIn,
    /// Zoom out to the next clip
    ZoomOut,
}

impl TransitionKind {
    pub const ALL: &'static [TransitionKind] = &[
        TransitionKind::Fade,
        TransitionKind::SlideLeft,
        TransitionKind::SlideRight,
        TransitionKind::SlideUp,
        TransitionKind::SlideDown,
        TransitionKind::ZoomIn,
        TransitionKind::ZoomOut,
    ];

    /// Wire name, as sent in compose requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionKind::Fade => "fade",
            TransitionKind::SlideLeft => "slide_left",
            TransitionKind::SlideRight => "slide_right",
            TransitionKind::SlideUp => "slide_up",
            TransitionKind::SlideDown => "slide_down",
            TransitionKind::ZoomIn => "zoom_in",
            TransitionKind::ZoomOut => "zoom_out",
        }
    }

    /// Short label for selectors.
    pub fn label(&self) -> &'static str {
        match self {
            TransitionKind::Fade => "Fade",
            TransitionKind::SlideLeft => "Slide left",
            TransitionKind::SlideRight => "Slide right",
            TransitionKind::SlideUp => "Slide up",
            TransitionKind::SlideDown => "Slide down",
            TransitionKind::ZoomIn => "Zoom in",
            TransitionKind::ZoomOut => "Zoom out",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TransitionKind::Fade => "Smooth opacity cross-fade, classic and understated",
            TransitionKind::SlideLeft => "Next clip pushes in from right to left",
            TransitionKind::SlideRight => "Next clip pushes in from left to right",
            TransitionKind::SlideUp => "Next clip rises from the bottom edge",
            TransitionKind::SlideDown => "Next clip drops from the top edge",
            TransitionKind::ZoomIn => "Scale up into the next clip",
            TransitionKind::ZoomOut => "Scale out to reveal the next clip",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransitionKind {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fade" => Ok(TransitionKind::Fade),
            "slide_left" => Ok(TransitionKind::SlideLeft),
            "slide_right" => Ok(TransitionKind::SlideRight),
            "slide_up" => Ok(TransitionKind::SlideUp),
            "slide_down" => Ok(TransitionKind::SlideDown),
            "zoom_in" => Ok(TransitionKind::ZoomIn),
            "zoom_out" => Ok(TransitionKind::ZoomOut),
            _ => Err(TransitionError::UnknownKind(s.to_string())),
        }
    }
}

/// Errors raised when building a transition from user input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransitionError {
    #[error("Unknown transition type: {0}")]
    UnknownKind(String),

    #[error("Unsupported transition duration: {0}s (allowed: 0.5, 1.0, 1.5, 2.0, 3.0)")]
    UnsupportedDuration(f64),
}

/// Check that a duration is one of [`DURATION_OPTIONS`].
pub fn validate_duration(duration: f64) -> Result<f64, TransitionError> {
    DURATION_OPTIONS
        .iter()
        .copied()
        .find(|option| (option - duration).abs() < 1e-9)
        .ok_or(TransitionError::UnsupportedDuration(duration))
}

/// Transition applied to a gap between two clips.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TransitionSpec {
    #[serde(rename = "type")]
    pub kind: TransitionKind,

    /// Duration in seconds
    pub duration: f64,
}

impl TransitionSpec {
    /// Build a spec, restricting the duration to the offered options.
    pub fn new(kind: TransitionKind, duration: f64) -> Result<Self, TransitionError> {
        Ok(Self {
            kind,
            duration: validate_duration(duration)?,
        })
    }

    /// Same spec repeated for every gap between `video_count` clips.
    pub fn repeat_for(&self, video_count: usize) -> Vec<TransitionSpec> {
        vec![*self; video_count.saturating_sub(1)]
    }
}

impl Default for TransitionSpec {
    fn default() -> Self {
        Self {
            kind: TransitionKind::default(),
            duration: DEFAULT_DURATION,
        }
    }
}
