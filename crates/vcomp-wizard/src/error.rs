//! Wizard error types.

use thiserror::Error;

use vcomp_client::ClientError;
use vcomp_models::TransitionError;

use crate::step::WizardStep;
use crate::upload::RejectReason;

pub type WizardResult<T> = Result<T, WizardError>;

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("{name} rejected: {reason}")]
    Rejected { name: String, reason: RejectReason },

    #[error("At least 2 videos are required to compose, have {0}")]
    NotEnoughVideos(usize),

    #[error("No composed video is available")]
    NoResult,

    #[error("Cannot jump to '{requested}' from '{current}' yet")]
    StepLocked {
        requested: WizardStep,
        current: WizardStep,
    },

    #[error("No video at position {0}")]
    InvalidIndex(usize),

    #[error("Invalid setting: {0}")]
    InvalidSetting(#[from] TransitionError),

    #[error("A composition is already running")]
    Busy,

    #[error("Wizard was reset before the composition finished")]
    Discarded,

    #[error("Composition failed: {message}")]
    ComposeFailed {
        message: String,
        #[source]
        source: ClientError,
    },

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl WizardError {
    /// A file refused before upload.
    pub fn rejected(name: impl Into<String>, reason: RejectReason) -> Self {
        Self::Rejected {
            name: name.into(),
            reason,
        }
    }

    /// Whether the user can fix this by retrying without starting over.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WizardError::ComposeFailed { .. } | WizardError::Client(_))
    }
}
