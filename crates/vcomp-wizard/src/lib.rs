//! Video composition wizard.
//!
//! This crate provides:
//! - The wizard controller (upload -> configure -> processing -> done)
//! - Client-side upload validation
//! - Transition settings with the offered option sets
//! - Synthetic compose progress with a cancellable ticker
//! - Step navigation guard, notifications and project statistics

pub mod config;
pub mod error;
pub mod logging;
pub mod notify;
pub mod progress;
pub mod settings;
pub mod state;
pub mod step;
pub mod upload;
pub mod wizard;

pub use config::WizardConfig;
pub use error::{WizardError, WizardResult};
pub use logging::SessionLogger;
pub use notify::{Notification, NotificationLevel};
pub use progress::{ProgressSettings, ProgressTicker};
pub use settings::TransitionSettings;
pub use state::{ProjectStats, WizardState};
pub use step::{can_jump, WizardStep, MIN_VIDEOS};
pub use upload::{validate_file, RejectReason, ACCEPTED_EXTENSIONS};
pub use wizard::{UploadReport, Wizard};
