//! Wizard configuration.

use std::time::Duration;

use vcomp_models::DEFAULT_OUTPUT_PREFIX;

use crate::progress::ProgressSettings;

/// Largest file the upload step accepts (exclusive).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;

/// Wizard controller configuration.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    /// Delay before moving to the configure step once two videos are in
    pub auto_advance_delay: Duration,
    /// Interval of the synthetic progress ticker
    pub progress_tick: Duration,
    /// Percentage added per tick
    pub progress_step: f64,
    /// Ceiling the ticker never passes before the backend answers
    pub progress_cap: f64,
    /// Files of this size or larger are rejected before upload
    pub max_upload_bytes: u64,
    /// Maximum uploads in flight at once
    pub upload_parallelism: usize,
    /// Prefix of generated output file names
    pub output_prefix: String,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            auto_advance_delay: Duration::from_millis(500),
            progress_tick: Duration::from_secs(1),
            progress_step: 10.0,
            progress_cap: 90.0,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            upload_parallelism: 4,
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
        }
    }
}

impl WizardConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            auto_advance_delay: std::env::var("WIZARD_AUTO_ADVANCE_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.auto_advance_delay),
            progress_tick: std::env::var("WIZARD_PROGRESS_TICK_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|ms: &u64| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.progress_tick),
            progress_step: std::env::var("WIZARD_PROGRESS_STEP")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|step: &f64| *step > 0.0)
                .unwrap_or(defaults.progress_step),
            progress_cap: std::env::var("WIZARD_PROGRESS_CAP")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(|cap: f64| cap.clamp(0.0, 100.0))
                .unwrap_or(defaults.progress_cap),
            max_upload_bytes: std::env::var("WIZARD_MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
            upload_parallelism: std::env::var("WIZARD_UPLOAD_PARALLELISM")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.upload_parallelism),
            output_prefix: std::env::var("WIZARD_OUTPUT_PREFIX")
                .unwrap_or(defaults.output_prefix),
        }
    }

    /// Parameters for the synthetic progress ticker.
    pub fn progress_settings(&self) -> ProgressSettings {
        ProgressSettings {
            tick: self.progress_tick,
            step: self.progress_step,
            cap: self.progress_cap,
        }
    }
}
