//! Structured session logging.

use tracing::{error, info, warn, Span};
use uuid::Uuid;

/// Tags wizard lifecycle events with the session and operation.
#[derive(Debug, Clone)]
pub struct SessionLogger {
    session_id: String,
    operation: String,
}

impl SessionLogger {
    /// Start a logger for a fresh session.
    ///
    /// # Arguments
    /// * `operation` - What the session is doing (e.g., "wizard", "upload", "compose")
    pub fn new(operation: &str) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            operation: operation.to_string(),
        }
    }

    /// Same session, different operation.
    pub fn for_operation(&self, operation: &str) -> Self {
        Self {
            session_id: self.session_id.clone(),
            operation: operation.to_string(),
        }
    }

    /// Log the start of an operation.
    pub fn log_start(&self, message: &str) {
        info!(
            session_id = %self.session_id,
            operation = %self.operation,
            "Started: {}", message
        );
    }

    /// Log a progress update while an operation runs.
    pub fn log_progress(&self, message: &str) {
        info!(
            session_id = %self.session_id,
            operation = %self.operation,
            "Progress: {}", message
        );
    }

    /// Log a recoverable problem.
    pub fn log_warning(&self, message: &str) {
        warn!(
            session_id = %self.session_id,
            operation = %self.operation,
            "Warning: {}", message
        );
    }

    /// Log a failed operation.
    pub fn log_error(&self, message: &str) {
        error!(
            session_id = %self.session_id,
            operation = %self.operation,
            "Failed: {}", message
        );
    }

    /// Log the successful end of an operation.
    pub fn log_completion(&self, message: &str) {
        info!(
            session_id = %self.session_id,
            operation = %self.operation,
            "Completed: {}", message
        );
    }

    /// Random id shared by every logger of this session.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Span carrying the session fields, for attaching to futures.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "wizard",
            session_id = %self.session_id,
            operation = %self.operation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_operation_keeps_session() {
        let logger = SessionLogger::new("session");
        let compose = logger.for_operation("compose");

        assert_eq!(compose.session_id(), logger.session_id());
        assert_eq!(compose.operation(), "compose");
        assert_ne!(SessionLogger::new("session").session_id(), logger.session_id());
    }
}
