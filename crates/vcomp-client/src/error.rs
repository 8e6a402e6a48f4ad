//! Client error types.

use thiserror::Error;

/// Result type for backend client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while talking to the composition backend.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered but reported a failure, either with a non-2xx
    /// status or with `status != "success"`.
    #[error("{}", describe_backend(.status, .message))]
    Backend { status: u16, message: Option<String> },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid file: {0}")]
    InvalidFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn describe_backend(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => format!("Backend request failed with HTTP {}", status),
    }
}

impl ClientError {
    pub fn invalid_url(msg: impl Into<String>) -> Self {
        Self::InvalidUrl(msg.into())
    }

    pub fn invalid_file(msg: impl Into<String>) -> Self {
        Self::InvalidFile(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Failure reported by the backend, with its `error` text if any.
    pub fn backend(status: u16, message: Option<String>) -> Self {
        Self::Backend { status, message }
    }

    /// Error text supplied by the backend, if it sent one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ClientError::Backend { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of the failed exchange, when known.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ClientError::Backend { status, .. } => Some(*status),
            ClientError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = ClientError::backend(500, Some("disk full".to_string()));
        assert_eq!(err.to_string(), "disk full");
        assert_eq!(err.backend_message(), Some("disk full"));
        assert_eq!(err.http_status(), Some(500));

        let err = ClientError::backend(502, None);
        assert_eq!(err.to_string(), "Backend request failed with HTTP 502");
        assert_eq!(err.backend_message(), None);
    }
}
