use thiserror::Error;

/// Errors from the outbound FHIR gateway.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to reach clinical data server: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Clinical data server returned HTTP {status}: {message}")]
    UpstreamStatus { status: u16, message: String },

    #[error("Failed to parse server response: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::UpstreamStatus {
            status,
            message: message.into(),
        }
    }

    /// Upstream said the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UpstreamStatus { status: 404, .. })
    }
}
