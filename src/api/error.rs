use reqwest::StatusCode;
use thiserror::Error;

/// Boxed error produced by a [`Transport`](crate::api::transport::Transport).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of a single dashboard call. None of these are retried.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to marshal request: {0}")]
    Encoding(#[source] serde_json::Error),

    #[error("failed to compress request: {0}")]
    Compression(#[source] std::io::Error),

    #[error("http request failed: {0}")]
    Transport(#[source] BoxError),

    #[error("request failed with {status}: {body}")]
    Remote { status: StatusCode, body: String },

    #[error("failed to unmarshal response: {0}")]
    Decoding(#[source] serde_json::Error),
}

impl DashboardError {
    pub fn is_remote(&self) -> bool {
        matches!(self, DashboardError::Remote { .. })
    }

    /// HTTP status of a remote failure.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            DashboardError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}
