use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to serialize/deserialize data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

impl MetricsError {
    /// True for failures signalled by the provider itself (unknown user,
    /// missing solved count) as opposed to transport or decode failures.
    pub fn is_semantic(&self) -> bool {
        matches!(self, MetricsError::Upstream(_))
    }
}

pub type Result<T> = std::result::Result<T, MetricsError>;
