//! Error types for headliner

use thiserror::Error;

/// Workspace-wide error type
#[derive(Error, Debug)]
pub enum HeadlinerError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HeadlinerError {
    pub fn api(msg: impl Into<String>) -> Self {
        HeadlinerError::Api(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        HeadlinerError::Network(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        HeadlinerError::Timeout(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        HeadlinerError::Parse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        HeadlinerError::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        HeadlinerError::Internal(msg.into())
    }
}

impl From<serde_json::Error> for HeadlinerError {
    fn from(e: serde_json::Error) -> Self {
        HeadlinerError::Parse(e.to_string())
    }
}

/// Result type alias for headliner operations
pub type HeadlinerResult<T> = Result<T, HeadlinerError>;
