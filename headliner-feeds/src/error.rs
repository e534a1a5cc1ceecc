//! Error types for the feeds module

use headliner_core::HeadlinerError;
use thiserror::Error;

/// Errors that can occur while fetching market data
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request failed before a response arrived
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Endpoint answered with a non-2xx status
    #[error("HTTP error: {status} from {url}")]
    HttpError {
        /// HTTP status code
        status: u16,
        /// Endpoint that failed
        url: String,
    },

    /// Body was not the JSON we expected
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<FeedError> for HeadlinerError {
    fn from(e: FeedError) -> Self {
        match e {
            FeedError::NetworkError(msg) => HeadlinerError::network(msg),
            FeedError::Timeout(msg) => HeadlinerError::timeout(msg),
            FeedError::HttpError { status, url } => {
                HeadlinerError::api(format!("{} returned status {}", url, status))
            }
            FeedError::ParseError(msg) => HeadlinerError::parse(msg),
            FeedError::InvalidConfig(msg) => HeadlinerError::config(msg),
        }
    }
}
