//! Error types for the advisory client

use thiserror::Error;

/// Errors that can occur when calling the advisory service
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-reqwest transport failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Request body could not be encoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid endpoint URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Service answered with something other than 200 OK
    #[error("advisory API returned status {0}")]
    Status(reqwest::StatusCode),

    /// 200 OK body was not a valid advisory response
    #[error("decode advisory response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ClientError {
    /// HTTP status code of a [`ClientError::Status`] error
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status(status) => Some(status.as_u16()),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
