//! Client Error Types
//!
//! Request failures that propagate to the caller. Authentication failures
//! are not errors: the client clears the session and returns `None`.

use std::path::PathBuf;
use thiserror::Error;

use crate::session::SessionError;

/// Errors that can occur when talking to the CMS backend
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to create HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("API error {status} from {endpoint}: {message}")]
    Api {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("Invalid response from {endpoint}: {error}")]
    Decode { endpoint: String, error: String },

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Failed to read {path:?}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl ClientError {
    pub(crate) fn transport(endpoint: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ClientError::Timeout {
                endpoint: endpoint.to_string(),
            }
        } else {
            ClientError::Transport {
                endpoint: endpoint.to_string(),
                source: error,
            }
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
