//! Error types for studio calls and configuration.

use reqwest::StatusCode;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single studio call.
#[derive(Debug, Error)]
pub enum ServiceApiError {
    /// The request never produced a response (connect, timeout, I/O).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was not valid JSON.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A status-checked call got something other than 200.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    /// The body parsed but had the wrong shape.
    #[error("unexpected response body: expected {expected}, found {found}")]
    UnexpectedBody {
        expected: &'static str,
        found: &'static str,
    },
}

impl ServiceApiError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Status code carried by the error, if the server answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ServiceApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

/// Failure to load or validate client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
