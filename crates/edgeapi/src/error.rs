//! Error types for management-API operations.
//!
//! Exports run without retries: the first failed request aborts the run,
//! so errors carry what a user needs to read in one message and nothing
//! aimed at programmatic recovery.

use std::io;

/// Result type alias for management-API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the management API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed (transport error or error status).
    #[error("HTTP request failed: {message}")]
    Http {
        /// Error message.
        message: String,
        /// HTTP status code if the server answered.
        status: Option<u16>,
    },

    /// The server answered but the payload didn't parse.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),

    /// A named remote object does not exist.
    #[error("{kind} not found: {name}")]
    NotFound {
        /// Object kind (zone, property, access key, ...).
        kind: &'static str,
        /// Name or id that was looked up.
        name: String,
    },

    /// Credentials file missing, unreadable, or lacking the section.
    #[error("credentials error: {0}")]
    Credentials(String),

    /// An access key without a group assignment cannot be exported.
    #[error("access key {uid} has no group assignment")]
    NoGroup {
        /// Unique id of the access key.
        uid: i64,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Http {
                message: format!("HTTP {code}"),
                status: Some(code),
            },
            other => Self::Http {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
