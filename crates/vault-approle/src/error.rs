//! Error types for the AppRole binding

use serde::Deserialize;
use thiserror::Error;

/// Result type alias for AppRole operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`RoleRegistry`](crate::RoleRegistry) operations
#[derive(Error, Debug)]
pub enum Error {
    /// Local validation failed; no request was issued
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The role options could not be encoded as a request body
    #[error("Encoding role data to JSON request body: {0}")]
    EncodingFailed(#[source] serde_json::Error),

    /// Listing roles failed
    #[error("Failed to list roles at {path:?}: {source}")]
    ListFailed {
        path: String,
        #[source]
        source: TransportError,
    },

    /// Writing a role failed
    #[error("Failed to write role at {path:?}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: TransportError,
    },
}

impl Error {
    /// Target path of the failed request, if one was issued
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::ListFailed { path, .. } | Error::WriteFailed { path, .. } => Some(path),
            Error::InvalidInput(_) | Error::EncodingFailed(_) => None,
        }
    }

    /// Whether the service answered 404.
    ///
    /// Listing a mount that holds no roles yields a 404, so callers that want an
    /// empty list in that case can check this.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::ListFailed { source, .. } | Error::WriteFailed { source, .. } => {
                source.is_not_found()
            }
            _ => false,
        }
    }
}

/// Failure reported by a [`Transport`](crate::Transport) collaborator
#[derive(Error, Debug)]
pub enum TransportError {
    /// The service answered with a non-success status
    #[error("HTTP {status}: {}", .errors.join("; "))]
    Status { status: u16, errors: Vec<String> },

    /// The request never produced a response (connect, TLS, timeout, ...)
    #[error("Connection error: {0}")]
    Connection(String),

    /// The response body could not be decoded
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Standard error envelope returned by the service on failure
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<String>,
}

impl TransportError {
    /// Create an error from a status code and raw response body.
    ///
    /// The service reports failures as `{"errors": ["..."]}`; anything else is
    /// kept verbatim.
    pub fn from_status(status: u16, body: &str) -> Self {
        let errors = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => envelope.errors,
            Err(_) if body.trim().is_empty() => Vec::new(),
            Err(_) => vec![body.trim().to_string()],
        };
        TransportError::Status { status, errors }
    }

    /// Check if the service answered 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, TransportError::Status { status: 404, .. })
    }
}
