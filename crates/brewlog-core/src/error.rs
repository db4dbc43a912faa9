//! Error types for brewlog-core

use thiserror::Error;

use crate::gateway::GatewayError;
use crate::models::EntityKind;

/// Result type alias using brewlog-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in brewlog-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Local store read/write failure
    #[error("Local store error: {0}")]
    Store(String),

    /// libSQL error
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The server refused the request as invalid. Retrying verbatim fails identically.
    #[error("Rejected by server ({status}): {detail}")]
    Rejected {
        /// HTTP status returned by the server
        status: u16,
        /// Response body describing the rejected fields
        detail: String,
    },

    /// Network failure or timeout, the server's verdict is unknown
    #[error("Server unreachable: {0}")]
    Unreachable(String),

    /// Some pending entries could not be uploaded and stay queued for retry
    #[error("{pending} pending {kind} entries could not be uploaded: {reason}")]
    UploadIncomplete {
        /// Collection the pending list belongs to
        kind: EntityKind,
        /// Number of entries still queued
        pending: usize,
        /// Last failure seen while draining
        reason: String,
    },

    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the failure means "saved locally, will sync later".
    pub const fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable(_) | Self::UploadIncomplete { .. })
    }
}

impl From<GatewayError> for Error {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::Rejected { status, detail } => Self::Rejected { status, detail },
            GatewayError::Unreachable(reason) => Self::Unreachable(reason),
        }
    }
}
