use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] brewlog_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Tea name cannot be empty")]
    EmptyName,
    #[error("Invalid duration '{0}', expected HH:MM:SS or a number of seconds")]
    InvalidDuration(String),
    #[error("No tea named '{0}' in the local catalogue")]
    TeaNotFound(String),
    #[error("Failed to resolve CLI data directory; pass --db-path")]
    NoDataDir,
}
