//! Permission subsystem errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PermissionError {
    #[error("open command is empty")]
    EmptyCommand,

    #[error("failed to launch settings screen: {0}")]
    LaunchFailed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
