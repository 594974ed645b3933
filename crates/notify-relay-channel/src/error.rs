//! Sink delivery errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("subscriber endpoint closed")]
    Closed,

    #[error("subscriber rejected record: {0}")]
    Rejected(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
