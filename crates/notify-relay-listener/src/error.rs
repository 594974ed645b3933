//! Listener errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid component name: {0}")]
    Component(#[from] notify_relay_types::ComponentNameError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
