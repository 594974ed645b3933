//! Notification listener service for notify-relay.
//!
//! Implements the lifecycle state machine that turns host callbacks into
//! dispatched records, plus configuration loading and the wiring that shares
//! one subscriber registry between the service and the event channel.

pub mod config;
pub mod error;
pub mod service;
pub mod setup;
pub mod state;

pub use config::Config;
pub use error::ListenerError;
pub use service::{LifecycleEvent, ListenerService, ListenerStats};
pub use setup::{build_bridge, Bridge};
pub use state::{Action, LifecycleKind, ServiceState, Transition};
