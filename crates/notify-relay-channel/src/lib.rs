//! Single-subscriber delivery for notify-relay.
//!
//! This crate defines the [`EventSink`] trait that a foreground consumer
//! implements, the [`SubscriberRegistry`] that holds at most one attached
//! sink, and the [`EventChannel`] that wires the two together behind
//! `start_listening` / `stop_listening`.

use std::sync::Arc;

use notify_relay_types::Record;

pub mod channel;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod registry;

pub use channel::{ChannelSink, EventChannel, RecordStream};
pub use error::SinkError;
pub use registry::{panic_message, DispatchOutcome, SubscriberRegistry, SubscriptionId};

/// Consumer-side endpoint that receives dispatched records.
///
/// `deliver` runs synchronously on the dispatching thread while the registry
/// holds its read lock. Implementations must return promptly and must not
/// call back into the registry.
pub trait EventSink: Send + Sync {
    fn deliver(&self, record: Record) -> Result<(), SinkError>;
}

/// Shared sink reference held by the registry.
pub type SinkRef = Arc<dyn EventSink>;

impl<F> EventSink for F
where
    F: Fn(Record) -> Result<(), SinkError> + Send + Sync,
{
    fn deliver(&self, record: Record) -> Result<(), SinkError> {
        self(record)
    }
}

/// Wrap a closure as a shareable sink.
pub fn sink_fn<F>(f: F) -> SinkRef
where
    F: Fn(Record) -> Result<(), SinkError> + Send + Sync + 'static,
{
    Arc::new(f)
}
