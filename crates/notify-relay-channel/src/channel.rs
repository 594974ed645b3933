//! Named event channel between the listener and the foreground consumer.
//!
//! `start_listening` attaches a fresh subscriber and hands the consumer a
//! [`RecordStream`]; `stop_listening` detaches it. Replacing or detaching the
//! subscriber drops its sender, which ends the previous stream.

use std::sync::Arc;

use notify_relay_types::Record;
use tokio::sync::mpsc;
use tracing::info;

use crate::error::SinkError;
use crate::registry::{SubscriberRegistry, SubscriptionId};
use crate::{EventSink, SinkRef};

/// Sink that forwards records into an unbounded in-process channel.
///
/// Sending never blocks, so delivery stays bounded on the dispatching thread.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Record>,
}

impl ChannelSink {
    /// Create a sink and the receiver it feeds.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Record>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn deliver(&self, record: Record) -> Result<(), SinkError> {
        self.tx.send(record).map_err(|_| SinkError::Closed)
    }
}

/// Consumer end of one subscription.
pub struct RecordStream {
    id: SubscriptionId,
    rx: mpsc::UnboundedReceiver<Record>,
}

impl RecordStream {
    /// Subscription this stream belongs to.
    pub fn subscription_id(&self) -> SubscriptionId {
        self.id
    }

    /// Wait for the next record. Returns `None` once the subscription has
    /// been detached or replaced and all buffered records are drained.
    pub async fn recv(&mut self) -> Option<Record> {
        self.rx.recv().await
    }

    /// Take a buffered record without waiting.
    pub fn try_recv(&mut self) -> Option<Record> {
        self.rx.try_recv().ok()
    }
}

/// A named channel bound to a shared registry.
pub struct EventChannel {
    name: String,
    registry: Arc<SubscriberRegistry>,
}

impl EventChannel {
    pub fn new(name: impl Into<String>, registry: Arc<SubscriberRegistry>) -> Self {
        Self {
            name: name.into(),
            registry,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The registry this channel attaches to.
    pub fn registry(&self) -> &Arc<SubscriberRegistry> {
        &self.registry
    }

    /// Attach a channel-backed subscriber, replacing any previous one.
    pub fn start_listening(&self) -> RecordStream {
        let (sink, rx) = ChannelSink::new();
        let id = self.start_listening_with(Arc::new(sink));
        RecordStream { id, rx }
    }

    /// Attach a caller-provided subscriber, replacing any previous one.
    pub fn start_listening_with(&self, sink: SinkRef) -> SubscriptionId {
        let id = self.registry.attach(sink);
        info!(channel = %self.name, subscription = %id, "consumer listening");
        id
    }

    /// Detach the current subscriber.
    pub fn stop_listening(&self) {
        info!(channel = %self.name, "consumer stopped listening");
        self.registry.detach();
    }
}
