//! Registry holding the one attached subscriber.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use notify_relay_types::{EventRecord, Record, TerminalStatus};
use tracing::{debug, error, info, warn};

use crate::SinkRef;

/// Identifies one `attach` call, for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// What happened to a dispatched record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The attached sink accepted the record.
    Delivered,
    /// No sink was attached; the record is gone.
    Dropped,
    /// The sink returned an error or panicked. The registry is unchanged.
    Failed,
}

struct Subscription {
    id: SubscriptionId,
    sink: SinkRef,
}

/// Holds at most one live subscriber.
///
/// The subscriber slot is a single reference behind a reader/writer lock.
/// Dispatch holds the read side for the whole delivery, so `attach` and
/// `detach` wait for an in-flight delivery to finish and no delivery can
/// start against a sink that has already been detached.
pub struct SubscriberRegistry {
    current: RwLock<Option<Subscription>>,
    next_id: AtomicU64,
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriberRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// Install `sink` as the subscriber, replacing any previous one.
    pub fn attach(&self, sink: SinkRef) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(Subscription { id, sink });
        match previous {
            Some(old) => info!(subscription = %id, replaced = %old.id, "subscriber replaced"),
            None => info!(subscription = %id, "subscriber attached"),
        }
        id
    }

    /// Clear the subscriber. Detaching with nothing attached is a no-op.
    pub fn detach(&self) {
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match previous {
            Some(old) => info!(subscription = %old.id, "subscriber detached"),
            None => debug!("detach with no subscriber attached"),
        }
    }

    /// Whether a subscriber is currently attached.
    pub fn is_attached(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The id of the current subscription, if any.
    pub fn current_subscription(&self) -> Option<SubscriptionId> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|sub| sub.id)
    }

    /// Deliver an event record to the subscriber, or drop it if none is
    /// attached.
    pub fn dispatch(&self, record: EventRecord) -> DispatchOutcome {
        self.deliver(Record::Event(record))
    }

    /// Deliver the terminal sentinel through the same path as events.
    pub fn dispatch_terminal(&self, status: TerminalStatus) -> DispatchOutcome {
        self.deliver(Record::from(status))
    }

    fn deliver(&self, record: Record) -> DispatchOutcome {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        let Some(sub) = guard.as_ref() else {
            warn!(terminal = record.is_terminal(), "no subscriber attached, record dropped");
            return DispatchOutcome::Dropped;
        };

        let terminal = record.is_terminal();
        match panic::catch_unwind(AssertUnwindSafe(|| sub.sink.deliver(record))) {
            Ok(Ok(())) => {
                debug!(subscription = %sub.id, terminal, "record delivered");
                DispatchOutcome::Delivered
            }
            Ok(Err(e)) => {
                warn!(
                    subscription = %sub.id,
                    terminal,
                    error = %e,
                    "subscriber failed to accept record"
                );
                DispatchOutcome::Failed
            }
            Err(payload) => {
                let panic_msg = panic_message(payload.as_ref());
                error!(
                    subscription = %sub.id,
                    terminal,
                    panic = %panic_msg,
                    "subscriber panicked during delivery"
                );
                DispatchOutcome::Failed
            }
        }
    }
}

/// Best-effort text of a caught panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
