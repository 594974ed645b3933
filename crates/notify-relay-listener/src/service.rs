//! The listener service: host callbacks in, dispatched records out.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use notify_relay_channel::{panic_message, DispatchOutcome, SubscriberRegistry};
use notify_relay_types::{BindingId, EventRecord, RawNotification, TerminalStatus};
use tracing::{debug, error, info};

use crate::state::{transition, Action, LifecycleKind, ServiceState};

/// A callback from the host, with its payload.
///
/// Notification callbacks carry an `Option` because the host may hand over a
/// null notification; those are ignored.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    ListenerConnected,
    NotificationPosted(Option<RawNotification>),
    NotificationRemoved(Option<RawNotification>),
    ListenerDisconnected,
}

impl LifecycleEvent {
    pub fn kind(&self) -> LifecycleKind {
        match self {
            Self::ListenerConnected => LifecycleKind::ListenerConnected,
            Self::NotificationPosted(_) => LifecycleKind::NotificationPosted,
            Self::NotificationRemoved(_) => LifecycleKind::NotificationRemoved,
            Self::ListenerDisconnected => LifecycleKind::ListenerDisconnected,
        }
    }
}

/// Counters kept by the service since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerStats {
    /// Posted notifications converted and dispatched.
    pub posted: u64,
    /// Event records accepted by the subscriber.
    pub delivered: u64,
    /// Event records dropped for lack of a subscriber.
    pub dropped: u64,
    /// Event records the subscriber failed to accept.
    pub failed: u64,
    /// Removed notifications observed.
    pub removed: u64,
    /// Terminal records dispatched.
    pub terminal: u64,
    /// Callbacks ignored in the current state or carrying no notification.
    pub ignored: u64,
    /// Panics caught while handling a callback.
    pub panics: u64,
}

/// Receives host lifecycle callbacks and pushes records through the shared
/// registry.
///
/// Callbacks arrive on a single host thread, so the service is driven through
/// `&mut self`; only the registry is shared with the consumer side.
pub struct ListenerService {
    registry: Arc<SubscriberRegistry>,
    state: ServiceState,
    binding: Option<BindingId>,
    stats: ListenerStats,
}

impl ListenerService {
    pub fn new(registry: Arc<SubscriberRegistry>) -> Self {
        Self {
            registry,
            state: ServiceState::Unbound,
            binding: None,
            stats: ListenerStats::default(),
        }
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    /// Current or most recent binding, if the host ever bound the service.
    pub fn binding_id(&self) -> Option<BindingId> {
        self.binding
    }

    pub fn stats(&self) -> ListenerStats {
        self.stats
    }

    /// Handle one host callback and return the resulting state.
    ///
    /// Never panics: anything that goes wrong while converting or
    /// dispatching is logged and absorbed here.
    pub fn handle(&mut self, event: LifecycleEvent) -> ServiceState {
        let kind = event.kind();
        let from = self.state;
        let t = transition(from, kind);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.apply(t.action, event)));
        if let Err(payload) = outcome {
            self.stats.panics += 1;
            error!(
                event = %kind,
                state = %from,
                panic = %panic_message(payload.as_ref()),
                "panic while handling listener callback"
            );
        }

        if t.next != from {
            debug!(from = %from, to = %t.next, event = %kind, "listener state changed");
        }
        self.state = t.next;
        self.state
    }

    pub fn on_listener_connected(&mut self) -> ServiceState {
        self.handle(LifecycleEvent::ListenerConnected)
    }

    pub fn on_notification_posted(
        &mut self,
        notification: Option<RawNotification>,
    ) -> ServiceState {
        self.handle(LifecycleEvent::NotificationPosted(notification))
    }

    pub fn on_notification_removed(
        &mut self,
        notification: Option<RawNotification>,
    ) -> ServiceState {
        self.handle(LifecycleEvent::NotificationRemoved(notification))
    }

    pub fn on_listener_disconnected(&mut self) -> ServiceState {
        self.handle(LifecycleEvent::ListenerDisconnected)
    }

    fn apply(&mut self, action: Action, event: LifecycleEvent) {
        match (action, event) {
            (Action::BeginBinding, _) => {
                let binding = BindingId::new();
                self.binding = Some(binding);
                info!(binding = %binding, "notification listener connected");
            }
            (Action::Forward, LifecycleEvent::NotificationPosted(Some(raw))) => {
                self.forward(&raw);
            }
            (Action::Observe, LifecycleEvent::NotificationRemoved(Some(raw))) => {
                self.stats.removed += 1;
                info!(package = %raw.package_name, "notification removed");
            }
            (Action::Terminate, _) => {
                info!(binding = ?self.binding, "notification listener disconnected");
                self.stats.terminal += 1;
                self.registry.dispatch_terminal(TerminalStatus::DisconnectedServiceSide);
            }
            (Action::Forward | Action::Observe, event) => {
                self.stats.ignored += 1;
                debug!(event = %event.kind(), "callback without notification ignored");
            }
            (Action::Ignore, event) => {
                self.stats.ignored += 1;
                debug!(
                    event = %event.kind(),
                    state = %self.state,
                    "callback ignored in current state"
                );
            }
        }
    }

    fn forward(&mut self, raw: &RawNotification) {
        let record = EventRecord::from(raw);
        self.stats.posted += 1;
        info!(
            package = %record.source_id(),
            title = ?record.title(),
            text = ?record.body(),
            "notification posted"
        );

        match self.registry.dispatch(record) {
            DispatchOutcome::Delivered => self.stats.delivered += 1,
            DispatchOutcome::Dropped => self.stats.dropped += 1,
            DispatchOutcome::Failed => self.stats.failed += 1,
        }
    }
}
