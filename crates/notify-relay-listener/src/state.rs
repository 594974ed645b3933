//! Listener lifecycle state machine.
//!
//! Every host callback is looked up in [`TRANSITIONS`] by current state and
//! callback kind. Pairs missing from the table leave the state unchanged and
//! are ignored.

/// Binding state of the listener service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceState {
    /// Not yet bound by the host.
    Unbound,
    /// Bound; notification callbacks are forwarded.
    Connected,
    /// Binding revoked. Terminal for this binding; a re-bind starts a new one.
    Disconnected,
}

impl ServiceState {
    /// Whether posted notifications are forwarded in this state.
    pub fn is_forwarding(self) -> bool {
        self == Self::Connected
    }
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unbound => write!(f, "Unbound"),
            Self::Connected => write!(f, "Connected"),
            Self::Disconnected => write!(f, "Disconnected"),
        }
    }
}

/// Kind of host callback, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleKind {
    ListenerConnected,
    NotificationPosted,
    NotificationRemoved,
    ListenerDisconnected,
}

impl std::fmt::Display for LifecycleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ListenerConnected => write!(f, "listener_connected"),
            Self::NotificationPosted => write!(f, "notification_posted"),
            Self::NotificationRemoved => write!(f, "notification_removed"),
            Self::ListenerDisconnected => write!(f, "listener_disconnected"),
        }
    }
}

/// Side effect the service performs for a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Start a new binding instance and log it.
    BeginBinding,
    /// Convert the notification and dispatch it.
    Forward,
    /// Log the callback; nothing is dispatched.
    Observe,
    /// Dispatch the terminal record.
    Terminate,
    /// Callback not valid in this state.
    Ignore,
}

/// Result of looking up a callback in the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: ServiceState,
    pub action: Action,
}

/// `(from, callback, to, action)` rows.
pub const TRANSITIONS: &[(ServiceState, LifecycleKind, ServiceState, Action)] = &[
    (
        ServiceState::Unbound,
        LifecycleKind::ListenerConnected,
        ServiceState::Connected,
        Action::BeginBinding,
    ),
    (
        ServiceState::Disconnected,
        LifecycleKind::ListenerConnected,
        ServiceState::Connected,
        Action::BeginBinding,
    ),
    (
        ServiceState::Connected,
        LifecycleKind::NotificationPosted,
        ServiceState::Connected,
        Action::Forward,
    ),
    (
        ServiceState::Connected,
        LifecycleKind::NotificationRemoved,
        ServiceState::Connected,
        Action::Observe,
    ),
    (
        ServiceState::Connected,
        LifecycleKind::ListenerDisconnected,
        ServiceState::Disconnected,
        Action::Terminate,
    ),
];

/// Look up the transition for `kind` arriving in `state`.
pub fn transition(state: ServiceState, kind: LifecycleKind) -> Transition {
    TRANSITIONS
        .iter()
        .find(|(from, k, _, _)| *from == state && *k == kind)
        .map_or(
            Transition {
                next: state,
                action: Action::Ignore,
            },
            |&(_, _, next, action)| Transition { next, action },
        )
}
