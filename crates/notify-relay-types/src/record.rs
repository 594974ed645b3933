//! Records delivered to the subscriber.
//!
//! Two payload shapes travel over the event channel: an [`EventRecord`] per
//! posted notification, and a single [`TerminalRecord`] when the host revokes
//! the listener binding.

use serde::{Deserialize, Serialize};

/// One posted notification, reduced to the fields the consumer cares about.
///
/// Fields are private so a record cannot be altered after the codec built it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Package that posted the notification.
    #[serde(rename = "packageName")]
    source_id: String,
    title: Option<String>,
    /// Body text, named `text` on the wire.
    #[serde(rename = "text")]
    body: Option<String>,
    /// Post time in milliseconds since the epoch.
    timestamp: i64,
}

impl EventRecord {
    #[must_use]
    pub fn new(
        source_id: impl Into<String>,
        title: Option<String>,
        body: Option<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            title,
            body,
            timestamp,
        }
    }

    #[must_use]
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    #[must_use]
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// Status carried by a terminal record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalStatus {
    /// The host unbound the listener service.
    DisconnectedServiceSide,
}

impl std::fmt::Display for TerminalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DisconnectedServiceSide => write!(f, "disconnected_service_side"),
        }
    }
}

/// Sentinel delivered in place of an event record when the binding ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalRecord {
    pub status: TerminalStatus,
}

impl TerminalRecord {
    #[must_use]
    pub fn new(status: TerminalStatus) -> Self {
        Self { status }
    }
}

/// Anything that can be dispatched to the subscriber.
///
/// Serialized untagged so the consumer sees either the event shape or the
/// `{"status": ...}` shape directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Record {
    Event(EventRecord),
    Terminal(TerminalRecord),
}

impl Record {
    /// Whether this is the terminal sentinel.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }

    /// The event record, if this is one.
    #[must_use]
    pub fn as_event(&self) -> Option<&EventRecord> {
        match self {
            Self::Event(event) => Some(event),
            Self::Terminal(_) => None,
        }
    }
}

impl From<EventRecord> for Record {
    fn from(event: EventRecord) -> Self {
        Self::Event(event)
    }
}

impl From<TerminalRecord> for Record {
    fn from(terminal: TerminalRecord) -> Self {
        Self::Terminal(terminal)
    }
}

impl From<TerminalStatus> for Record {
    fn from(status: TerminalStatus) -> Self {
        Self::Terminal(TerminalRecord::new(status))
    }
}
