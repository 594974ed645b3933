//! Mock sinks for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use notify_relay_types::{EventRecord, Record};

use crate::error::SinkError;
use crate::EventSink;

// ---------------------------------------------------------------------------
// RecordingSink
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct RecordingState {
    records: Vec<Record>,
    fail_remaining: usize,
}

/// Sink that keeps every record it accepts.
///
/// Optionally rejects its first `n` deliveries, to model a consumer that
/// recovers after a transient failure.
pub struct RecordingSink {
    state: Arc<Mutex<RecordingState>>,
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSink {
    /// Create a sink that accepts everything.
    pub fn new() -> Self {
        Self::failing_first(0)
    }

    /// Create a sink that rejects its first `n` deliveries.
    pub fn failing_first(n: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(RecordingState {
                records: Vec::new(),
                fail_remaining: n,
            })),
        }
    }

    /// Get a clonable handle for observing accepted records from tests.
    pub fn handle(&self) -> RecordingHandle {
        RecordingHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl EventSink for RecordingSink {
    fn deliver(&self, record: Record) -> Result<(), SinkError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_remaining > 0 {
            state.fail_remaining -= 1;
            return Err(SinkError::Rejected("scripted failure".to_string()));
        }
        state.records.push(record);
        Ok(())
    }
}

/// Clonable observer handle for `RecordingSink`.
#[derive(Clone)]
pub struct RecordingHandle {
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingHandle {
    /// Snapshot of every accepted record.
    pub fn records(&self) -> Vec<Record> {
        self.state.lock().unwrap().records.clone()
    }

    /// Snapshot of accepted event records, terminal records excluded.
    pub fn events(&self) -> Vec<EventRecord> {
        self.state
            .lock()
            .unwrap()
            .records
            .iter()
            .filter_map(Record::as_event)
            .cloned()
            .collect()
    }

    /// Number of accepted terminal records.
    pub fn terminal_count(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .records
            .iter()
            .filter(|r| r.is_terminal())
            .count()
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().unwrap().records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// FailingSink / PanickingSink
// ---------------------------------------------------------------------------

/// Sink that rejects every record and counts the attempts.
#[derive(Default)]
pub struct FailingSink {
    attempts: Arc<AtomicUsize>,
}

impl FailingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared attempt counter.
    pub fn attempts(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.attempts)
    }
}

impl EventSink for FailingSink {
    fn deliver(&self, _record: Record) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SinkError::Closed)
    }
}

/// Sink whose handler panics on every record.
pub struct PanickingSink;

impl EventSink for PanickingSink {
    fn deliver(&self, _record: Record) -> Result<(), SinkError> {
        panic!("consumer handler blew up");
    }
}
