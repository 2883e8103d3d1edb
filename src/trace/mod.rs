//! Raw execution traces and the trace-file adapter.
//!
//! One completed run of the target program produces one raw trace: an
//! ordered log of `(threadId, locationId)` observations. Order within a
//! trace is the temporal order of observation and is significant; traces
//! are immutable once read.

mod reader;

pub use reader::{parse_trace, read_trace_dir, read_trace_file};

/// A single observation from the target program: which thread passed
/// which program location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    pub thread_id: i64,
    pub location_id: String,
}

/// The ordered event log of one execution of the target program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTrace {
    /// Label identifying where the trace came from (usually the file name).
    pub source: String,
    /// Events in temporal order of observation.
    pub events: Vec<TraceEvent>,
}

impl RawTrace {
    /// Creates a trace from already-materialized events.
    pub fn new(source: impl Into<String>, events: Vec<TraceEvent>) -> Self {
        Self {
            source: source.into(),
            events,
        }
    }

    /// Number of events in the trace.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the trace holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Distinct thread ids in order of first appearance.
    pub fn thread_ids_in_order(&self) -> Vec<i64> {
        let mut seen = Vec::new();
        for event in &self.events {
            if !seen.contains(&event.thread_id) {
                seen.push(event.thread_id);
            }
        }
        seen
    }

    /// Number of distinct threads observed in the trace.
    pub fn distinct_thread_count(&self) -> usize {
        self.thread_ids_in_order().len()
    }
}
