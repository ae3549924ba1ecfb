//! Trace recorder used by event producers.

use super::event::{Event, EventKind, Trace};

/// Output of an event producer: the initial state plus the full trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording<K, S> {
    pub initial: S,
    pub events: Trace<K>,
}

impl<K, S> Recording<K, S> {
    /// Number of events in the trace.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the trace has no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Append-only event sink for producers.
///
/// Usage:
/// ```ignore
/// let mut recorder = TraceRecorder::new();
/// recorder.record(Event::new(ArrayEvent::Compare { i: 0, j: 1 }, "Compare 3 and 1"));
/// let recording = recorder.finish(ArrayState::new(values));
/// ```
#[derive(Debug)]
pub struct TraceRecorder<K> {
    events: Trace<K>,
}

impl<K: EventKind> Default for TraceRecorder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EventKind> TraceRecorder<K> {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append one event.
    pub fn record(&mut self, event: Event<K>) {
        self.events.push(event);
    }

    /// Number of events recorded so far.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Seal the trace together with the state it starts from.
    pub fn finish<S>(self, initial: S) -> Recording<K, S> {
        Recording {
            initial,
            events: self.events,
        }
    }
}
