//! Event envelope shared by every domain.

use serde::{Deserialize, Serialize};

/// Logical position within a trace. `-1` is the initial state.
pub type Position = isize;

/// Position of the initial state, before any event has been applied.
pub const INITIAL_POSITION: Position = -1;

/// An ordered list of events for one run.
pub type Trace<K> = Vec<Event<K>>;

/// Last valid position for a trace of `len` events (`-1` when empty).
#[inline]
pub fn last_position(len: usize) -> Position {
    len as Position - 1
}

/// Domain payload carried inside an [`Event`] envelope.
///
/// Every variant must be interpretable on its own: a payload never refers to
/// the previous event in the trace.
pub trait EventKind: Clone + std::fmt::Debug {
    /// Stable discriminant tag (e.g. `"compare"`).
    fn tag(&self) -> &'static str;
}

/// One discrete state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event<K> {
    /// Domain payload.
    pub kind: K,
    /// Human-readable description of the step.
    pub description: String,
    /// Highlighted pseudocode line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Element indices being inspected by this step.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub active: Vec<usize>,
    /// Element indices written by this step.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modified: Vec<usize>,
}

impl<K: EventKind> Event<K> {
    /// Create an event with no highlighting hints.
    pub fn new(kind: K, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            line: None,
            active: Vec::new(),
            modified: Vec::new(),
        }
    }

    /// Attach the pseudocode line this event corresponds to.
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Attach indices to highlight as active.
    pub fn with_active(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.active = indices.into_iter().collect();
        self
    }

    /// Attach indices to highlight as modified.
    pub fn with_modified(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.modified = indices.into_iter().collect();
        self
    }

    /// Discriminant tag of the payload.
    #[inline]
    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }
}
