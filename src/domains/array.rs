//! Array domain: events, state and reducer shared by the sorting producers.

use serde::{Deserialize, Serialize};

use crate::trace::{Counters, Domain, Event, EventKind, ModelState, Reducer};
use crate::view::{Bar, Mark, ViewModel};

/// Array operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArrayEvent {
    /// Replace the array contents.
    Initialize { values: Vec<i64> },
    /// Compare the values at two indices.
    Compare { i: usize, j: usize },
    /// Exchange the values at two indices.
    Swap { i: usize, j: usize },
    /// Store `value` at `index`.
    Overwrite { index: usize, value: i64 },
    /// Select the pivot for a partition step.
    Pivot { index: usize },
    /// Mark indices as being in their final position.
    MarkSorted { indices: Vec<usize> },
    /// Terminal event: the whole array is sorted.
    Complete,
}

impl EventKind for ArrayEvent {
    fn tag(&self) -> &'static str {
        match self {
            ArrayEvent::Initialize { .. } => "initialize",
            ArrayEvent::Compare { .. } => "compare",
            ArrayEvent::Swap { .. } => "swap",
            ArrayEvent::Overwrite { .. } => "overwrite",
            ArrayEvent::Pivot { .. } => "pivot",
            ArrayEvent::MarkSorted { .. } => "mark_sorted",
            ArrayEvent::Complete => "complete",
        }
    }
}

/// Array contents plus visual annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrayState {
    pub values: Vec<i64>,
    pub sorted: Vec<bool>,
    pub pivot: Option<usize>,
    pub complete: bool,
    pub counters: Counters,
}

impl ArrayState {
    /// Fresh state for `values` with zeroed counters.
    pub fn new(values: Vec<i64>) -> Self {
        let len = values.len();
        Self {
            values,
            sorted: vec![false; len],
            pivot: None,
            complete: false,
            counters: Counters::default(),
        }
    }
}

impl ModelState for ArrayState {
    fn counters(&self) -> Counters {
        self.counters
    }
}

/// Reducer for [`ArrayEvent`].
///
/// Out-of-range indices are ignored for the structural change but still
/// counted; they can only come from a producer defect.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayDomain;

impl Reducer for ArrayDomain {
    type Kind = ArrayEvent;
    type State = ArrayState;

    fn reduce(&self, state: &ArrayState, event: &Event<ArrayEvent>) -> ArrayState {
        let mut next = state.clone();
        let len = next.values.len();

        match &event.kind {
            ArrayEvent::Initialize { values } => {
                // Counters carry over so they stay monotonic across the trace.
                next = ArrayState {
                    counters: state.counters,
                    ..ArrayState::new(values.clone())
                };
            }
            ArrayEvent::Compare { .. } => {
                next.counters.comparisons += 1;
                next.counters.reads += 2;
            }
            ArrayEvent::Swap { i, j } => {
                if *i < len && *j < len {
                    next.values.swap(*i, *j);
                    // The pivot marker follows its value.
                    if next.pivot == Some(*i) {
                        next.pivot = Some(*j);
                    } else if next.pivot == Some(*j) {
                        next.pivot = Some(*i);
                    }
                }
                next.counters.swaps += 1;
                next.counters.reads += 2;
                next.counters.writes += 2;
            }
            ArrayEvent::Overwrite { index, value } => {
                if let Some(slot) = next.values.get_mut(*index) {
                    *slot = *value;
                }
                next.counters.writes += 1;
            }
            ArrayEvent::Pivot { index } => {
                next.pivot = (*index < len).then_some(*index);
                next.counters.reads += 1;
            }
            ArrayEvent::MarkSorted { indices } => {
                for &index in indices {
                    if let Some(flag) = next.sorted.get_mut(index) {
                        *flag = true;
                    }
                    if next.pivot == Some(index) {
                        next.pivot = None;
                    }
                }
            }
            ArrayEvent::Complete => {
                next.sorted.iter_mut().for_each(|flag| *flag = true);
                next.pivot = None;
                next.complete = true;
            }
        }

        next
    }
}

impl Domain for ArrayDomain {
    fn view(&self, state: &ArrayState) -> ViewModel {
        let bars = state
            .values
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                let mark = if state.sorted[i] {
                    Mark::Sorted
                } else if state.pivot == Some(i) {
                    Mark::Pivot
                } else {
                    Mark::Idle
                };
                Bar { value, mark }
            })
            .collect();
        ViewModel::Bars { bars }
    }
}
