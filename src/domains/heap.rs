//! Binary min-heap domain with insert/extract producers.

use serde::{Deserialize, Serialize};

use crate::trace::{
    Counters, Domain, Event, EventKind, ModelState, Recording, Reducer, TraceRecorder,
};
use crate::view::{Mark, TreeNode, ViewModel};

pub const HEAP_OPERATIONS: &[&str] = &[
    "insert(x): a.append(x); i = n - 1",
    "  while i > 0 and a[i] < a[parent(i)]:",
    "    swap(a[i], a[parent(i)]); i = parent(i)",
    "extract(): if n == 0: underflow",
    "  min = a[0]; a[0] = a[n-1]; n = n - 1",
    "  while the smaller child c of i is < a[i]:",
    "    swap(a[i], a[c]); i = c",
];

/// Scripted input operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum HeapOp {
    Insert(i64),
    ExtractMin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HeapEvent {
    Initialize { values: Vec<i64> },
    /// Append a value as the last leaf.
    Append { value: i64 },
    Compare { i: usize, j: usize },
    Swap { i: usize, j: usize },
    /// Remove the root and move the last leaf into its place.
    Extract { value: i64 },
    Underflow,
    Complete,
}

impl EventKind for HeapEvent {
    fn tag(&self) -> &'static str {
        match self {
            HeapEvent::Initialize { .. } => "initialize",
            HeapEvent::Append { .. } => "append",
            HeapEvent::Compare { .. } => "compare",
            HeapEvent::Swap { .. } => "swap",
            HeapEvent::Extract { .. } => "extract",
            HeapEvent::Underflow => "underflow",
            HeapEvent::Complete => "complete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeapState {
    /// Heap array in level order.
    pub values: Vec<i64>,
    /// Values removed so far, in extraction order.
    pub extracted: Vec<i64>,
    pub error: Option<String>,
    pub complete: bool,
    pub counters: Counters,
}

impl HeapState {
    pub fn new(values: Vec<i64>) -> Self {
        Self {
            values,
            extracted: Vec::new(),
            error: None,
            complete: false,
            counters: Counters::default(),
        }
    }
}

impl ModelState for HeapState {
    fn counters(&self) -> Counters {
        self.counters
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeapDomain;

impl Reducer for HeapDomain {
    type Kind = HeapEvent;
    type State = HeapState;

    fn reduce(&self, state: &HeapState, event: &Event<HeapEvent>) -> HeapState {
        let mut next = state.clone();
        let len = next.values.len();

        match &event.kind {
            HeapEvent::Initialize { values } => {
                next = HeapState {
                    counters: state.counters,
                    ..HeapState::new(values.clone())
                };
            }
            HeapEvent::Append { value } => {
                next.values.push(*value);
                next.counters.writes += 1;
            }
            HeapEvent::Compare { .. } => {
                next.counters.comparisons += 1;
                next.counters.reads += 2;
            }
            HeapEvent::Swap { i, j } => {
                if *i < len && *j < len {
                    next.values.swap(*i, *j);
                }
                next.counters.swaps += 1;
                next.counters.writes += 2;
            }
            HeapEvent::Extract { value } => {
                if !next.values.is_empty() {
                    next.values.swap_remove(0);
                    next.extracted.push(*value);
                }
                next.counters.reads += 1;
                next.counters.writes += 1;
            }
            HeapEvent::Underflow => {
                next.error = Some(UNDERFLOW.to_string());
            }
            HeapEvent::Complete => {
                next.complete = true;
            }
        }

        next
    }
}

impl Domain for HeapDomain {
    fn view(&self, state: &HeapState) -> ViewModel {
        let nodes = state
            .values
            .iter()
            .enumerate()
            .map(|(index, &value)| TreeNode {
                index,
                value,
                parent: parent(index),
                depth: depth(index),
                mark: if state.error.is_some() {
                    Mark::Error
                } else {
                    Mark::Idle
                },
            })
            .collect();
        ViewModel::Tree {
            nodes,
            error: state.error.clone(),
        }
    }
}

const UNDERFLOW: &str = "Heap underflow: cannot extract from an empty heap";

fn parent(index: usize) -> Option<usize> {
    (index > 0).then(|| (index - 1) / 2)
}

fn depth(index: usize) -> usize {
    (usize::BITS - (index + 1).leading_zeros() - 1) as usize
}

/// Record `ops` against an initially empty min-heap.
///
/// Extracting from an empty heap is terminal.
pub fn run_operations(ops: &[HeapOp]) -> Recording<HeapEvent, HeapState> {
    let mut a: Vec<i64> = Vec::new();
    let mut recorder = TraceRecorder::new();

    for op in ops {
        match *op {
            HeapOp::Insert(value) => {
                a.push(value);
                let mut i = a.len() - 1;
                recorder.record(
                    Event::new(HeapEvent::Append { value }, format!("Insert {value}"))
                        .at_line(0)
                        .with_modified([i]),
                );
                while let Some(p) = parent(i) {
                    recorder.record(
                        Event::new(
                            HeapEvent::Compare { i, j: p },
                            format!("Compare {} with parent {}", a[i], a[p]),
                        )
                        .at_line(1)
                        .with_active([i, p]),
                    );
                    if a[i] >= a[p] {
                        break;
                    }
                    recorder.record(
                        Event::new(
                            HeapEvent::Swap { i, j: p },
                            format!("Sift {} up", a[i]),
                        )
                        .at_line(2)
                        .with_modified([i, p]),
                    );
                    a.swap(i, p);
                    i = p;
                }
            }
            HeapOp::ExtractMin => {
                let Some(&min) = a.first() else {
                    recorder.record(Event::new(HeapEvent::Underflow, UNDERFLOW).at_line(3));
                    return recorder.finish(HeapState::new(Vec::new()));
                };
                a.swap_remove(0);
                recorder.record(
                    Event::new(HeapEvent::Extract { value: min }, format!("Extract minimum {min}"))
                        .at_line(4)
                        .with_modified([0]),
                );
                sift_down(&mut a, &mut recorder);
            }
        }
    }

    recorder.record(Event::new(HeapEvent::Complete, "All operations done"));
    recorder.finish(HeapState::new(Vec::new()))
}

fn sift_down(a: &mut [i64], recorder: &mut TraceRecorder<HeapEvent>) {
    let n = a.len();
    let mut i = 0;
    loop {
        let mut smallest = i;
        for child in [2 * i + 1, 2 * i + 2] {
            if child >= n {
                continue;
            }
            recorder.record(
                Event::new(
                    HeapEvent::Compare {
                        i: child,
                        j: smallest,
                    },
                    format!("Compare {} with {}", a[child], a[smallest]),
                )
                .at_line(5)
                .with_active([child, smallest]),
            );
            if a[child] < a[smallest] {
                smallest = child;
            }
        }
        if smallest == i {
            return;
        }
        recorder.record(
            Event::new(
                HeapEvent::Swap { i, j: smallest },
                format!("Sift {} down", a[i]),
            )
            .at_line(6)
            .with_modified([i, smallest]),
        );
        a.swap(i, smallest);
        i = smallest;
    }
}
