//! Bounded stack domain and its operation-script producer.

use serde::{Deserialize, Serialize};

use crate::trace::{
    Counters, Domain, Event, EventKind, ModelState, Recording, Reducer, TraceRecorder,
};
use crate::view::{Bar, Mark, ViewModel};

pub const STACK_OPERATIONS: &[&str] = &[
    "push(x): if top == capacity: overflow",
    "         a[top] = x; top = top + 1",
    "pop():   if top == 0: underflow",
    "         top = top - 1; return a[top]",
    "peek():  if top == 0: underflow",
    "         return a[top-1]",
];

/// Scripted input operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum StackOp {
    Push(i64),
    Pop,
    Peek,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StackEvent {
    Initialize { capacity: usize, items: Vec<i64> },
    Push { value: i64 },
    Pop { value: i64 },
    Peek { value: i64 },
    Overflow { value: i64 },
    Underflow,
    Complete,
}

impl EventKind for StackEvent {
    fn tag(&self) -> &'static str {
        match self {
            StackEvent::Initialize { .. } => "initialize",
            StackEvent::Push { .. } => "push",
            StackEvent::Pop { .. } => "pop",
            StackEvent::Peek { .. } => "peek",
            StackEvent::Overflow { .. } => "overflow",
            StackEvent::Underflow => "underflow",
            StackEvent::Complete => "complete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackState {
    pub items: Vec<i64>,
    pub capacity: usize,
    pub error: Option<String>,
    pub complete: bool,
    pub counters: Counters,
}

impl StackState {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
            error: None,
            complete: false,
            counters: Counters::default(),
        }
    }
}

impl ModelState for StackState {
    fn counters(&self) -> Counters {
        self.counters
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StackDomain;

impl Reducer for StackDomain {
    type Kind = StackEvent;
    type State = StackState;

    fn reduce(&self, state: &StackState, event: &Event<StackEvent>) -> StackState {
        let mut next = state.clone();

        match &event.kind {
            StackEvent::Initialize { capacity, items } => {
                next = StackState {
                    items: items.clone(),
                    counters: state.counters,
                    ..StackState::new(*capacity)
                };
            }
            StackEvent::Push { value } => {
                next.counters.comparisons += 1;
                if next.items.len() < next.capacity {
                    next.items.push(*value);
                    next.counters.writes += 1;
                } else {
                    next.error = Some(overflow_message(*value));
                }
            }
            StackEvent::Pop { .. } => {
                next.counters.comparisons += 1;
                if next.items.pop().is_some() {
                    next.counters.reads += 1;
                } else {
                    next.error = Some(UNDERFLOW.to_string());
                }
            }
            StackEvent::Peek { .. } => {
                next.counters.comparisons += 1;
                next.counters.reads += 1;
            }
            StackEvent::Overflow { value } => {
                next.counters.comparisons += 1;
                next.error = Some(overflow_message(*value));
            }
            StackEvent::Underflow => {
                next.counters.comparisons += 1;
                next.error = Some(UNDERFLOW.to_string());
            }
            StackEvent::Complete => {
                next.complete = true;
            }
        }

        next
    }
}

impl Domain for StackDomain {
    fn view(&self, state: &StackState) -> ViewModel {
        let mark = if state.error.is_some() {
            Mark::Error
        } else if state.complete {
            Mark::Sorted
        } else {
            Mark::Idle
        };
        ViewModel::Stack {
            cells: state
                .items
                .iter()
                .map(|&value| Bar { value, mark })
                .collect(),
            capacity: state.capacity,
            error: state.error.clone(),
        }
    }
}

const UNDERFLOW: &str = "Stack underflow: the stack is empty";

fn overflow_message(value: i64) -> String {
    format!("Stack overflow: cannot push {value}, the stack is full")
}

/// Record `ops` against a stack of `capacity`.
///
/// Overflow and underflow are terminal: the trace ends with the error event
/// and the remaining operations are not recorded.
pub fn run_operations(capacity: usize, ops: &[StackOp]) -> Recording<StackEvent, StackState> {
    let mut items: Vec<i64> = Vec::new();
    let mut recorder = TraceRecorder::new();

    for op in ops {
        match *op {
            StackOp::Push(value) => {
                if items.len() >= capacity {
                    recorder.record(
                        Event::new(StackEvent::Overflow { value }, overflow_message(value))
                            .at_line(0),
                    );
                    return recorder.finish(StackState::new(capacity));
                }
                let top = items.len();
                items.push(value);
                recorder.record(
                    Event::new(StackEvent::Push { value }, format!("Push {value}"))
                        .at_line(1)
                        .with_modified([top]),
                );
            }
            StackOp::Pop => {
                let Some(value) = items.pop() else {
                    recorder.record(Event::new(StackEvent::Underflow, UNDERFLOW).at_line(2));
                    return recorder.finish(StackState::new(capacity));
                };
                recorder.record(
                    Event::new(StackEvent::Pop { value }, format!("Pop {value}"))
                        .at_line(3)
                        .with_active([items.len()]),
                );
            }
            StackOp::Peek => {
                let Some(&value) = items.last() else {
                    recorder.record(Event::new(StackEvent::Underflow, UNDERFLOW).at_line(4));
                    return recorder.finish(StackState::new(capacity));
                };
                recorder.record(
                    Event::new(StackEvent::Peek { value }, format!("Peek {value}"))
                        .at_line(5)
                        .with_active([items.len() - 1]),
                );
            }
        }
    }

    recorder.record(Event::new(StackEvent::Complete, "All operations done"));
    recorder.finish(StackState::new(capacity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::replay;

    fn final_state(recording: &Recording<StackEvent, StackState>) -> StackState {
        replay(
            &StackDomain,
            &recording.initial,
            &recording.events,
            recording.events.len() as isize - 1,
        )
    }

    #[test]
    fn test_push_pop_sequence() {
        let recording = run_operations(
            3,
            &[StackOp::Push(1), StackOp::Push(2), StackOp::Pop, StackOp::Peek],
        );
        let state = final_state(&recording);

        assert_eq!(state.items, vec![1]);
        assert!(state.complete);
        assert!(state.error.is_none());
        assert_eq!(state.counters.writes, 2);
        assert_eq!(state.counters.reads, 2);
    }

    #[test]
    fn test_overflow_is_terminal() {
        let recording = run_operations(
            1,
            &[StackOp::Push(1), StackOp::Push(2), StackOp::Push(3)],
        );
        let tags: Vec<&str> = recording.events.iter().map(|e| e.tag()).collect();
        assert_eq!(tags, vec!["push", "overflow"]);

        let state = final_state(&recording);
        assert_eq!(state.items, vec![1]);
        assert!(state.error().unwrap().contains("overflow"));
        assert!(!state.complete);
    }

    #[test]
    fn test_underflow_is_terminal() {
        let recording = run_operations(2, &[StackOp::Pop, StackOp::Push(1)]);
        assert_eq!(recording.events.len(), 1);
        let state = final_state(&recording);
        assert!(state.error().unwrap().contains("underflow"));

        let ViewModel::Stack { error, .. } = StackDomain.view(&state) else {
            panic!("expected stack view");
        };
        assert!(error.is_some());
    }

    #[test]
    fn test_op_serde() {
        let ops: Vec<StackOp> =
            serde_json::from_str(r#"[{"op":"push","value":4},{"op":"pop"},{"op":"peek"}]"#)
                .unwrap();
        assert_eq!(ops, vec![StackOp::Push(4), StackOp::Pop, StackOp::Peek]);
    }

    #[test]
    fn test_initialize_replaces_items() {
        let state = StackState::new(2);
        let next = StackDomain.reduce(
            &state,
            &Event::new(
                StackEvent::Initialize {
                    capacity: 4,
                    items: vec![7, 8],
                },
                "",
            ),
        );
        assert_eq!(next.items, vec![7, 8]);
        assert_eq!(next.capacity, 4);
    }
}
