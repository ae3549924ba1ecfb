//! Sorting event producers.
//!
//! Each producer sorts a private working copy and records one event per
//! observable operation. The trace always ends with [`ArrayEvent::Complete`].

use serde::{Deserialize, Serialize};

use super::array::{ArrayEvent, ArrayState};
use crate::trace::{Event, Recording, TraceRecorder};

pub const BUBBLE_SORT: &[&str] = &[
    "for i in 0..n-1:",
    "  swapped = false",
    "  for j in 0..n-1-i:",
    "    if a[j] > a[j+1]:",
    "      swap(a[j], a[j+1])",
    "      swapped = true",
    "  mark a[n-1-i] sorted",
    "  if not swapped: break",
];

pub const INSERTION_SORT: &[&str] = &[
    "for i in 1..n:",
    "  key = a[i]",
    "  j = i",
    "  while j > 0 and a[j-1] > key:",
    "    a[j] = a[j-1]",
    "    j = j - 1",
    "  a[j] = key",
];

pub const SELECTION_SORT: &[&str] = &[
    "for i in 0..n-1:",
    "  min = i",
    "  for j in i+1..n:",
    "    if a[j] < a[min]: min = j",
    "  swap(a[i], a[min])",
    "  mark a[i] sorted",
];

pub const QUICK_SORT: &[&str] = &[
    "quicksort(lo, hi):",
    "  if lo >= hi: return",
    "  pivot = a[hi]",
    "  i = lo",
    "  for j in lo..hi:",
    "    if a[j] < pivot:",
    "      swap(a[i], a[j]); i = i + 1",
    "  swap(a[i], a[hi])",
    "  quicksort(lo, i-1); quicksort(i+1, hi)",
];

/// Available sorting producers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortAlgorithm {
    Bubble,
    Insertion,
    Selection,
    Quick,
}

impl SortAlgorithm {
    pub const ALL: [SortAlgorithm; 4] = [
        SortAlgorithm::Bubble,
        SortAlgorithm::Insertion,
        SortAlgorithm::Selection,
        SortAlgorithm::Quick,
    ];

    /// Record the trace for sorting `values`.
    pub fn run(self, values: &[i64]) -> Recording<ArrayEvent, ArrayState> {
        match self {
            SortAlgorithm::Bubble => bubble_sort(values),
            SortAlgorithm::Insertion => insertion_sort(values),
            SortAlgorithm::Selection => selection_sort(values),
            SortAlgorithm::Quick => quick_sort(values),
        }
    }

    pub fn pseudocode(self) -> &'static [&'static str] {
        match self {
            SortAlgorithm::Bubble => BUBBLE_SORT,
            SortAlgorithm::Insertion => INSERTION_SORT,
            SortAlgorithm::Selection => SELECTION_SORT,
            SortAlgorithm::Quick => QUICK_SORT,
        }
    }
}

fn compare(a: &[i64], i: usize, j: usize, line: usize) -> Event<ArrayEvent> {
    Event::new(
        ArrayEvent::Compare { i, j },
        format!("Compare {} and {}", a[i], a[j]),
    )
    .at_line(line)
    .with_active([i, j])
}

fn swap(a: &[i64], i: usize, j: usize, line: usize) -> Event<ArrayEvent> {
    Event::new(
        ArrayEvent::Swap { i, j },
        format!("Swap {} and {}", a[i], a[j]),
    )
    .at_line(line)
    .with_active([i, j])
    .with_modified([i, j])
}

fn mark_sorted(a: &[i64], index: usize, line: usize) -> Event<ArrayEvent> {
    Event::new(
        ArrayEvent::MarkSorted {
            indices: vec![index],
        },
        format!("{} is in its final position", a[index]),
    )
    .at_line(line)
    .with_active([index])
}

fn complete() -> Event<ArrayEvent> {
    Event::new(ArrayEvent::Complete, "Array sorted")
}

/// Bubble sort with early exit.
pub fn bubble_sort(values: &[i64]) -> Recording<ArrayEvent, ArrayState> {
    let mut a = values.to_vec();
    let n = a.len();
    let mut recorder = TraceRecorder::new();

    for i in 0..n.saturating_sub(1) {
        let mut swapped = false;
        for j in 0..n - 1 - i {
            recorder.record(compare(&a, j, j + 1, 3));
            if a[j] > a[j + 1] {
                recorder.record(swap(&a, j, j + 1, 4));
                a.swap(j, j + 1);
                swapped = true;
            }
        }
        recorder.record(mark_sorted(&a, n - 1 - i, 6));
        if !swapped {
            break;
        }
    }

    recorder.record(complete());
    recorder.finish(ArrayState::new(values.to_vec()))
}

/// Insertion sort by shifting larger elements right.
pub fn insertion_sort(values: &[i64]) -> Recording<ArrayEvent, ArrayState> {
    let mut a = values.to_vec();
    let n = a.len();
    let mut recorder = TraceRecorder::new();

    for i in 1..n {
        let key = a[i];
        let mut j = i;
        while j > 0 {
            recorder.record(
                Event::new(
                    ArrayEvent::Compare { i: j - 1, j },
                    format!("Compare {} with key {}", a[j - 1], key),
                )
                .at_line(3)
                .with_active([j - 1, j]),
            );
            if a[j - 1] <= key {
                break;
            }
            recorder.record(
                Event::new(
                    ArrayEvent::Overwrite {
                        index: j,
                        value: a[j - 1],
                    },
                    format!("Shift {} right", a[j - 1]),
                )
                .at_line(4)
                .with_active([j - 1])
                .with_modified([j]),
            );
            a[j] = a[j - 1];
            j -= 1;
        }
        if j != i {
            recorder.record(
                Event::new(
                    ArrayEvent::Overwrite {
                        index: j,
                        value: key,
                    },
                    format!("Insert {} at index {}", key, j),
                )
                .at_line(6)
                .with_modified([j]),
            );
            a[j] = key;
        }
    }

    recorder.record(complete());
    recorder.finish(ArrayState::new(values.to_vec()))
}

/// Selection sort. The current minimum is shown as the pivot.
pub fn selection_sort(values: &[i64]) -> Recording<ArrayEvent, ArrayState> {
    let mut a = values.to_vec();
    let n = a.len();
    let mut recorder = TraceRecorder::new();

    for i in 0..n.saturating_sub(1) {
        let mut min = i;
        recorder.record(
            Event::new(
                ArrayEvent::Pivot { index: i },
                format!("Assume {} is the minimum", a[i]),
            )
            .at_line(1)
            .with_active([i]),
        );
        for j in i + 1..n {
            recorder.record(compare(&a, j, min, 3));
            if a[j] < a[min] {
                min = j;
                recorder.record(
                    Event::new(
                        ArrayEvent::Pivot { index: j },
                        format!("New minimum {}", a[j]),
                    )
                    .at_line(3)
                    .with_active([j]),
                );
            }
        }
        if min != i {
            recorder.record(swap(&a, i, min, 4));
            a.swap(i, min);
        }
        recorder.record(mark_sorted(&a, i, 5));
    }

    recorder.record(complete());
    recorder.finish(ArrayState::new(values.to_vec()))
}

/// Quick sort with Lomuto partitioning, recursion unrolled onto a stack.
pub fn quick_sort(values: &[i64]) -> Recording<ArrayEvent, ArrayState> {
    let mut a = values.to_vec();
    let n = a.len();
    let mut recorder = TraceRecorder::new();

    // Inclusive (lo, hi) ranges; left partitions are popped first.
    let mut pending: Vec<(usize, usize)> = Vec::new();
    if n > 0 {
        pending.push((0, n - 1));
    }

    while let Some((lo, hi)) = pending.pop() {
        if lo == hi {
            recorder.record(mark_sorted(&a, lo, 1));
            continue;
        }

        let pivot = a[hi];
        recorder.record(
            Event::new(
                ArrayEvent::Pivot { index: hi },
                format!("Pivot {}", pivot),
            )
            .at_line(2)
            .with_active([hi]),
        );

        let mut i = lo;
        for j in lo..hi {
            recorder.record(compare(&a, j, hi, 5));
            if a[j] < pivot {
                if i != j {
                    recorder.record(swap(&a, i, j, 6));
                    a.swap(i, j);
                }
                i += 1;
            }
        }
        if i != hi {
            recorder.record(swap(&a, i, hi, 7));
            a.swap(i, hi);
        }
        recorder.record(mark_sorted(&a, i, 7));

        if i < hi {
            pending.push((i + 1, hi));
        }
        if i > lo {
            pending.push((lo, i - 1));
        }
    }

    recorder.record(complete());
    recorder.finish(ArrayState::new(values.to_vec()))
}
