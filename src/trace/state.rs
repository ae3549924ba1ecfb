//! Model state contract and cumulative operation counters.

use serde::{Deserialize, Serialize};

/// Cumulative operation counters.
///
/// Reducers only ever increment these. They go back to zero only by returning
/// to the initial state at position `-1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Counters {
    pub comparisons: u64,
    pub swaps: u64,
    pub reads: u64,
    pub writes: u64,
}

impl Counters {
    /// True if every counter is at least the corresponding one in `earlier`.
    pub fn dominates(&self, earlier: &Counters) -> bool {
        self.comparisons >= earlier.comparisons
            && self.swaps >= earlier.swaps
            && self.reads >= earlier.reads
            && self.writes >= earlier.writes
    }

    /// Sum of all counters.
    pub fn total(&self) -> u64 {
        self.comparisons + self.swaps + self.reads + self.writes
    }
}

impl std::fmt::Display for Counters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "comparisons={} swaps={} reads={} writes={}",
            self.comparisons, self.swaps, self.reads, self.writes
        )
    }
}

/// A domain state value.
///
/// States are values: the engine never mutates one in place, and two states
/// are equal iff all their fields are equal.
pub trait ModelState: Clone + PartialEq + std::fmt::Debug {
    /// Cumulative counters at this state.
    fn counters(&self) -> Counters;

    /// Domain-level failure carried by the state (overflow, no path, ...).
    fn error(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominates() {
        let a = Counters {
            comparisons: 3,
            swaps: 1,
            reads: 6,
            writes: 2,
        };
        let b = Counters {
            comparisons: 4,
            ..a
        };

        assert!(b.dominates(&a));
        assert!(a.dominates(&a));
        assert!(!a.dominates(&b));
        assert_eq!(a.total(), 12);
    }
}
