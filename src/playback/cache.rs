//! Sparse snapshot cache bounding the cost of seeking.
//!
//! Checkpoints are captured every `interval` events during a single linear
//! pass over the trace. A seek starts from the greatest checkpoint at or before
//! the target and replays at most `interval` events.

use std::collections::BTreeMap;

use log::{debug, trace};

use crate::trace::{Event, INITIAL_POSITION, ModelState, Position, Reducer, last_position};

/// Default number of events between checkpoints.
pub const CACHE_INTERVAL: usize = 50;

/// Result of a cached seek.
#[derive(Debug, Clone, PartialEq)]
pub struct Seek<S> {
    /// State at the target position.
    pub state: S,
    /// Checkpoint the replay started from.
    pub from: Position,
    /// Number of reductions performed.
    pub replayed: usize,
}

/// Checkpoints keyed by logical position.
///
/// Position `-1` (the initial state) is always present. The map is never
/// updated incrementally; a new trace means a new cache.
#[derive(Debug, Clone)]
pub struct SnapshotCache<S> {
    interval: usize,
    initial: S,
    checkpoints: BTreeMap<Position, S>,
}

impl<S: ModelState> SnapshotCache<S> {
    /// Precompute checkpoints for `events` in one pass.
    ///
    /// After applying the event at index `i`, the state is stored if
    /// `(i + 1) % interval == 0`. An interval of zero is treated as one.
    pub fn build<R>(reducer: &R, initial: &S, events: &[Event<R::Kind>], interval: usize) -> Self
    where
        R: Reducer<State = S>,
    {
        let interval = interval.max(1);
        let mut checkpoints = BTreeMap::new();
        let mut state = initial.clone();

        for (i, event) in events.iter().enumerate() {
            state = reducer.reduce(&state, event);
            if (i + 1) % interval == 0 {
                checkpoints.insert(i as Position, state.clone());
            }
        }

        debug!(
            "Built snapshot cache: {} events, {} checkpoints (interval {})",
            events.len(),
            checkpoints.len() + 1,
            interval
        );

        Self {
            interval,
            initial: initial.clone(),
            checkpoints,
        }
    }

    /// Checkpoint stride.
    pub fn interval(&self) -> usize {
        self.interval
    }

    /// Number of stored checkpoints, including position `-1`.
    pub fn len(&self) -> usize {
        self.checkpoints.len() + 1
    }

    /// Always false: position `-1` is always stored.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Stored positions in ascending order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        std::iter::once(INITIAL_POSITION).chain(self.checkpoints.keys().copied())
    }

    /// State stored at exactly `position`, if any.
    pub fn get(&self, position: Position) -> Option<&S> {
        if position == INITIAL_POSITION {
            Some(&self.initial)
        } else {
            self.checkpoints.get(&position)
        }
    }

    /// Initial state (position `-1`).
    pub fn initial(&self) -> &S {
        &self.initial
    }

    /// Greatest checkpoint at or before `target`.
    pub fn nearest(&self, target: Position) -> (Position, &S) {
        self.checkpoints
            .range(..=target)
            .next_back()
            .map(|(&position, state)| (position, state))
            .unwrap_or((INITIAL_POSITION, &self.initial))
    }

    /// Compute the state at `target` by replaying from the nearest checkpoint.
    ///
    /// `target` is clamped into `[-1, events.len() - 1]`. `events` must be the
    /// trace this cache was built from.
    pub fn seek<R>(&self, reducer: &R, events: &[Event<R::Kind>], target: Position) -> Seek<S>
    where
        R: Reducer<State = S>,
    {
        let target = target.clamp(INITIAL_POSITION, last_position(events.len()));
        let (from, base) = self.nearest(target);

        let start = (from + 1) as usize;
        let end = (target + 1) as usize;
        let state = events[start..end]
            .iter()
            .fold(base.clone(), |state, event| reducer.reduce(&state, event));

        trace!(
            "Seek to {} from checkpoint {} ({} reductions)",
            target,
            from,
            end - start
        );

        Seek {
            state,
            from,
            replayed: end - start,
        }
    }
}
