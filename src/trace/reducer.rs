//! Reducer contract.

use super::event::{Event, EventKind, Position};
use super::state::ModelState;
use crate::view::ViewModel;

/// Pure `(state, event) -> state` function for one domain.
///
/// Implementations must be total over `Self::Kind`, deterministic and free of
/// side effects. The snapshot cache relies on this: replaying the same prefix
/// from the same initial state must always produce an equal state.
///
/// Two bookend conventions apply to every domain: an `Initialize` event
/// replaces the modeled structure, and a `Complete` event marks the terminal
/// visual state.
pub trait Reducer {
    type Kind: EventKind;
    type State: ModelState;

    /// Apply one event, returning the new state.
    fn reduce(&self, state: &Self::State, event: &Event<Self::Kind>) -> Self::State;
}

/// A reducer that also knows how to project its state for rendering.
pub trait Domain: Reducer {
    /// Derive the renderer-facing view model. Never stored.
    fn view(&self, state: &Self::State) -> ViewModel;
}

/// Reduce `events[..=through]` from `initial` without any cache.
///
/// `through` is clamped into `[-1, len - 1]`. This is the brute-force baseline
/// the snapshot cache must agree with.
pub fn replay<R: Reducer>(
    reducer: &R,
    initial: &R::State,
    events: &[Event<R::Kind>],
    through: Position,
) -> R::State {
    let end = (through + 1).clamp(0, events.len() as Position) as usize;
    events[..end]
        .iter()
        .fold(initial.clone(), |state, event| reducer.reduce(&state, event))
}
