//! Trace module - Event envelope, model state and reducer contract.
//!
//! A trace is the ordered, immutable list of events recorded for one run of an
//! algorithm. The state at any logical position is defined purely as the fold
//! of the reducer over the trace prefix, starting from the initial state:
//!
//! ```text
//! state(-1) = initial
//! state(i)  = reduce(state(i - 1), events[i])
//! ```
//!
//! Producers record traces with [`TraceRecorder`]; the playback engine only
//! ever consumes a [`Recording`] and a [`Reducer`].

mod event;
mod recorder;
mod reducer;
mod state;

pub use event::{Event, EventKind, INITIAL_POSITION, Position, Trace, last_position};
pub use recorder::{Recording, TraceRecorder};
pub use reducer::{Domain, Reducer, replay};
pub use state::{Counters, ModelState};
