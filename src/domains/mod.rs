//! Domains - Event producers and reducers for concrete algorithms.
//!
//! Each domain defines its event payload, its model state and a reducer
//! implementing [`crate::trace::Domain`]. Producers are plain functions from
//! an input to a [`crate::trace::Recording`]; they never talk to the player.

pub mod array;
pub mod graph;
pub mod heap;
pub mod search;
pub mod sorting;
pub mod stack;

pub use array::{ArrayDomain, ArrayEvent, ArrayState};
pub use graph::{Edge, Graph, GraphDomain, GraphEvent, GraphState};
pub use heap::{HeapDomain, HeapEvent, HeapOp, HeapState};
pub use search::GraphSearch;
pub use sorting::SortAlgorithm;
pub use stack::{StackDomain, StackEvent, StackOp, StackState};
