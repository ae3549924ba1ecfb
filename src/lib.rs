//! Algo Replay - Seekable playback of algorithm execution traces.
//!
//! Algorithms run once, eagerly, and record a trace of semantic events.
//! A pure reducer folds those events into model state, so any position in
//! the trace can be reconstructed deterministically. A periodic snapshot
//! cache bounds the cost of every seek.
//!
//! # Architecture
//!
//! - `trace`: Event envelope, model state contract, reducer and recorder
//! - `playback`: Snapshot cache, notification bus, clock and the player
//! - `domains`: Concrete producers and reducers (sorting, stack, heap, graphs)
//! - `view`: Renderer-facing view models
//! - `schema`: Scenario and playback configuration
//! - `registry`: Name-keyed visualizer table
//!
//! # Example
//!
//! ```rust,no_run
//! use algo_replay::{
//!     domains::{ArrayDomain, sorting::bubble_sort},
//!     playback::{Player, SystemClock},
//!     schema::PlaybackConfig,
//! };
//!
//! let mut player = Player::new(
//!     ArrayDomain,
//!     &PlaybackConfig::default(),
//!     Box::new(SystemClock::default()),
//! );
//! player.load(bubble_sort(&[3, 1, 2]));
//!
//! player.go_to(2);
//! player.step_back();
//! if let Some(snapshot) = player.snapshot() {
//!     println!("{snapshot}");
//! }
//! ```

pub mod domains;
pub mod playback;
pub mod registry;
pub mod schema;
pub mod trace;
pub mod view;

// WebAssembly bindings (only for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export commonly used types
pub use playback::{Playback, PlaybackEvent, PlaybackStatus, Player};
pub use registry::VisualizerRegistry;
pub use schema::{PlaybackConfig, Scenario, ScenarioError};
pub use trace::{Domain, Event, Reducer};
pub use view::{StepSnapshot, ViewModel};
