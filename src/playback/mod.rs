//! Playback engine: snapshot cache, notification bus and the player itself.
//!
//! # Seeking
//!
//! ```text
//! checkpoints:  -1 ........ K-1 ........ 2K-1 ........ 3K-1
//! seek(t):                   |---replay--> t
//! ```
//!
//! Any seek replays at most `K` events from the nearest preceding checkpoint,
//! independent of the trace length and of how far the seek jumps.
//!
//! # Timing
//!
//! Auto-advance is single-threaded and cooperative. While playing the player
//! holds a frame request; the host (a native loop, or `requestAnimationFrame`
//! in the browser) calls `on_frame` and the player steps once the configured
//! time per event has elapsed. `pause` drops the request.

mod bus;
mod cache;
mod clock;
mod handle;
mod player;

pub use bus::{NotificationBus, Subscription};
pub use cache::{CACHE_INTERVAL, Seek, SnapshotCache};
#[cfg(not(target_arch = "wasm32"))]
pub use clock::SystemClock;
pub use clock::{Clock, ManualClock};
#[cfg(not(target_arch = "wasm32"))]
pub use handle::drive;
pub use handle::Playback;
pub use player::{PlaybackEvent, PlaybackStatus, Player};
