//! Playback engine.
//!
//! A [`Player`] owns one engine session at a time: the trace, its snapshot
//! cache, the current position and the state at that position. Auto-advance
//! is cooperative: while playing, the player holds a pending frame request and
//! the host calls [`Player::on_frame`] once per frame until the request is
//! dropped.

use std::time::Duration;

use log::debug;
use serde::Serialize;

use super::bus::{NotificationBus, Subscription};
use super::cache::{Seek, SnapshotCache};
use super::clock::Clock;
use crate::schema::PlaybackConfig;
use crate::trace::{
    Domain, Event, INITIAL_POSITION, ModelState, Position, Recording, Reducer, Trace,
    last_position,
};
use crate::view::StepSnapshot;

/// Coarse lifecycle state of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackStatus {
    /// No trace loaded.
    Idle,
    /// Trace loaded, not auto-advancing.
    Paused,
    /// Auto-advancing on the timing loop.
    Playing,
}

/// Lifecycle notification published on the player's bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// A trace was loaded or the player returned to the initial state.
    Reset { total_steps: usize },
    /// The current position changed.
    PositionChanged {
        position: Position,
        total_steps: usize,
    },
    /// Auto-advance started.
    Started { position: Position },
    /// Auto-advance was paused.
    Paused { position: Position },
    /// The end of the trace was reached.
    Completed { position: Position },
}

struct Session<K, S> {
    events: Trace<K>,
    cache: SnapshotCache<S>,
    position: Position,
    current: S,
}

impl<K, S> Session<K, S> {
    fn last(&self) -> Position {
        last_position(self.events.len())
    }

    fn current_event(&self) -> Option<&Event<K>> {
        if self.position < 0 {
            None
        } else {
            self.events.get(self.position as usize)
        }
    }
}

/// Bidirectional, seekable player for one domain.
///
/// Usage:
/// ```ignore
/// let mut player = Player::new(
///     ArrayDomain,
///     &PlaybackConfig::default(),
///     Box::new(SystemClock::default()),
/// );
/// player.load(bubble_sort(&[3, 1, 2]));
/// player.go_to(2);
/// player.step_back();
/// println!("{:?}", player.state());
/// ```
pub struct Player<R: Reducer> {
    reducer: R,
    cache_interval: usize,
    session: Option<Session<R::Kind, R::State>>,
    playing: bool,
    speed: Duration,
    last_tick: Duration,
    frame_pending: bool,
    clock: Box<dyn Clock>,
    bus: NotificationBus<PlaybackEvent>,
}

impl<R: Reducer> Player<R> {
    /// Create an idle player.
    pub fn new(reducer: R, config: &PlaybackConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            reducer,
            cache_interval: config.cache_interval,
            session: None,
            playing: false,
            speed: config.speed(),
            last_tick: Duration::ZERO,
            frame_pending: false,
            clock,
            bus: NotificationBus::new(),
        }
    }

    /// Replace the session with a new trace, positioned at `-1`.
    pub fn load(&mut self, recording: Recording<R::Kind, R::State>) {
        self.pause();
        self.frame_pending = false;

        let Recording { initial, events } = recording;
        let cache = SnapshotCache::build(&self.reducer, &initial, &events, self.cache_interval);
        debug!(
            "Loaded trace: {} events, {} checkpoints",
            events.len(),
            cache.len()
        );

        self.session = Some(Session {
            events,
            cache,
            position: INITIAL_POSITION,
            current: initial,
        });
        self.notify(PlaybackEvent::Reset {
            total_steps: self.total_steps(),
        });
    }

    /// Same as [`Player::load`] with the trace and initial state passed apart.
    pub fn load_events(&mut self, events: Trace<R::Kind>, initial: R::State) {
        self.load(Recording { initial, events });
    }

    /// Apply the next event. Returns false at the end of the trace.
    pub fn step_forward(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.position >= session.last() {
            return false;
        }

        let next = session.position + 1;
        session.current = self
            .reducer
            .reduce(&session.current, &session.events[next as usize]);
        session.position = next;

        self.notify_position();
        true
    }

    /// Move back one event. Returns false at the initial state.
    pub fn step_back(&mut self) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        if session.position <= INITIAL_POSITION {
            return false;
        }
        let target = session.position - 1;
        self.seek_to(target);
        true
    }

    /// Jump to `target`, clamped into `[-1, N - 1]`.
    ///
    /// Returns false (and emits nothing) if the position does not change.
    pub fn go_to(&mut self, target: Position) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        let target = target.clamp(INITIAL_POSITION, session.last());
        if target == session.position {
            return false;
        }
        self.seek_to(target);
        true
    }

    /// Pause and jump to the last position.
    pub fn go_to_end(&mut self) {
        let Some(last) = self.session.as_ref().map(Session::last) else {
            return;
        };
        self.pause();
        self.go_to(last);
        self.notify(PlaybackEvent::Completed { position: last });
    }

    /// Pause and return to the initial state.
    pub fn reset(&mut self) {
        if self.session.is_none() {
            return;
        }
        self.pause();

        if let Some(session) = self.session.as_mut() {
            session.position = INITIAL_POSITION;
            session.current = session.cache.initial().clone();
        }
        self.notify(PlaybackEvent::Reset {
            total_steps: self.total_steps(),
        });
    }

    /// Start auto-advancing.
    ///
    /// Playing from the last position restarts from `-1`. An empty trace only
    /// reports completion.
    pub fn play(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if self.playing {
            return;
        }
        if session.events.is_empty() {
            self.notify(PlaybackEvent::Completed {
                position: INITIAL_POSITION,
            });
            return;
        }
        if session.position >= session.last() {
            self.reset();
        }

        self.playing = true;
        self.last_tick = self.clock.now();
        self.frame_pending = true;

        let position = self.position();
        debug!("Playback started at {position}");
        self.notify(PlaybackEvent::Started { position });
    }

    /// Stop auto-advancing and cancel the pending frame. Idempotent.
    pub fn pause(&mut self) {
        if !self.playing {
            return;
        }
        self.playing = false;
        self.frame_pending = false;

        let position = self.position();
        debug!("Playback paused at {position}");
        self.notify(PlaybackEvent::Paused { position });
    }

    /// Set the time per event. Applies from the next frame.
    pub fn set_speed(&mut self, speed: Duration) {
        self.speed = speed;
    }

    /// Timing loop body. Call once per host frame while [`Player::frame_pending`].
    ///
    /// Returns true if another frame is wanted.
    pub fn on_frame(&mut self) -> bool {
        if !self.frame_pending {
            return false;
        }
        self.frame_pending = false;
        if !self.playing {
            return false;
        }

        let now = self.clock.now();
        if now.saturating_sub(self.last_tick) >= self.speed {
            self.step_forward();
            self.last_tick = now;

            if self.at_end() {
                self.playing = false;
                let position = self.position();
                debug!("Playback completed at {position}");
                self.notify(PlaybackEvent::Completed { position });
                return false;
            }
        }

        self.frame_pending = true;
        true
    }

    /// True while a timing-loop frame is requested.
    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Register a lifecycle listener.
    pub fn subscribe<F>(&self, listener: F) -> Subscription<PlaybackEvent>
    where
        F: FnMut(&PlaybackEvent) + 'static,
    {
        self.bus.subscribe(listener)
    }

    /// Tear down the session: stop playback, drop the trace and its cache, and
    /// release every listener.
    pub fn dispose(&mut self) {
        self.pause();
        self.frame_pending = false;
        self.session = None;
        self.bus.clear();
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn status(&self) -> PlaybackStatus {
        match (&self.session, self.playing) {
            (None, _) => PlaybackStatus::Idle,
            (Some(_), false) => PlaybackStatus::Paused,
            (Some(_), true) => PlaybackStatus::Playing,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> Duration {
        self.speed
    }

    /// Current logical position (`-1` when idle or at the initial state).
    pub fn position(&self) -> Position {
        self.session
            .as_ref()
            .map_or(INITIAL_POSITION, |session| session.position)
    }

    /// Current step for display: `position + 1`.
    pub fn current_step(&self) -> usize {
        (self.position() + 1) as usize
    }

    /// Number of steps including the initial state (`0` when idle).
    pub fn total_steps(&self) -> usize {
        self.session
            .as_ref()
            .map_or(0, |session| session.events.len() + 1)
    }

    /// True if the current position is the last one.
    pub fn at_end(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.position >= session.last())
    }

    /// State at the current position.
    pub fn state(&self) -> Option<&R::State> {
        self.session.as_ref().map(|session| &session.current)
    }

    /// State at position `-1`.
    pub fn initial_state(&self) -> Option<&R::State> {
        self.session.as_ref().map(|session| session.cache.initial())
    }

    /// Loaded trace (empty when idle).
    pub fn events(&self) -> &[Event<R::Kind>] {
        self.session
            .as_ref()
            .map_or(&[][..], |session| &session.events[..])
    }

    /// Most recently applied event, if any.
    pub fn current_event(&self) -> Option<&Event<R::Kind>> {
        self.session.as_ref().and_then(Session::current_event)
    }

    /// Snapshot cache of the current session.
    pub fn cache(&self) -> Option<&SnapshotCache<R::State>> {
        self.session.as_ref().map(|session| &session.cache)
    }

    /// Compute the state at `target` without moving.
    pub fn compute_state_at(&self, target: Position) -> Option<R::State> {
        self.compute_seek(target).map(|seek| seek.state)
    }

    /// Like [`Player::compute_state_at`], also reporting the replay cost.
    pub fn compute_seek(&self, target: Position) -> Option<Seek<R::State>> {
        self.session
            .as_ref()
            .map(|session| session.cache.seek(&self.reducer, &session.events, target))
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn seek_to(&mut self, target: Position) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let seek = session.cache.seek(&self.reducer, &session.events, target);
        session.current = seek.state;
        session.position = target;
        self.notify_position();
    }

    fn notify_position(&self) {
        if let Some(session) = &self.session {
            self.notify(PlaybackEvent::PositionChanged {
                position: session.position,
                total_steps: session.events.len() + 1,
            });
        }
    }

    fn notify(&self, event: PlaybackEvent) {
        self.bus.emit(&event);
    }
}

impl<D: Domain> Player<D> {
    /// Everything a renderer needs for the current position.
    pub fn snapshot(&self) -> Option<StepSnapshot> {
        let session = self.session.as_ref()?;
        let state = &session.current;

        let (tag, description, line, active, modified) = match session.current_event() {
            Some(event) => (
                Some(event.tag()),
                event.description.clone(),
                event.line,
                event.active.clone(),
                event.modified.clone(),
            ),
            None => (None, "Initial state".to_string(), None, Vec::new(), Vec::new()),
        };

        let view = self.reducer.view(state).highlight(&active, &modified);

        Some(StepSnapshot {
            position: session.position,
            step: (session.position + 1) as usize,
            total_steps: session.events.len() + 1,
            tag,
            description,
            line,
            active,
            modified,
            counters: state.counters(),
            error: state.error().map(str::to_owned),
            view,
        })
    }
}
