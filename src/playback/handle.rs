//! Object-safe command/query surface for UI chrome.

use std::time::Duration;

use super::bus::Subscription;
use super::player::{PlaybackEvent, PlaybackStatus, Player};
use crate::trace::{Domain, Position};
use crate::view::StepSnapshot;

/// Type-erased player, as handed out by the visualizer registry.
///
/// This is the only mutation surface the UI gets: commands in, read-only
/// queries and notifications out.
pub trait Playback {
    fn status(&self) -> PlaybackStatus;
    fn total_steps(&self) -> usize;
    fn current_step(&self) -> usize;
    fn position(&self) -> Position;
    fn is_playing(&self) -> bool;
    fn speed(&self) -> Duration;

    fn play(&mut self);
    fn pause(&mut self);
    fn step_forward(&mut self) -> bool;
    fn step_back(&mut self) -> bool;
    fn reset(&mut self);
    fn go_to_end(&mut self);
    fn go_to(&mut self, target: Position) -> bool;
    fn set_speed(&mut self, speed: Duration);

    /// Drive one timing-loop frame. Returns true if another frame is wanted.
    fn on_frame(&mut self) -> bool;
    fn frame_pending(&self) -> bool;

    /// Renderer pull for the current position.
    fn snapshot(&self) -> Option<StepSnapshot>;
    fn subscribe(&self, listener: Box<dyn FnMut(&PlaybackEvent)>)
    -> Subscription<PlaybackEvent>;
    fn dispose(&mut self);
}

impl<D: Domain> Playback for Player<D> {
    fn status(&self) -> PlaybackStatus {
        Player::status(self)
    }

    fn total_steps(&self) -> usize {
        Player::total_steps(self)
    }

    fn current_step(&self) -> usize {
        Player::current_step(self)
    }

    fn position(&self) -> Position {
        Player::position(self)
    }

    fn is_playing(&self) -> bool {
        Player::is_playing(self)
    }

    fn speed(&self) -> Duration {
        Player::speed(self)
    }

    fn play(&mut self) {
        Player::play(self)
    }

    fn pause(&mut self) {
        Player::pause(self)
    }

    fn step_forward(&mut self) -> bool {
        Player::step_forward(self)
    }

    fn step_back(&mut self) -> bool {
        Player::step_back(self)
    }

    fn reset(&mut self) {
        Player::reset(self)
    }

    fn go_to_end(&mut self) {
        Player::go_to_end(self)
    }

    fn go_to(&mut self, target: Position) -> bool {
        Player::go_to(self, target)
    }

    fn set_speed(&mut self, speed: Duration) {
        Player::set_speed(self, speed)
    }

    fn on_frame(&mut self) -> bool {
        Player::on_frame(self)
    }

    fn frame_pending(&self) -> bool {
        Player::frame_pending(self)
    }

    fn snapshot(&self) -> Option<StepSnapshot> {
        Player::snapshot(self)
    }

    fn subscribe(
        &self,
        listener: Box<dyn FnMut(&PlaybackEvent)>,
    ) -> Subscription<PlaybackEvent> {
        Player::subscribe(self, listener)
    }

    fn dispose(&mut self) {
        Player::dispose(self)
    }
}

/// Run the timing loop to completion on the current thread.
///
/// Sleeps `frame` between frames and calls `after_frame` once per frame.
#[cfg(not(target_arch = "wasm32"))]
pub fn drive<F>(player: &mut dyn Playback, frame: Duration, mut after_frame: F)
where
    F: FnMut(&dyn Playback),
{
    while player.frame_pending() {
        std::thread::sleep(frame);
        player.on_frame();
        after_frame(&*player);
    }
}
