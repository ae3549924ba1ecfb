//! WebAssembly bindings for Algo Replay.
//!
//! Provides a thin wrapper around a registry-opened [`Playback`] handle. The
//! host drives the timing loop from `requestAnimationFrame` by calling
//! `onFrame` while `framePending` is true.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::{
    Playback, PlaybackEvent, Scenario, VisualizerRegistry,
    playback::{Clock, Subscription},
};

/// Initialize WASM module with panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages in browser
    console_error_panic_hook::set_once();

    // Initialize WASM logger
    wasm_logger::init(wasm_logger::Config::default());
}

/// Wall clock backed by `Date.now()`.
struct DateClock;

impl Clock for DateClock {
    fn now(&self) -> Duration {
        Duration::from_secs_f64(js_sys::Date::now().max(0.0) / 1000.0)
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// WebAssembly wrapper for one playback session.
#[wasm_bindgen]
pub struct WasmPlayer {
    player: Box<dyn Playback>,
    notifications: Rc<RefCell<Vec<PlaybackEvent>>>,
    _subscription: Subscription<PlaybackEvent>,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// Open a player from a JSON scenario.
    ///
    /// # Arguments
    /// * `scenario_json` - JSON string containing a Scenario
    #[wasm_bindgen(constructor)]
    pub fn new(scenario_json: &str) -> Result<WasmPlayer, JsValue> {
        let scenario = Scenario::from_json(scenario_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let player = VisualizerRegistry::with_builtin()
            .open(&scenario, Box::new(DateClock))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let notifications: Rc<RefCell<Vec<PlaybackEvent>>> = Rc::default();
        let sink = Rc::clone(&notifications);
        let subscription = player.subscribe(Box::new(move |event: &PlaybackEvent| {
            sink.borrow_mut().push(*event);
        }));

        Ok(WasmPlayer {
            player,
            notifications,
            _subscription: subscription,
        })
    }

    #[wasm_bindgen]
    pub fn play(&mut self) {
        self.player.play();
    }

    #[wasm_bindgen]
    pub fn pause(&mut self) {
        self.player.pause();
    }

    #[wasm_bindgen(js_name = stepForward)]
    pub fn step_forward(&mut self) -> bool {
        self.player.step_forward()
    }

    #[wasm_bindgen(js_name = stepBack)]
    pub fn step_back(&mut self) -> bool {
        self.player.step_back()
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.player.reset();
    }

    #[wasm_bindgen(js_name = goToEnd)]
    pub fn go_to_end(&mut self) {
        self.player.go_to_end();
    }

    /// Jump to a position (`-1` = initial state). Out-of-range targets clamp.
    #[wasm_bindgen(js_name = goTo)]
    pub fn go_to(&mut self, position: i32) -> bool {
        self.player.go_to(position as isize)
    }

    /// Set milliseconds per event.
    #[wasm_bindgen(js_name = setSpeed)]
    pub fn set_speed(&mut self, ms: u32) {
        self.player.set_speed(Duration::from_millis(u64::from(ms)));
    }

    /// Timing-loop body. Returns true if another frame is wanted.
    #[wasm_bindgen(js_name = onFrame)]
    pub fn on_frame(&mut self) -> bool {
        self.player.on_frame()
    }

    #[wasm_bindgen(js_name = framePending)]
    pub fn frame_pending(&self) -> bool {
        self.player.frame_pending()
    }

    /// Current step snapshot as a JS object.
    #[wasm_bindgen(js_name = getSnapshot)]
    pub fn get_snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(&self.player.snapshot())
    }

    /// Drain lifecycle notifications queued since the last call.
    #[wasm_bindgen(js_name = takeNotifications)]
    pub fn take_notifications(&self) -> Result<JsValue, JsValue> {
        let events: Vec<PlaybackEvent> = self.notifications.borrow_mut().drain(..).collect();
        to_js(&events)
    }

    #[wasm_bindgen(js_name = totalSteps)]
    pub fn total_steps(&self) -> usize {
        self.player.total_steps()
    }

    #[wasm_bindgen(js_name = currentStep)]
    pub fn current_step(&self) -> usize {
        self.player.current_step()
    }

    /// Current position (`-1` = initial state).
    #[wasm_bindgen]
    pub fn position(&self) -> i32 {
        self.player.position() as i32
    }

    /// Milliseconds per event.
    #[wasm_bindgen]
    pub fn speed(&self) -> u32 {
        u32::try_from(self.player.speed().as_millis()).unwrap_or(u32::MAX)
    }

    #[wasm_bindgen(js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    /// Stop playback and release the session.
    #[wasm_bindgen]
    pub fn dispose(&mut self) {
        self.player.dispose();
        self.notifications.borrow_mut().clear();
    }
}

#[derive(Serialize)]
struct VisualizerInfo {
    name: &'static str,
    summary: &'static str,
    input: &'static str,
    pseudocode: &'static [&'static str],
}

/// List built-in visualizers with their pseudocode.
#[wasm_bindgen(js_name = listVisualizers)]
pub fn list_visualizers() -> Result<JsValue, JsValue> {
    let infos: Vec<VisualizerInfo> = VisualizerRegistry::with_builtin()
        .iter()
        .map(|entry| VisualizerInfo {
            name: entry.name,
            summary: entry.summary,
            input: entry.input,
            pseudocode: entry.pseudocode,
        })
        .collect();
    to_js(&infos)
}

/// Example scenario as a JSON string.
#[wasm_bindgen(js_name = exampleScenario)]
pub fn example_scenario() -> Result<String, JsValue> {
    serde_json::to_string_pretty(&Scenario::example())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}
