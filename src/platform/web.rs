//! Browser bridge
//!
//! The page owns the canvas, the renderer and the DOM overlay. It forwards
//! pointer/keyboard events here and calls `frame` from its
//! `requestAnimationFrame` loop, then draws from `snapshot_json`.

use wasm_bindgen::prelude::*;

use super::input::InputQueue;
use crate::consts::SIM_DT;
use crate::sim::{GameSession, tick};
use crate::tuning::{Tuning, Variant};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Already initialized by an earlier module instance
        return;
    }
    log::info!("Stack Tower wasm module loaded");
}

/// Game instance holding all state
#[wasm_bindgen]
pub struct WebGame {
    session: GameSession,
    input: InputQueue,
    last_time: f64,
}

impl WebGame {
    fn with_tuning(tuning: Tuning) -> WebGame {
        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {}", seed);
        WebGame {
            session: GameSession::new(tuning, seed),
            input: InputQueue::new(),
            last_time: 0.0,
        }
    }
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game for a named variant ("classic", "wide", "canvas")
    #[wasm_bindgen(constructor)]
    pub fn new(variant: &str) -> WebGame {
        let variant = Variant::from_str(variant).unwrap_or_else(|| {
            log::warn!("Unknown variant {:?}, using {}", variant, Variant::default().as_str());
            Variant::default()
        });
        Self::with_tuning(variant.tuning())
    }

    /// Create a game from a JSON tuning document
    pub fn from_tuning_json(json: &str) -> Result<WebGame, JsValue> {
        let tuning = Tuning::from_json(json).map_err(|e| {
            log::warn!("Rejected tuning: {}", e);
            JsValue::from_str(&e.to_string())
        })?;
        Ok(Self::with_tuning(tuning))
    }

    /// Advance to `time_ms` (a `requestAnimationFrame` timestamp)
    pub fn frame(&mut self, time_ms: f64) -> u32 {
        let dt = if self.last_time > 0.0 {
            ((time_ms - self.last_time) / 1000.0) as f32
        } else {
            SIM_DT
        };
        self.last_time = time_ms;

        let input = self.input.take();
        tick(&mut self.session, &input, dt)
    }

    pub fn pointer_down(&mut self) {
        self.input.pointer_down();
    }

    pub fn key_down(&mut self, key: &str) -> bool {
        self.input.key_down(key)
    }

    pub fn restart(&mut self) {
        self.session.request_restart();
    }

    pub fn score(&self) -> u32 {
        self.session.score()
    }

    pub fn game_over(&self) -> bool {
        self.session.is_game_over()
    }

    pub fn phase(&self) -> String {
        self.session.phase().as_str().to_string()
    }

    /// Everything the renderer needs for this frame, as JSON
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.session.snapshot()).unwrap_or_else(|e| {
            log::error!("Snapshot serialization failed: {}", e);
            String::from("{}")
        })
    }

    /// Events since the last call, as a JSON array
    pub fn events_json(&mut self) -> String {
        let events = self.session.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::error!("Event serialization failed: {}", e);
            String::from("[]")
        })
    }
}
