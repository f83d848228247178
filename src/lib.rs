//! Stack Tower - a stack-the-blocks arcade game
//!
//! Core modules:
//! - `sim`: Deterministic stacking simulation (placement, trimming, debris, game state)
//! - `platform`: Browser/native platform abstraction (input translation, wasm bridge)
//! - `tuning`: Data-driven game balance and variant presets

pub mod platform;
pub mod sim;
pub mod tuning;

pub use sim::{GameEvent, GamePhase, GameSession, TickInput, tick};
pub use tuning::{Tuning, TuningError, Variant};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the rate the per-step tuning values assume)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta accepted by the fixed-step clock (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Trimmed remainders at or below this width produce no debris
    pub const CUT_EPSILON: f32 = 0.01;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}
