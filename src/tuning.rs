//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. The shipped iterations of the
//! game differ only in these values, so each one is a [`Variant`] preset over
//! the same simulation. Values marked "per step" are applied once per fixed
//! simulation step (see [`crate::consts::SIM_DT`]).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::Axis;

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Ground plane debris can land on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Ground {
    /// Infinite plane at height 0
    Unbounded,
    /// Square plane centered on the tower; pieces past the edge fall freely.
    /// No preset uses it; set it from a tuning file.
    Bounded { half_extent: f32 },
    /// No ground at all (pieces fall out of view)
    Absent,
}

/// Periodic stack compression ("hammer") settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HammerTuning {
    /// Stack length at which every spawn pushes the stack down
    pub threshold: usize,
    /// Offset added per spawn once past the threshold
    pub distance: f32,
    /// Easing factor per step
    pub lerp: f32,
}

impl Default for HammerTuning {
    fn default() -> Self {
        Self {
            threshold: 7,
            distance: 1.0,
            lerp: 0.2,
        }
    }
}

/// Complete gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Geometry ===
    /// Footprint of the anchor block along both axes
    pub block_size: f32,
    /// Vertical thickness of every placed block
    pub block_height: f32,
    /// Anchor height as a multiple of `block_height`
    pub base_height_factor: f32,
    /// Oscillation axis of the first spawned block
    pub first_axis: Axis,
    /// Movement range as a multiple of the block's size along its axis
    pub move_range_factor: f32,

    // === Speed ramp (units per step) ===
    pub initial_speed: f32,
    pub speed_increment: f32,
    pub max_speed: f32,

    // === Debris physics (per step) ===
    pub gravity: f32,
    /// Multiplier applied to sliding velocities while resting on the ground
    pub friction: f32,
    /// Fraction of vertical speed kept after a bounce
    pub bounce: f32,
    /// Downward speed above which ground contact bounces instead of settling
    pub bounce_threshold: f32,
    /// Velocity magnitude under which a grounded fragment counts as settled
    pub settle_threshold: f32,
    /// Fragments below this height are discarded immediately
    pub kill_depth: f32,
    /// Outward speed given to trimmed fragments
    pub debris_push: f32,
    /// Range of the random spin about the vertical axis
    pub debris_spin: f32,
    /// Range of the random tumble about the horizontal axis
    pub debris_tumble: f32,
    /// Steps a settled fragment stays visible before it is pruned
    pub settled_linger_ticks: u32,
    pub ground: Ground,

    // === Pacing ===
    /// Delay between a committed placement and the next spawn
    pub spawn_delay_ticks: u32,
    /// Duration of the exit transition after a miss
    pub exit_transition_ticks: u32,

    // === Presentation hints ===
    pub exit_zoom: f32,
    pub camera_lerp: f32,
    pub camera_height_offset: f32,
    /// Offsets under this are flagged as aligned placements (cosmetic only)
    pub perfect_tolerance: f32,
    pub hammer: Option<HammerTuning>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            block_size: 4.0,
            block_height: 1.0,
            base_height_factor: 2.0,
            first_axis: Axis::X,
            move_range_factor: 1.0,

            initial_speed: 0.04,
            speed_increment: 0.0001,
            max_speed: 0.28,

            gravity: 0.03,
            friction: 0.96,
            bounce: 0.3,
            bounce_threshold: 0.05,
            settle_threshold: 0.001,
            kill_depth: -20.0,
            debris_push: 0.08,
            debris_spin: 0.08,
            debris_tumble: 0.1,
            settled_linger_ticks: 60,
            ground: Ground::Unbounded,

            spawn_delay_ticks: 12,
            exit_transition_ticks: 60,

            exit_zoom: 0.5,
            camera_lerp: 0.1,
            camera_height_offset: 9.0,
            perfect_tolerance: 0.1,
            hammer: None,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if self.block_size <= 0.0 {
            return invalid("block_size", "must be positive");
        }
        if self.block_height <= 0.0 {
            return invalid("block_height", "must be positive");
        }
        if self.base_height_factor <= 0.0 {
            return invalid("base_height_factor", "must be positive");
        }
        if self.move_range_factor <= 0.0 {
            return invalid("move_range_factor", "must be positive");
        }
        if self.initial_speed <= 0.0 {
            return invalid("initial_speed", "must be positive");
        }
        if self.speed_increment < 0.0 {
            return invalid("speed_increment", "must not be negative");
        }
        if self.max_speed < self.initial_speed {
            return invalid("max_speed", "must be at least initial_speed");
        }
        if self.gravity < 0.0 {
            return invalid("gravity", "must not be negative");
        }
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return invalid("friction", "must be in (0, 1]");
        }
        if !(0.0..1.0).contains(&self.bounce) {
            return invalid("bounce", "must be in [0, 1)");
        }
        if self.bounce_threshold < 0.0 || self.settle_threshold < 0.0 {
            return invalid("settle_threshold", "thresholds must not be negative");
        }
        if self.kill_depth >= 0.0 {
            return invalid("kill_depth", "must be below the ground");
        }
        if matches!(self.ground, Ground::Bounded { half_extent } if half_extent <= 0.0) {
            return invalid("ground", "half_extent must be positive");
        }
        if !(self.camera_lerp > 0.0 && self.camera_lerp <= 1.0) {
            return invalid("camera_lerp", "must be in (0, 1]");
        }
        if self.exit_zoom <= 0.0 {
            return invalid("exit_zoom", "must be positive");
        }
        if let Some(hammer) = &self.hammer {
            if !(hammer.lerp > 0.0 && hammer.lerp <= 1.0) {
                return invalid("hammer", "lerp must be in (0, 1]");
            }
        }
        Ok(())
    }

    /// Height of the anchor block
    pub fn base_height(&self) -> f32 {
        self.block_height * self.base_height_factor
    }

    /// Speed after `hits` successful placements
    pub fn speed_after(&self, hits: u32) -> f32 {
        (self.initial_speed + hits as f32 * self.speed_increment).min(self.max_speed)
    }
}

/// Shipped game iterations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Double-height anchor, block enters from exactly one size away
    #[default]
    Classic3D,
    /// Wider swing, z-axis first, single-height anchor
    Wide3D,
    /// Side-on canvas iteration with the hammer mechanic
    Canvas2D,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Classic3D, Variant::Wide3D, Variant::Canvas2D];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic3D => "classic",
            Variant::Wide3D => "wide",
            Variant::Canvas2D => "canvas",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "classic3d" | "3d" => Some(Variant::Classic3D),
            "wide" | "wide3d" => Some(Variant::Wide3D),
            "canvas" | "canvas2d" | "2d" => Some(Variant::Canvas2D),
            _ => None,
        }
    }

    /// Gameplay configuration for this variant
    pub fn tuning(&self) -> Tuning {
        match self {
            Variant::Classic3D => Tuning::default(),
            Variant::Wide3D => Tuning {
                base_height_factor: 1.0,
                first_axis: Axis::Z,
                move_range_factor: 1.2,
                ..Tuning::default()
            },
            // Canvas pixels scaled so one block is one unit tall
            Variant::Canvas2D => Tuning {
                block_size: 2.4,
                base_height_factor: 1.0,
                move_range_factor: 1.2,
                speed_increment: 0.0,
                gravity: 0.01,
                debris_push: 0.0,
                debris_spin: 0.2,
                debris_tumble: 0.0,
                ground: Ground::Absent,
                camera_height_offset: 0.0,
                hammer: Some(HammerTuning::default()),
                ..Tuning::default()
            },
        }
    }
}
