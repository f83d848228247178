//! Camera follow, exit zoom and stack compression easing
//!
//! None of this affects gameplay. It is simulated here so every renderer
//! eases the same way at the fixed step rate.

use serde::Serialize;

use crate::tuning::{HammerTuning, Tuning};

/// Ease `value` toward `target` by `factor`, snapping once within `snap`
fn ease(value: &mut f32, target: f32, factor: f32, snap: f32) -> bool {
    let diff = target - *value;
    if diff.abs() > snap {
        *value += diff * factor;
        false
    } else {
        *value = target;
        true
    }
}

/// Camera height and zoom the renderer should use
#[derive(Debug, Clone, Serialize)]
pub struct CameraRig {
    pub height: f32,
    pub target_height: f32,
    pub zoom: f32,
    pub target_zoom: f32,
    #[serde(skip)]
    lerp: f32,
    #[serde(skip)]
    offset: f32,
}

impl CameraRig {
    pub fn new(tuning: &Tuning) -> Self {
        let height = tuning.base_height() + tuning.camera_height_offset;
        Self {
            height,
            target_height: height,
            zoom: 1.0,
            target_zoom: 1.0,
            lerp: tuning.camera_lerp,
            offset: tuning.camera_height_offset,
        }
    }

    /// Track the elevation of the newest block
    pub fn follow(&mut self, elevation: f32) {
        self.target_height = elevation + self.offset;
    }

    pub fn zoom_out(&mut self, zoom: f32) {
        self.target_zoom = zoom;
    }

    pub fn step(&mut self) {
        ease(&mut self.height, self.target_height, self.lerp, 0.001);
        ease(&mut self.zoom, self.target_zoom, self.lerp, 0.001);
    }

    /// True once both height and zoom have reached their targets
    pub fn settled(&self) -> bool {
        self.height == self.target_height && self.zoom == self.target_zoom
    }
}

/// Downward push applied to the whole stack after it grows past a threshold
#[derive(Debug, Clone, Serialize)]
pub struct Hammer {
    pub offset: f32,
    pub target: f32,
    #[serde(skip)]
    settings: HammerTuning,
}

impl Hammer {
    pub fn new(settings: HammerTuning) -> Self {
        Self {
            offset: 0.0,
            target: 0.0,
            settings,
        }
    }

    /// Called whenever a block spawns on a stack of `stack_len` blocks
    pub fn on_spawn(&mut self, stack_len: usize) -> bool {
        if stack_len < self.settings.threshold {
            return false;
        }
        self.target += self.settings.distance;
        true
    }

    pub fn step(&mut self) {
        ease(&mut self.offset, self.target, self.settings.lerp, 0.01);
    }
}
