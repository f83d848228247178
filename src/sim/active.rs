//! The block currently sliding over the tower

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::block::{Axis, Block};

/// Lifecycle of an active block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionState {
    /// Created, starts moving on the next step
    Spawned,
    /// Sliding; the only state that accepts a placement
    Moving,
    /// Stopped while its placement resolves
    Frozen,
    /// Placement landed and the block joined the stack
    Committed,
    /// Placement missed and the block became debris
    Rejected,
}

/// Where and how the next active block enters
#[derive(Debug, Clone, Copy)]
pub struct SpawnParams {
    pub axis: Axis,
    pub speed: f32,
    /// Swing half-width as a multiple of the top block's size along `axis`
    pub range_factor: f32,
    pub elevation: f32,
    pub height: f32,
    pub level: u32,
}

/// The one block in motion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveBlock {
    pub block: Block,
    pub axis: Axis,
    /// Travel direction along `axis` (+1 or -1)
    pub direction: f32,
    /// Distance per step
    pub speed: f32,
    /// Center of the swing along `axis` (the anchor's center)
    pub origin: f32,
    /// Half-width of the swing
    pub range: f32,
    pub state: MotionState,
}

impl ActiveBlock {
    /// Spawn a block over `top`
    ///
    /// The footprint is never wider than the block it lands on, nor than the
    /// previous active block after trimming. Every block swings about the
    /// anchor's center, whatever the top has drifted to, and starts one full
    /// range before it.
    pub fn spawn(top: &Block, previous: Option<&Block>, params: SpawnParams) -> Self {
        let SpawnParams {
            axis,
            speed,
            range_factor,
            elevation,
            height,
            level,
        } = params;
        let size = match previous {
            Some(prev) => top.size.min(prev.size),
            None => top.size,
        };
        let origin = 0.0;
        let range = axis.of(top.size) * range_factor;

        let mut center = top.center;
        axis.set(&mut center, origin - range);

        Self {
            block: Block {
                center,
                size,
                elevation,
                height,
                level,
            },
            axis,
            direction: 1.0,
            speed,
            origin,
            range,
            state: MotionState::Spawned,
        }
    }

    /// Whether a placement may be applied right now
    pub fn movable(&self) -> bool {
        self.state == MotionState::Moving
    }

    /// Position along the oscillation axis
    pub fn offset(&self) -> f32 {
        self.axis.of(self.block.center)
    }

    /// Advance one step, reflecting at the ends of the swing
    pub fn advance(&mut self) {
        match self.state {
            MotionState::Spawned => self.state = MotionState::Moving,
            MotionState::Moving => {}
            _ => return,
        }

        let lo = self.origin - self.range;
        let hi = self.origin + self.range;
        let mut pos = self.offset() + self.speed * self.direction;
        if pos > hi {
            pos = hi;
            self.direction = -1.0;
        } else if pos < lo {
            pos = lo;
            self.direction = 1.0;
        }
        self.axis.set(&mut self.block.center, pos);
    }

    /// Stop for resolution. Returns false (and changes nothing) unless moving.
    pub fn freeze(&mut self) -> bool {
        if !self.movable() {
            return false;
        }
        self.state = MotionState::Frozen;
        true
    }

    /// Current horizontal velocity on the placement plane
    pub fn velocity(&self) -> Vec2 {
        match self.state {
            MotionState::Committed => Vec2::ZERO,
            _ => self.axis.unit() * self.speed * self.direction,
        }
    }
}
