//! Block geometry and the placed-block stack
//!
//! Footprints live on the horizontal placement plane. A `Vec2` footprint
//! stores the world x axis in `.x` and the world z axis in `.y`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Horizontal axis a block oscillates along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Axis {
    #[default]
    X,
    Z,
}

impl Axis {
    /// The perpendicular horizontal axis
    pub fn other(self) -> Self {
        match self {
            Axis::X => Axis::Z,
            Axis::Z => Axis::X,
        }
    }

    /// Component of a plane vector along this axis
    #[inline]
    pub fn of(self, v: Vec2) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Z => v.y,
        }
    }

    /// Overwrite the component of a plane vector along this axis
    #[inline]
    pub fn set(self, v: &mut Vec2, value: f32) {
        match self {
            Axis::X => v.x = value,
            Axis::Z => v.y = value,
        }
    }

    /// Unit plane vector along this axis
    pub fn unit(self) -> Vec2 {
        match self {
            Axis::X => Vec2::X,
            Axis::Z => Vec2::Y,
        }
    }
}

/// An axis-aligned box resting in the tower
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Footprint center on the placement plane (x, z)
    pub center: Vec2,
    /// Footprint extent (x, z), never negative
    pub size: Vec2,
    /// Height of the block's vertical center
    pub elevation: f32,
    /// Vertical thickness
    pub height: f32,
    /// Index in the stack (visual variation only)
    pub level: u32,
}

impl Block {
    /// Lower and upper bounds of the footprint along an axis
    pub fn span(&self, axis: Axis) -> (f32, f32) {
        let half = axis.of(self.size) / 2.0;
        let c = axis.of(self.center);
        (c - half, c + half)
    }

    /// Elevation of the top face
    pub fn top_face(&self) -> f32 {
        self.elevation + self.height / 2.0
    }
}

/// Placed blocks, anchor first
///
/// Append-only during a game. Blocks enter only through a committed
/// placement; the anchor is always present.
#[derive(Debug, Clone)]
pub struct Stack {
    anchor: Block,
    placed: Vec<Block>,
    block_height: f32,
}

impl Stack {
    pub fn new(tuning: &Tuning) -> Self {
        let mut stack = Self {
            anchor: Self::anchor_block(tuning),
            placed: Vec::new(),
            block_height: tuning.block_height,
        };
        stack.append_base(tuning);
        stack
    }

    fn anchor_block(tuning: &Tuning) -> Block {
        let height = tuning.base_height();
        Block {
            center: Vec2::ZERO,
            size: Vec2::splat(tuning.block_size),
            elevation: height / 2.0,
            height,
            level: 0,
        }
    }

    /// (Re)create the anchor at the origin, dropping every placed block
    pub fn append_base(&mut self, tuning: &Tuning) {
        self.anchor = Self::anchor_block(tuning);
        self.placed.clear();
        self.block_height = tuning.block_height;
    }

    /// Most recently committed block, or the anchor
    pub fn top(&self) -> &Block {
        self.placed.last().unwrap_or(&self.anchor)
    }

    /// Number of blocks including the anchor
    pub fn len(&self) -> usize {
        self.placed.len() + 1
    }

    /// Always false: the anchor is never removed
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Blocks placed on top of the anchor
    pub fn placed(&self) -> &[Block] {
        &self.placed
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        std::iter::once(&self.anchor).chain(self.placed.iter())
    }

    /// Vertical center for the next block to rest on the current top
    pub fn next_elevation(&self) -> f32 {
        self.top().top_face() + self.block_height / 2.0
    }

    /// Append a resolved placement. Only the placement path calls this.
    pub(crate) fn commit(&mut self, block: Block) {
        debug_assert_eq!(block.level as usize, self.len());
        self.placed.push(block);
    }

    /// Clear the stack back to the anchor alone
    pub fn reset(&mut self, tuning: &Tuning) {
        self.append_base(tuning);
    }
}
