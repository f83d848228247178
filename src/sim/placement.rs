//! Placement resolution
//!
//! Pure geometry: given the active block and the block beneath it, decide
//! whether the drop lands and what gets trimmed. The session applies the
//! result (stack, score, debris).

use glam::Vec2;

use super::active::ActiveBlock;
use super::block::{Axis, Block};
use crate::consts::CUT_EPSILON;

/// The slice trimmed off a landed block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cut {
    pub center: Vec2,
    pub size: Vec2,
    /// Side of the tower the slice overhung (+1 or -1 along the axis)
    pub side: f32,
}

/// A placement that overlapped the block below
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// The trimmed block to append to the stack
    pub committed: Block,
    /// Offset of the active block from the top block along the axis
    pub delta: f32,
    pub overlap: f32,
    /// Width of the overhang (0 when flush)
    pub cut_size: f32,
    /// Present only when the overhang is wider than `CUT_EPSILON`
    pub cut: Option<Cut>,
}

/// Outcome of a placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    Hit(Hit),
    /// No overlap; the whole active block falls
    Miss { delta: f32 },
}

/// Resolve dropping `active` onto `top` along the active block's axis
///
/// Overlap is the intersection of the two footprints along the oscillation
/// axis. The off-axis footprint is carried over untouched.
pub fn resolve(active: &ActiveBlock, top: &Block) -> Placement {
    let axis = active.axis;
    let current = &active.block;

    let delta = axis.of(current.center) - axis.of(top.center);
    let (a_lo, a_hi) = current.span(axis);
    let (t_lo, t_hi) = top.span(axis);
    let lo = a_lo.max(t_lo);
    let hi = a_hi.min(t_hi);

    if hi - lo <= 0.0 {
        return Placement::Miss { delta };
    }

    let overlap = (hi - lo).max(0.0);
    let active_size = axis.of(current.size);
    let cut_size = (active_size - overlap).max(0.0);

    let mut committed = *current;
    axis.set(&mut committed.size, overlap);
    axis.set(&mut committed.center, (lo + hi) / 2.0);

    let cut = (cut_size > CUT_EPSILON).then(|| trimmed_slice(&committed, axis, delta, cut_size));

    Placement::Hit(Hit {
        committed,
        delta,
        overlap,
        cut_size,
        cut,
    })
}

fn trimmed_slice(committed: &Block, axis: Axis, delta: f32, cut_size: f32) -> Cut {
    // The overhang sits on the side the active block drifted towards
    let side = if delta >= 0.0 { 1.0 } else { -1.0 };
    let (lo, hi) = committed.span(axis);
    let edge = if side > 0.0 { hi } else { lo };

    let mut center = committed.center;
    axis.set(&mut center, edge + side * cut_size / 2.0);
    let mut size = committed.size;
    axis.set(&mut size, cut_size);

    Cut { center, size, side }
}
