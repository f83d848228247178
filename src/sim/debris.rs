//! Falling debris
//!
//! A lightweight free-body approximation for trimmed slices and missed
//! blocks: constant gravity, a lossy ground bounce, and friction once the
//! piece rests. Visual flourish only; nothing in the game depends on where
//! debris ends up.

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::block::{Axis, Block};
use super::placement::Cut;
use crate::normalize_angle;
use crate::tuning::{Ground, Tuning};

/// Result of integrating a fragment for one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebrisStatus {
    Airborne,
    /// Resting on the ground, still sliding
    Grounded,
    /// Came to rest this step
    Settled,
    /// Dropped past the kill depth
    Lost,
    /// Already inert
    Dead,
}

/// A detached piece of a block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebrisFragment {
    pub id: u32,
    pub position: Vec3,
    /// Extents (x, height, z)
    pub size: Vec3,
    pub velocity: Vec3,
    /// Euler rotation (radians)
    pub rotation: Vec3,
    /// Spin about the vertical axis per step
    pub angular_velocity: f32,
    /// Tumble about the horizontal axis perpendicular to `tumble_axis` per step
    pub tumble: f32,
    /// Axis the piece was travelling along when it broke off
    pub tumble_axis: Axis,
    /// Stack level it came from (for coloring)
    pub level: u32,
    pub alive: bool,
    /// Steps spent inert
    #[serde(default)]
    pub idle_ticks: u32,
}

impl DebrisFragment {
    #[allow(clippy::too_many_arguments)]
    fn new(
        id: u32,
        block: &Block,
        center: Vec2,
        size: Vec2,
        velocity: Vec2,
        axis: Axis,
        tuning: &Tuning,
        rng: &mut impl Rng,
    ) -> Self {
        Self {
            id,
            position: Vec3::new(center.x, block.elevation, center.y),
            size: Vec3::new(size.x, block.height, size.y),
            velocity: Vec3::new(velocity.x, 0.0, velocity.y),
            rotation: Vec3::ZERO,
            angular_velocity: spread(rng, tuning.debris_spin),
            tumble: spread(rng, tuning.debris_tumble),
            tumble_axis: axis,
            level: block.level,
            alive: true,
            idle_ticks: 0,
        }
    }

    /// The slice trimmed off `committed`, pushed outward on its side
    pub fn from_cut(
        id: u32,
        committed: &Block,
        cut: &Cut,
        axis: Axis,
        tuning: &Tuning,
        rng: &mut impl Rng,
    ) -> Self {
        let push = axis.unit() * cut.side * tuning.debris_push;
        Self::new(id, committed, cut.center, cut.size, push, axis, tuning, rng)
    }

    /// A whole missed block, keeping the velocity it had when dropped
    pub fn from_block(
        id: u32,
        block: &Block,
        velocity: Vec2,
        axis: Axis,
        tuning: &Tuning,
        rng: &mut impl Rng,
    ) -> Self {
        Self::new(id, block, block.center, block.size, velocity, axis, tuning, rng)
    }

    /// Integrate one step
    pub fn integrate(&mut self, tuning: &Tuning) -> DebrisStatus {
        if !self.alive {
            self.idle_ticks += 1;
            return DebrisStatus::Dead;
        }

        self.position.y += self.velocity.y;
        self.velocity.y -= tuning.gravity;
        self.position.x += self.velocity.x;
        self.position.z += self.velocity.z;

        match self.tumble_axis {
            Axis::X => self.rotation.z = normalize_angle(self.rotation.z + self.tumble),
            Axis::Z => self.rotation.x = normalize_angle(self.rotation.x + self.tumble),
        }
        self.rotation.y = normalize_angle(self.rotation.y + self.angular_velocity);

        let mut status = DebrisStatus::Airborne;
        let rest_height = self.size.y / 2.0;
        if self.over_ground(tuning.ground) && self.position.y <= rest_height {
            self.position.y = rest_height;
            if self.velocity.y.abs() > tuning.bounce_threshold {
                self.velocity.y = -self.velocity.y * tuning.bounce;
            } else {
                self.velocity.y = 0.0;
                self.velocity.x *= tuning.friction;
                self.velocity.z *= tuning.friction;
                self.angular_velocity *= tuning.friction;
                self.tumble *= tuning.friction;
                status = DebrisStatus::Grounded;

                if self.is_still(tuning.settle_threshold) {
                    self.alive = false;
                    status = DebrisStatus::Settled;
                }
            }
        }

        if self.position.y < tuning.kill_depth {
            self.alive = false;
            status = DebrisStatus::Lost;
        }
        status
    }

    fn over_ground(&self, ground: Ground) -> bool {
        match ground {
            Ground::Unbounded => true,
            Ground::Bounded { half_extent } => {
                self.position.x.abs() <= half_extent && self.position.z.abs() <= half_extent
            }
            Ground::Absent => false,
        }
    }

    fn is_still(&self, threshold: f32) -> bool {
        self.velocity.x.abs() < threshold
            && self.velocity.z.abs() < threshold
            && self.angular_velocity.abs() < threshold
    }
}

/// Uniform sample in `[-range/2, range/2)`
fn spread(rng: &mut impl Rng, range: f32) -> f32 {
    if range <= 0.0 {
        return 0.0;
    }
    (rng.random::<f32>() - 0.5) * range
}

/// All debris currently in the scene
#[derive(Debug, Clone, Default)]
pub struct DebrisField {
    fragments: Vec<DebrisFragment>,
    next_id: u32,
}

impl DebrisField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id for a new fragment
    pub fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push(&mut self, fragment: DebrisFragment) {
        self.fragments.push(fragment);
    }

    /// Integrate every fragment and drop the ones that are gone
    ///
    /// Lost fragments are removed at once; settled ones linger for
    /// `settled_linger_ticks` so they stay visible where they came to rest.
    pub fn step(&mut self, tuning: &Tuning) {
        let linger = tuning.settled_linger_ticks;
        self.fragments.retain_mut(|fragment| {
            match fragment.integrate(tuning) {
                DebrisStatus::Lost => false,
                DebrisStatus::Dead => fragment.idle_ticks < linger,
                _ => true,
            }
        });
    }

    pub fn clear(&mut self) {
        self.fragments.clear();
    }

    pub fn fragments(&self) -> &[DebrisFragment] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn block() -> Block {
        Block {
            center: Vec2::new(1.5, 0.0),
            size: Vec2::new(1.0, 4.0),
            elevation: 2.5,
            height: 1.0,
            level: 1,
        }
    }

    fn slice() -> Cut {
        Cut {
            center: Vec2::new(3.5, 0.0),
            size: Vec2::new(3.0, 4.0),
            side: 1.0,
        }
    }

    #[test]
    fn test_cut_fragment_is_pushed_outward() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let fragment = DebrisFragment::from_cut(0, &block(), &slice(), Axis::X, &tuning, &mut rng);

        assert_eq!(fragment.position, Vec3::new(3.5, 2.5, 0.0));
        assert_eq!(fragment.size, Vec3::new(3.0, 1.0, 4.0));
        assert_eq!(fragment.velocity, Vec3::new(0.08, 0.0, 0.0));
        assert!(fragment.angular_velocity.abs() <= 0.04);
        assert!(fragment.tumble.abs() <= 0.05);
        assert!(fragment.alive);
    }

    #[test]
    fn test_falls_then_settles_under_friction() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut fragment =
            DebrisFragment::from_cut(0, &block(), &slice(), Axis::X, &tuning, &mut rng);
        fragment.velocity.y = -0.2;

        let mut touched_ground = false;
        let mut settled_at = None;
        for step in 0..2000 {
            match fragment.integrate(&tuning) {
                DebrisStatus::Grounded => touched_ground = true,
                DebrisStatus::Settled => {
                    settled_at = Some(step);
                    break;
                }
                DebrisStatus::Lost | DebrisStatus::Dead => panic!("fragment should settle"),
                DebrisStatus::Airborne => {}
            }
        }

        assert!(touched_ground);
        assert!(settled_at.is_some());
        assert!(!fragment.alive);
        assert_eq!(fragment.position.y, 0.5);
        assert!(fragment.velocity.x.abs() < tuning.settle_threshold);
        assert!(fragment.angular_velocity.abs() < tuning.settle_threshold);
    }

    #[test]
    fn test_hard_landing_bounces() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut fragment =
            DebrisFragment::from_cut(0, &block(), &slice(), Axis::X, &tuning, &mut rng);
        fragment.position.y = 0.6;
        fragment.velocity.y = -0.5;

        fragment.integrate(&tuning);
        assert_eq!(fragment.position.y, 0.5);
        assert!(fragment.velocity.y > 0.0);
        assert!((fragment.velocity.y - 0.53 * 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_without_ground_fragment_is_lost() {
        let tuning = Tuning {
            ground: Ground::Absent,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let mut field = DebrisField::new();
        let id = field.next_id();
        field.push(DebrisFragment::from_cut(id, &block(), &slice(), Axis::X, &tuning, &mut rng));

        for _ in 0..200 {
            field.step(&tuning);
        }
        assert!(field.is_empty());
    }

    #[test]
    fn test_leaves_bounded_ground_over_the_edge() {
        let tuning = Tuning {
            ground: Ground::Bounded { half_extent: 2.0 },
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let mut fragment =
            DebrisFragment::from_cut(0, &block(), &slice(), Axis::X, &tuning, &mut rng);
        fragment.velocity.x = 0.5;

        let mut lost = false;
        for _ in 0..500 {
            if fragment.integrate(&tuning) == DebrisStatus::Lost {
                lost = true;
                break;
            }
        }
        assert!(lost);
        assert!(!fragment.alive);
    }

    #[test]
    fn test_settled_fragment_lingers_then_is_pruned() {
        let tuning = Tuning {
            settled_linger_ticks: 5,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(9);
        let mut field = DebrisField::new();
        let mut fragment =
            DebrisFragment::from_cut(0, &block(), &slice(), Axis::X, &tuning, &mut rng);
        fragment.alive = false;
        field.push(fragment);

        for _ in 0..4 {
            field.step(&tuning);
        }
        assert_eq!(field.len(), 1);
        assert!(!field.fragments()[0].alive);
        field.step(&tuning);
        assert!(field.is_empty());
    }
}
