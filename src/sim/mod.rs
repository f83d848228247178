//! Deterministic stacking simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod active;
pub mod block;
pub mod camera;
pub mod clock;
pub mod debris;
pub mod placement;
pub mod schedule;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use active::{ActiveBlock, MotionState, SpawnParams};
pub use block::{Axis, Block, Stack};
pub use camera::{CameraRig, Hammer};
pub use clock::FixedStep;
pub use debris::{DebrisField, DebrisFragment, DebrisStatus};
pub use placement::{Cut, Hit, Placement, resolve};
pub use schedule::{Action, Scheduler};
pub use snapshot::Snapshot;
pub use state::{GameEvent, GamePhase, GameSession};
pub use tick::{TickInput, tick};
