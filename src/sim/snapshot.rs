//! Serializable view of everything a renderer draws

use glam::Vec3;
use serde::Serialize;

use super::active::MotionState;
use super::block::{Axis, Block};
use super::state::{GamePhase, GameSession};

#[derive(Debug, Clone, Serialize)]
pub struct ActiveView {
    pub block: Block,
    pub axis: Axis,
    pub state: MotionState,
}

#[derive(Debug, Clone, Serialize)]
pub struct DebrisView {
    pub id: u32,
    pub position: Vec3,
    pub size: Vec3,
    pub rotation: Vec3,
    pub level: u32,
    pub alive: bool,
}

/// Observable game state at one instant
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u32,
    pub game_over: bool,
    pub speed: f32,
    pub stack: Vec<Block>,
    pub active: Option<ActiveView>,
    pub debris: Vec<DebrisView>,
    pub camera_height: f32,
    pub zoom: f32,
    pub stack_offset: f32,
}

impl Snapshot {
    pub fn capture(session: &GameSession) -> Self {
        Self {
            phase: session.phase(),
            score: session.score(),
            game_over: session.is_game_over(),
            speed: session.speed(),
            stack: session.stack().iter().copied().collect(),
            active: session.moving_block().map(|a| ActiveView {
                block: a.block,
                axis: a.axis,
                state: a.state,
            }),
            debris: session
                .debris()
                .fragments()
                .iter()
                .map(|f| DebrisView {
                    id: f.id,
                    position: f.position,
                    size: f.size,
                    rotation: f.rotation,
                    level: f.level,
                    alive: f.alive,
                })
                .collect(),
            camera_height: session.camera().height,
            zoom: session.camera().zoom,
            stack_offset: session.stack_offset(),
        }
    }
}
