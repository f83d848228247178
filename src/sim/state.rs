//! Game session and core simulation state
//!
//! A [`GameSession`] owns everything one tower needs: the stack, the active
//! block, debris, deferred actions and the RNG. Input events are applied the
//! moment they arrive; motion and physics advance in fixed steps.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::active::{ActiveBlock, MotionState, SpawnParams};
use super::block::{Axis, Block, Stack};
use super::camera::{CameraRig, Hammer};
use super::clock::FixedStep;
use super::debris::{DebrisField, DebrisFragment};
use super::placement::{self, Placement};
use super::schedule::{Action, Scheduler};
use super::snapshot::Snapshot;
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Anchor only, waiting for the first tap
    NotStarted,
    /// A block is sliding or about to spawn
    Playing,
    /// Missed; exit transition running
    Ending,
    /// Run ended, waiting for restart
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::NotStarted => "not_started",
            GamePhase::Playing => "playing",
            GamePhase::Ending => "ending",
            GamePhase::GameOver => "game_over",
        }
    }
}

/// Notifications for the presentation layer, drained each frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    Started,
    Spawned { level: u32, axis: Axis },
    Placed {
        level: u32,
        overlap: f32,
        cut: f32,
        /// Near-perfect drop (cosmetic feedback only)
        aligned: bool,
    },
    Missed { level: u32 },
    GameOver { score: u32 },
    Restarted,
}

/// One game of stacking, from anchor to miss
#[derive(Debug, Clone)]
pub struct GameSession {
    tuning: Tuning,
    seed: u64,
    rng: Pcg32,
    /// Games started since creation (re-seeds the RNG per game)
    games: u64,
    /// Simulation step counter
    pub time_ticks: u64,
    phase: GamePhase,
    score: u32,
    game_over: bool,
    speed: f32,
    next_axis: Axis,
    stack: Stack,
    active: Option<ActiveBlock>,
    debris: DebrisField,
    scheduler: Scheduler,
    camera: CameraRig,
    hammer: Option<Hammer>,
    clock: FixedStep,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Create a session showing only the anchor
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
            games: 0,
            time_ticks: 0,
            phase: GamePhase::NotStarted,
            score: 0,
            game_over: false,
            speed: tuning.initial_speed,
            next_axis: tuning.first_axis,
            stack: Stack::new(&tuning),
            active: None,
            debris: DebrisField::new(),
            scheduler: Scheduler::new(),
            camera: CameraRig::new(&tuning),
            hammer: tuning.hammer.map(Hammer::new),
            clock: FixedStep::new(),
            events: Vec::new(),
            tuning,
        }
    }

    /// Begin the first game. No-op once a game has started.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::NotStarted {
            return false;
        }
        self.events.push(GameEvent::Started);
        self.begin();
        log::info!("Game started (seed {})", self.seed);
        true
    }

    /// Discard the current game and begin a new one
    pub fn request_restart(&mut self) {
        let previous = self.score;
        self.scheduler.cancel_all();
        self.games += 1;
        self.rng = Pcg32::seed_from_u64(self.seed.wrapping_add(self.games));

        self.stack.reset(&self.tuning);
        self.debris.clear();
        self.active = None;
        self.score = 0;
        self.game_over = false;
        self.speed = self.tuning.initial_speed;
        self.next_axis = self.tuning.first_axis;
        self.camera = CameraRig::new(&self.tuning);
        self.hammer = self.tuning.hammer.map(Hammer::new);
        self.clock.reset();

        self.events.push(GameEvent::Restarted);
        self.begin();
        log::info!("Game restarted (previous score {})", previous);
    }

    fn begin(&mut self) {
        self.phase = GamePhase::Playing;
        self.spawn_next();
    }

    /// Single pointer action, routed by phase
    pub fn tap(&mut self) {
        match self.phase {
            GamePhase::NotStarted => {
                self.start();
            }
            GamePhase::Playing => {
                self.request_placement();
            }
            // Exit transition still running
            GamePhase::Ending => {}
            GamePhase::GameOver => self.request_restart(),
        }
    }

    /// Drop the active block now
    ///
    /// Returns false without touching any state when no block is moving
    /// (between a placement and the next spawn, or after a miss).
    pub fn request_placement(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if !active.freeze() {
            return false;
        }

        let top = *self.stack.top();
        match placement::resolve(active, &top) {
            Placement::Hit(hit) => {
                active.block = hit.committed;
                active.state = MotionState::Committed;
                self.stack.commit(hit.committed);
                self.score += 1;
                self.speed = (self.speed + self.tuning.speed_increment).min(self.tuning.max_speed);

                if let Some(cut) = &hit.cut {
                    let id = self.debris.next_id();
                    let fragment = DebrisFragment::from_cut(
                        id,
                        &hit.committed,
                        cut,
                        active.axis,
                        &self.tuning,
                        &mut self.rng,
                    );
                    self.debris.push(fragment);
                }

                self.camera.follow(hit.committed.elevation);
                self.scheduler
                    .schedule(self.time_ticks, self.tuning.spawn_delay_ticks, Action::SpawnNext);

                log::debug!(
                    "Placed level {}: delta {:.3}, overlap {:.3}, cut {:.3}",
                    hit.committed.level,
                    hit.delta,
                    hit.overlap,
                    hit.cut_size
                );
                self.events.push(GameEvent::Placed {
                    level: hit.committed.level,
                    overlap: hit.overlap,
                    cut: hit.cut_size,
                    aligned: hit.delta.abs() < self.tuning.perfect_tolerance,
                });
            }
            Placement::Miss { delta } => {
                active.state = MotionState::Rejected;
                let id = self.debris.next_id();
                let fragment = DebrisFragment::from_block(
                    id,
                    &active.block,
                    active.velocity(),
                    active.axis,
                    &self.tuning,
                    &mut self.rng,
                );
                self.debris.push(fragment);

                self.game_over = true;
                self.phase = GamePhase::Ending;
                self.camera.zoom_out(self.tuning.exit_zoom);
                self.scheduler.schedule(
                    self.time_ticks,
                    self.tuning.exit_transition_ticks,
                    Action::FinishExit,
                );

                log::info!(
                    "Missed at level {} (delta {:.3}), final score {}",
                    active.block.level,
                    delta,
                    self.score
                );
                self.events.push(GameEvent::Missed {
                    level: active.block.level,
                });
            }
        }
        true
    }

    fn spawn_next(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let previous = self
            .active
            .as_ref()
            .filter(|a| a.state == MotionState::Committed)
            .map(|a| a.block);
        let axis = self.next_axis;
        self.next_axis = axis.other();

        let params = SpawnParams {
            axis,
            speed: self.speed,
            range_factor: self.tuning.move_range_factor,
            elevation: self.stack.next_elevation(),
            height: self.tuning.block_height,
            level: self.stack.len() as u32,
        };
        let active = ActiveBlock::spawn(self.stack.top(), previous.as_ref(), params);
        log::trace!("Spawned level {} along {:?}", params.level, axis);

        if let Some(hammer) = &mut self.hammer {
            if hammer.on_spawn(self.stack.len()) {
                log::trace!("Hammer strike, target offset {:.2}", hammer.target);
            }
        }

        self.events.push(GameEvent::Spawned {
            level: params.level,
            axis,
        });
        self.active = Some(active);
    }

    fn run_action(&mut self, action: Action) {
        log::trace!("Deferred action {:?} at tick {}", action, self.time_ticks);
        match action {
            Action::SpawnNext => self.spawn_next(),
            Action::FinishExit => {
                if self.phase != GamePhase::Ending {
                    return;
                }
                // Hold the game-over screen until the exit zoom has landed
                if !self.camera.settled() {
                    self.scheduler.schedule(self.time_ticks, 1, Action::FinishExit);
                    return;
                }
                self.phase = GamePhase::GameOver;
                self.events.push(GameEvent::GameOver { score: self.score });
                log::info!("Game over with score {}", self.score);
            }
        }
    }

    /// Advance exactly one fixed step
    pub fn step(&mut self) {
        if self.phase == GamePhase::NotStarted {
            return;
        }
        self.time_ticks += 1;

        for action in self.scheduler.take_due(self.time_ticks) {
            self.run_action(action);
        }

        if self.phase == GamePhase::Playing {
            if let Some(active) = &mut self.active {
                active.advance();
            }
        }

        self.debris.step(&self.tuning);
        self.camera.step();
        if let Some(hammer) = &mut self.hammer {
            hammer.step();
        }
    }

    /// Feed a frame delta (seconds) to the fixed-step clock without stepping
    ///
    /// For drivers that need to act between steps; they must call
    /// [`GameSession::step`] the returned number of times.
    pub fn frame_steps(&mut self, dt: f32) -> u32 {
        self.clock.advance(dt)
    }

    /// Advance by a frame delta (seconds); returns the number of steps run
    pub fn tick(&mut self, dt: f32) -> u32 {
        let steps = self.frame_steps(dt);
        for _ in 0..steps {
            self.step();
        }
        steps
    }

    // === Observable state ===

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Speed the next spawned block will move at
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// The active block, including one that just committed or missed
    pub fn active(&self) -> Option<&ActiveBlock> {
        self.active.as_ref()
    }

    /// The block still in play (spawned, moving or resolving)
    pub fn moving_block(&self) -> Option<&ActiveBlock> {
        self.active.as_ref().filter(|a| {
            !matches!(a.state, MotionState::Committed | MotionState::Rejected)
        })
    }

    pub fn debris(&self) -> &DebrisField {
        &self.debris
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// Current downward stack compression (0 without the hammer)
    pub fn stack_offset(&self) -> f32 {
        self.hammer.as_ref().map_or(0.0, |h| h.offset)
    }

    pub fn top(&self) -> &Block {
        self.stack.top()
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    #[cfg(test)]
    pub(crate) fn active_mut(&mut self) -> Option<&mut ActiveBlock> {
        self.active.as_mut()
    }

    #[cfg(test)]
    pub(crate) fn pending_actions(&self) -> usize {
        self.scheduler.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn quick_tuning() -> Tuning {
        Tuning {
            initial_speed: 0.5,
            speed_increment: 0.0,
            max_speed: 1.0,
            ..Tuning::default()
        }
    }

    fn started(tuning: Tuning) -> GameSession {
        let mut session = GameSession::new(tuning, 42);
        assert!(session.start());
        session
    }

    /// Move the active block so it sits `delta` from the top block
    fn place_at(session: &mut GameSession, delta: f32) -> bool {
        session.step();
        let top = *session.top();
        let active = session.active_mut().expect("block should be active");
        let axis = active.axis;
        axis.set(&mut active.block.center, axis.of(top.center) + delta);
        session.request_placement()
    }

    /// Step through the exit transition; returns the steps it took
    fn finish_exit(session: &mut GameSession) -> u32 {
        let mut steps = 0;
        while session.phase() == GamePhase::Ending && steps < 10_000 {
            session.step();
            steps += 1;
        }
        steps
    }

    fn wait_for_spawn(session: &mut GameSession) {
        for _ in 0..session.tuning().spawn_delay_ticks {
            session.step();
        }
        assert!(session.moving_block().is_some());
    }

    #[test]
    fn test_new_session_waits_for_start() {
        let mut session = GameSession::new(Tuning::default(), 1);
        assert_eq!(session.phase(), GamePhase::NotStarted);
        assert!(session.active().is_none());
        assert!(!session.request_placement());

        session.step();
        assert_eq!(session.time_ticks, 0);

        session.tap();
        assert_eq!(session.phase(), GamePhase::Playing);
        assert!(session.active().is_some());
        assert!(!session.start());
    }

    #[test]
    fn test_centered_placement_after_motion() {
        let mut session = started(quick_tuning());
        assert_eq!(session.active().map(|a| a.offset()), Some(-4.0));

        // -4.0 + 8 * 0.5 = 0.0 exactly
        for _ in 0..8 {
            session.step();
        }
        assert_eq!(session.active().map(|a| a.offset()), Some(0.0));

        assert!(session.request_placement());
        assert_eq!(session.score(), 1);
        assert_eq!(session.stack().len(), 2);
        assert_eq!(session.top().size, Vec2::splat(4.0));
        assert!(session.debris().is_empty());
    }

    #[test]
    fn test_trim_spawns_single_fragment() {
        let mut session = started(quick_tuning());
        assert!(place_at(&mut session, 3.0));

        assert_eq!(session.score(), 1);
        assert_eq!(session.top().size.x, 1.0);
        assert_eq!(session.debris().len(), 1);
        let fragment = &session.debris().fragments()[0];
        assert_eq!(fragment.size.x, 3.0);
        assert!(fragment.position.x > session.top().center.x);
        assert!(fragment.velocity.x > 0.0);
    }

    #[test]
    fn test_miss_ends_game_without_committing() {
        let mut session = started(quick_tuning());
        assert!(place_at(&mut session, 5.0));

        assert!(session.is_game_over());
        assert_eq!(session.phase(), GamePhase::Ending);
        assert_eq!(session.stack().len(), 1);
        assert_eq!(session.score(), 0);
        assert_eq!(session.debris().len(), 1);
        assert_eq!(session.debris().fragments()[0].size.x, 4.0);
        assert!(session.moving_block().is_none());

        // Taps are ignored while the exit transition runs
        session.tap();
        assert_eq!(session.phase(), GamePhase::Ending);

        let steps = finish_exit(&mut session);
        assert!(steps >= session.tuning().exit_transition_ticks);
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert!(session.camera().settled());

        let events = session.drain_events();
        assert!(events.contains(&GameEvent::GameOver { score: 0 }));
    }

    #[test]
    fn test_slow_exit_zoom_delays_game_over() {
        let tuning = Tuning {
            camera_lerp: 0.02,
            ..quick_tuning()
        };
        let mut session = started(tuning);
        assert!(place_at(&mut session, 5.0));

        for _ in 0..session.tuning().exit_transition_ticks {
            session.step();
        }
        // Fixed delay is over but the camera is still pulling back
        assert_eq!(session.phase(), GamePhase::Ending);
        assert!(session.camera().zoom > 0.5);

        finish_exit(&mut session);
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert!(session.camera().settled());
        assert_eq!(session.camera().zoom, 0.5);
    }

    #[test]
    fn test_double_placement_is_ignored() {
        let mut session = started(quick_tuning());
        assert!(place_at(&mut session, 1.0));
        let score = session.score();
        let len = session.stack().len();
        let debris = session.debris().len();

        assert!(!session.request_placement());
        assert_eq!(session.score(), score);
        assert_eq!(session.stack().len(), len);
        assert_eq!(session.debris().len(), debris);
    }

    #[test]
    fn test_next_block_spawns_after_delay_on_other_axis() {
        let mut session = started(quick_tuning());
        assert!(place_at(&mut session, 1.0));
        assert!(session.moving_block().is_none());

        for _ in 0..session.tuning().spawn_delay_ticks - 1 {
            session.step();
        }
        assert!(session.moving_block().is_none());
        session.step();

        let active = session.moving_block().expect("next block should spawn");
        assert_eq!(active.axis, Axis::Z);
        assert_eq!(active.block.level, 2);
        assert_eq!(active.block.size, Vec2::new(3.0, 4.0));
        assert_eq!(active.block.elevation, 3.5);
    }

    #[test]
    fn test_speed_ramps_and_clamps() {
        let tuning = Tuning {
            initial_speed: 0.5,
            speed_increment: 0.25,
            max_speed: 1.0,
            ..Tuning::default()
        };
        let mut session = started(tuning);
        for hits in 1..=4u32 {
            assert!(place_at(&mut session, 0.0));
            let expected = (0.5 + hits as f32 * 0.25).min(1.0);
            assert_eq!(session.speed(), expected);
            wait_for_spawn(&mut session);
            assert_eq!(session.moving_block().map(|a| a.speed), Some(expected));
        }
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut session = started(quick_tuning());
        assert!(place_at(&mut session, 2.0));
        wait_for_spawn(&mut session);
        assert!(place_at(&mut session, 9.0));
        assert!(session.is_game_over());

        session.request_restart();
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.score(), 0);
        assert!(!session.is_game_over());
        assert_eq!(session.stack().len(), 1);
        assert!(session.debris().is_empty());
        assert_eq!(session.speed(), session.tuning().initial_speed);
        assert_eq!(session.moving_block().map(|a| a.axis), Some(Axis::X));
        assert_eq!(session.camera().zoom, 1.0);
    }

    #[test]
    fn test_restart_cancels_pending_exit() {
        let mut session = started(quick_tuning());
        assert!(place_at(&mut session, 6.0));
        assert_eq!(session.pending_actions(), 1);

        session.request_restart();
        assert_eq!(session.pending_actions(), 0);
        for _ in 0..session.tuning().exit_transition_ticks * 2 {
            session.step();
        }
        assert_eq!(session.phase(), GamePhase::Playing);
        assert!(!session.is_game_over());
    }

    #[test]
    fn test_restart_cancels_pending_spawn() {
        let mut session = started(quick_tuning());
        assert!(place_at(&mut session, 0.0));
        session.request_restart();

        for _ in 0..session.tuning().spawn_delay_ticks * 2 {
            session.step();
        }
        let active = session.moving_block().expect("fresh block");
        assert_eq!(active.block.level, 1);
        assert_eq!(session.stack().len(), 1);
    }

    #[test]
    fn test_tap_restarts_after_game_over() {
        let mut session = started(quick_tuning());
        assert!(place_at(&mut session, 5.0));
        finish_exit(&mut session);
        assert_eq!(session.phase(), GamePhase::GameOver);
        session.drain_events();

        session.tap();
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.drain_events()[0], GameEvent::Restarted);
    }

    #[test]
    fn test_tick_runs_fixed_steps() {
        let mut session = started(quick_tuning());
        let steps = session.tick(crate::consts::SIM_DT * 3.5);
        assert!(steps == 3 || steps == 4);
        assert_eq!(session.time_ticks, steps as u64);
    }

    #[test]
    fn test_aligned_flag_is_cosmetic() {
        let mut session = started(quick_tuning());
        assert!(place_at(&mut session, 0.05));
        let aligned = session.drain_events().into_iter().any(|e| {
            matches!(e, GameEvent::Placed { aligned: true, .. })
        });
        assert!(aligned);
        assert_eq!(session.score(), 1);
    }
}
