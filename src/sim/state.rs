//! Game state and the stacking state machine
//!
//! `GameState` owns the tower, the moving block, debris, difficulty and the
//! camera. Every mutation goes through `start`, `place` or the per-tick
//! update in `tick.rs`, so a placement either fully commits or ends the run.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::debris::DebrisField;
use super::geometry::{Axis, Block, Trim, trim_block};
use crate::consts::*;
use crate::palette::block_color;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing moving
    Menu,
    /// Active gameplay
    Playing,
    /// The tower collapsed
    GameOver,
}

/// Things that happened during a tick, for the feedback collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fresh session began
    Started,
    /// A block was trimmed and added to the tower
    Placed { score: u32, overlap: f32, perfect: bool },
    /// The block missed; the session is over
    Collapsed { score: u32 },
    /// Every `milestone_interval`-th placement
    Milestone { score: u32 },
    /// A debris particle fell out of view
    DebrisRemoved { id: u32 },
}

/// Result of a placement attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    /// Not playing, or nothing to place
    Ignored,
    Placed { score: u32 },
    Collapsed,
}

/// Tunables the simulation reads at runtime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub camera_follow_rate: f32,
    pub milestone_interval: u32,
    /// Spawn falling debris for cut-off pieces
    pub spawn_debris: bool,
    /// Jump the camera instead of easing it
    pub snap_camera: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            camera_follow_rate: CAMERA_FOLLOW_RATE,
            milestone_interval: MILESTONE_INTERVAL,
            spawn_debris: true,
            snap_camera: false,
        }
    }
}

/// The block currently sliding above the tower
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveBlock {
    pub block: Block,
    pub axis: Axis,
    /// Tower index this block will occupy once placed
    pub level: u32,
    /// Oscillation clock (already scaled by speed)
    pub move_time: f32,
}

impl ActiveBlock {
    /// Advance the oscillation by `dt` at `speed`
    ///
    /// Only the axis coordinate moves; the others keep their spawn values.
    pub fn oscillate(&mut self, dt: f32, speed: f32) {
        self.move_time += dt * speed;
        let offset = (self.move_time * OSCILLATION_FREQUENCY).sin() * MOVE_RANGE;
        self.axis.set(&mut self.block.position, offset);
    }

    /// Where the block would be after another `dt` at `speed`
    pub fn peek(&self, dt: f32, speed: f32) -> f32 {
        ((self.move_time + dt * speed) * OSCILLATION_FREQUENCY).sin() * MOVE_RANGE
    }
}

/// The immovable block at the bottom of every tower
pub fn base_block() -> Block {
    Block::new(
        Vec3::ZERO,
        Vec3::new(INITIAL_SIZE, BLOCK_HEIGHT, INITIAL_SIZE),
        block_color(0),
    )
}

/// Spawn the mover for `level` one block above `prev`, pulled back by the
/// travel range along its axis
pub fn spawn_next_block(prev: &Block, level: u32) -> ActiveBlock {
    let axis = Axis::for_level(level);
    let mut position = prev.position + Vec3::Y * BLOCK_HEIGHT;
    let start = axis.get(position) - MOVE_RANGE;
    axis.set(&mut position, start);

    ActiveBlock {
        block: Block::new(position, prev.size, block_color(level)),
        axis,
        level,
        move_time: 0.0,
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub phase: GamePhase,
    /// Placed blocks, base first
    pub stack: Vec<Block>,
    pub active: Option<ActiveBlock>,
    pub debris: DebrisField,
    /// Successful placements this session
    pub score: u32,
    /// Oscillation speed scalar
    pub speed: f32,
    pub camera: Camera,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub config: SimConfig,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a state sitting on the menu with the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, SimConfig::default())
    }

    pub fn with_config(seed: u64, config: SimConfig) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            stack: vec![base_block()],
            active: None,
            debris: DebrisField::new(),
            score: 0,
            speed: MOVE_SPEED_BASE,
            camera: Camera::default(),
            time_ticks: 0,
            config,
            events: Vec::new(),
        }
    }

    /// Begin a fresh session (from the menu or after a collapse)
    ///
    /// In-flight debris and the mover are discarded wholesale.
    pub fn start(&mut self) {
        let base = base_block();
        self.stack.clear();
        self.stack.push(base);
        self.debris.clear();
        self.score = 0;
        self.speed = MOVE_SPEED_BASE;
        self.camera.reset();
        self.active = Some(spawn_next_block(&base, 1));
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::Started);
        log::info!("Session started (seed {})", self.seed);
    }

    /// The block on top of the tower
    pub fn top(&self) -> Option<&Block> {
        self.stack.last()
    }

    /// Drop the active block where it currently is
    pub fn place(&mut self) -> PlaceOutcome {
        if self.phase != GamePhase::Playing {
            return PlaceOutcome::Ignored;
        }
        let Some(&prev) = self.stack.last() else {
            return PlaceOutcome::Ignored;
        };
        let Some(active) = self.active.take() else {
            return PlaceOutcome::Ignored;
        };

        match trim_block(&prev, &active.block, active.axis) {
            Trim::Collapse => {
                self.phase = GamePhase::GameOver;
                self.events.push(GameEvent::Collapsed { score: self.score });
                log::info!(
                    "Tower collapsed at level {} (score {})",
                    active.level,
                    self.score
                );
                PlaceOutcome::Collapsed
            }
            Trim::Cut(cut) => {
                self.stack.push(cut.placed);
                self.score = (self.stack.len() - 1) as u32;

                if let Some(piece) = cut.debris.filter(|_| self.config.spawn_debris) {
                    self.debris.spawn(piece, active.axis, cut.sign(), &mut self.rng);
                }

                self.speed += MOVE_SPEED_INCREMENT;
                self.active = Some(spawn_next_block(&cut.placed, self.stack.len() as u32));

                self.events.push(GameEvent::Placed {
                    score: self.score,
                    overlap: cut.overlap,
                    perfect: cut.is_perfect(),
                });
                let interval = self.config.milestone_interval;
                if interval > 0 && self.score % interval == 0 {
                    self.events.push(GameEvent::Milestone { score: self.score });
                    log::info!("Milestone reached: {}", self.score);
                }

                log::debug!(
                    "Placed level {} on {:?}: delta {:.3}, overlap {:.3}",
                    active.level,
                    active.axis,
                    cut.delta,
                    cut.overlap
                );
                PlaceOutcome::Placed { score: self.score }
            }
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Tower height in blocks, base included
    pub fn height(&self) -> usize {
        self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.start();
        state.drain_events();
        state
    }

    fn set_active_offset(state: &mut GameState, offset: f32) {
        let active = state.active.as_mut().unwrap();
        let axis = active.axis;
        axis.set(&mut active.block.position, offset);
    }

    #[test]
    fn test_new_state_is_menu() {
        let state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.active.is_none());
        assert_eq!(state.stack.len(), 1);
    }

    #[test]
    fn test_start_resets_session() {
        let mut state = playing(5);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stack, vec![base_block()]);

        let active = state.active.unwrap();
        assert_eq!(active.level, 1);
        assert_eq!(active.axis, Axis::X);
        assert_eq!(active.block.position, Vec3::new(-MOVE_RANGE, BLOCK_HEIGHT, 0.0));
        assert_eq!(active.block.size, base_block().size);
        assert_eq!(active.move_time, 0.0);

        set_active_offset(&mut state, 0.3);
        state.place();
        assert!(state.speed > MOVE_SPEED_BASE);

        state.start();
        assert_eq!(state.score, 0);
        assert_eq!(state.speed, MOVE_SPEED_BASE);
        assert_eq!(state.stack.len(), 1);
        assert!(state.debris.is_empty());
        assert_eq!(state.camera, Camera::default());
    }

    #[test]
    fn test_spawn_next_block_axis_and_offset() {
        let prev = Block::new(Vec3::new(0.5, 3.0, -0.25), Vec3::new(2.0, 1.0, 3.0), block_color(3));
        let active = spawn_next_block(&prev, 4);
        assert_eq!(active.axis, Axis::Z);
        assert_eq!(active.block.position, Vec3::new(0.5, 4.0, -0.25 - MOVE_RANGE));
        assert_eq!(active.block.size, prev.size);
        assert_eq!(active.block.color, block_color(4));
    }

    #[test]
    fn test_oscillate_is_bounded_sinusoid() {
        let mut active = spawn_next_block(&base_block(), 1);
        let z = active.block.position.z;
        let y = active.block.position.y;
        for _ in 0..10_000 {
            active.oscillate(1.0 / 60.0, 1.5);
            assert!(active.block.position.x.abs() <= MOVE_RANGE + 1e-4);
            assert_eq!(active.block.position.z, z);
            assert_eq!(active.block.position.y, y);
        }
        let expected = (active.move_time * OSCILLATION_FREQUENCY).sin() * MOVE_RANGE;
        assert_eq!(active.block.position.x, expected);
    }

    #[test]
    fn test_place_success_end_to_end() {
        let mut state = playing(9);
        set_active_offset(&mut state, 1.0);

        assert_eq!(state.place(), PlaceOutcome::Placed { score: 1 });
        assert_eq!(state.stack.len(), 2);
        assert_eq!(state.score, 1);
        assert_eq!(state.phase, GamePhase::Playing);

        let placed = state.stack[1];
        assert_eq!(placed.size, Vec3::new(2.5, 1.0, 3.5));
        assert_eq!(placed.position.y, BLOCK_HEIGHT);

        assert_eq!(state.debris.len(), 1);
        let debris = state.debris.iter().next().unwrap();
        assert!((debris.block.size.x - 1.0).abs() < 1e-6);
        assert!(debris.velocity.x >= 0.0);

        let next = state.active.unwrap();
        assert_eq!(next.level, 2);
        assert_eq!(next.axis, Axis::Z);
        assert_eq!(next.block.size, placed.size);

        assert!(matches!(
            state.drain_events().as_slice(),
            [GameEvent::Placed { score: 1, perfect: false, .. }]
        ));
    }

    #[test]
    fn test_place_collapse_end_to_end() {
        let mut state = playing(9);
        set_active_offset(&mut state, 4.0);

        assert_eq!(state.place(), PlaceOutcome::Collapsed);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.stack.len(), 1);
        assert_eq!(state.score, 0);
        assert!(state.active.is_none());
        assert!(state.debris.is_empty());
        assert_eq!(state.drain_events(), vec![GameEvent::Collapsed { score: 0 }]);
    }

    #[test]
    fn test_place_guarded_outside_play() {
        let mut state = GameState::new(1);
        assert_eq!(state.place(), PlaceOutcome::Ignored);
        assert!(state.events.is_empty());

        let mut state = playing(1);
        set_active_offset(&mut state, 4.0);
        state.place();
        state.drain_events();
        assert_eq!(state.place(), PlaceOutcome::Ignored);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_perfect_placement_skips_debris() {
        let mut state = playing(2);
        set_active_offset(&mut state, 0.0);
        state.place();
        assert!(state.debris.is_empty());
        assert_eq!(state.stack[1].size, base_block().size);
        assert!(matches!(
            state.drain_events().as_slice(),
            [GameEvent::Placed { perfect: true, .. }]
        ));
    }

    #[test]
    fn test_score_counts_placements_and_milestones() {
        let mut state = playing(4);
        for k in 1..=25u32 {
            set_active_offset(&mut state, 0.0);
            assert_eq!(state.place(), PlaceOutcome::Placed { score: k });
            assert_eq!(state.score, k);
            assert_eq!(state.stack.len() as u32, k + 1);
        }

        let milestones: Vec<u32> = state
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::Milestone { score } => Some(score),
                _ => None,
            })
            .collect();
        assert_eq!(milestones, vec![10, 20]);
        assert!((state.speed - (MOVE_SPEED_BASE + 25.0 * MOVE_SPEED_INCREMENT)).abs() < 1e-4);
    }

    #[test]
    fn test_axis_alternates_and_stack_invariants() {
        let mut state = playing(8);
        let offsets = [0.4, -0.3, 0.2, -0.1, 0.25, 0.0, -0.2];
        for (i, &offset) in offsets.iter().enumerate() {
            let level = i as u32 + 1;
            let active = state.active.unwrap();
            assert_eq!(active.level, level);
            assert_eq!(active.axis, if level % 2 == 1 { Axis::X } else { Axis::Z });

            // Land relative to the block beneath
            let below = *state.top().unwrap();
            set_active_offset(&mut state, active.axis.get(below.position) + offset);
            assert!(matches!(state.place(), PlaceOutcome::Placed { .. }));

            let placed = state.stack[level as usize];
            assert_eq!(placed.position.y, level as f32 * BLOCK_HEIGHT);
            assert!(placed.within_along(&below, active.axis, 1e-4));
        }
    }

    #[test]
    fn test_debris_disabled_by_config() {
        let mut state = GameState::with_config(
            3,
            SimConfig {
                spawn_debris: false,
                ..Default::default()
            },
        );
        state.start();
        set_active_offset(&mut state, 1.0);
        state.place();
        assert!(state.debris.is_empty());
        assert_eq!(state.score, 1);
    }
}
