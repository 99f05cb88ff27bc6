//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (debris launch is the single random draw)
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod camera;
pub mod debris;
pub mod geometry;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use debris::{Debris, DebrisField};
pub use geometry::{Axis, Block, Cut, Trim, trim_block};
pub use state::{
    ActiveBlock, GameEvent, GamePhase, GameState, PlaceOutcome, SimConfig, base_block,
    spawn_next_block,
};
pub use tick::{TickInput, tick};
