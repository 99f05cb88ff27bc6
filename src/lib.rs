//! Stacker - a tower stacking arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (overlap trimming, debris, camera, game state)
//! - `session`: Input debouncing, frame driving and feedback dispatch
//! - `audio`: Placement/failure cues and pitch selection
//! - `palette`: Cosmetic colour tags derived from stack height
//! - `settings`: Data-driven configuration

pub mod audio;
pub mod highscores;
pub mod palette;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::HighScore;
pub use session::{Feedback, InputSource, Session};
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta accepted from the frame clock (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Height of every block in the tower
    pub const BLOCK_HEIGHT: f32 = 1.0;
    /// Footprint of the base block (x and z)
    pub const INITIAL_SIZE: f32 = 3.5;

    /// Oscillation speed of a fresh session
    pub const MOVE_SPEED_BASE: f32 = 0.6;
    /// Speed gained per successful placement
    pub const MOVE_SPEED_INCREMENT: f32 = 0.01;
    /// Amplitude of the active block's travel
    pub const MOVE_RANGE: f32 = 5.0;
    /// Angular multiplier applied to the oscillation clock
    pub const OSCILLATION_FREQUENCY: f32 = 3.0;

    /// Downward acceleration of debris (units/s²)
    pub const GRAVITY: f32 = 9.8;
    /// Lateral debris motion is scaled up for visual flair
    pub const LATERAL_SPEED_SCALE: f32 = 5.0;
    /// Debris below this altitude is removed
    pub const DEBRIS_REMOVAL_Y: f32 = -10.0;
    /// Upper bound of the random upward pop given to new debris
    pub const DEBRIS_POP_MAX: f32 = 2.0;

    /// Camera rest position for an empty tower
    pub const CAMERA_START_POS: Vec3 = Vec3::new(10.0, 10.0, 10.0);
    /// Exponential smoothing rate for camera follow (per second)
    pub const CAMERA_FOLLOW_RATE: f32 = 2.5;

    /// Successful placements between celebrations
    pub const MILESTONE_INTERVAL: u32 = 10;

    /// Hue of the base block (degrees)
    pub const BASE_HUE: u32 = 200;
    /// Hue shift per level (degrees)
    pub const HUE_STEP: u32 = 6;
}

/// Linear interpolation with `t` clamped to [0, 1]
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

/// Side of the cut: +1 when the block landed past the one below, -1 otherwise
#[inline]
pub fn cut_sign(delta: f32) -> f32 {
    if delta > 0.0 { 1.0 } else { -1.0 }
}
