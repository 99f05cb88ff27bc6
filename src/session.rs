//! Input and session control
//!
//! One abstract "action" drives the whole game: it starts a session from the
//! menu or after a collapse, and drops the block while playing. Keyboard,
//! pointer and touch can all report the same physical gesture, so presses are
//! latched per source and sources firing in the same frame count once.

use crate::audio::{AudioCue, AudioManager, ToneOutput};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::highscores::HighScore;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, PlaceOutcome, TickInput, tick};

/// Physical input that can fire the action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard,
    Pointer,
    Touch,
}

impl InputSource {
    fn bit(self) -> u8 {
        match self {
            InputSource::Keyboard => 1 << 0,
            InputSource::Pointer => 1 << 1,
            InputSource::Touch => 1 << 2,
        }
    }
}

/// Debounces presses into discrete actions
///
/// Each source counts on its own press edge, so key auto-repeat is ignored.
/// Presses from different sources within one frame are the same gesture
/// (a touch followed by its compatibility mouse event) and count once.
#[derive(Debug, Clone, Default)]
pub struct ActionLatch {
    held: u8,
    pending: u8,
    /// An action was already counted this frame
    counted: bool,
}

impl ActionLatch {
    /// Returns true if this press started a new action
    pub fn press(&mut self, source: InputSource) -> bool {
        let bit = source.bit();
        if self.held & bit != 0 {
            return false;
        }
        self.held |= bit;
        self.count()
    }

    pub fn release(&mut self, source: InputSource) {
        self.held &= !source.bit();
    }

    /// A complete gesture from a source that reports no press/release pair
    pub fn pulse(&mut self) -> bool {
        self.count()
    }

    fn count(&mut self) -> bool {
        if self.counted {
            return false;
        }
        self.counted = true;
        self.pending = self.pending.saturating_add(1);
        true
    }

    /// Close the merge window; the next press is a new gesture
    pub fn end_frame(&mut self) {
        self.counted = false;
    }

    /// Consume one pending action
    pub fn take(&mut self) -> bool {
        if self.pending > 0 {
            self.pending -= 1;
            true
        } else {
            false
        }
    }

    pub fn pending(&self) -> u8 {
        self.pending
    }

    /// Drop actions that have not been consumed yet
    pub fn clear_pending(&mut self) {
        self.pending = 0;
    }

    /// Forget held sources (e.g. on focus loss)
    pub fn reset_held(&mut self) {
        self.held = 0;
    }
}

/// Receives fire-and-forget feedback from the session
pub trait Feedback {
    /// A block was placed; `score` selects the pitch
    fn placement_succeeded(&mut self, _score: u32) {}
    /// The tower collapsed
    fn placement_failed(&mut self) {}
    /// Every Nth placement
    fn milestone(&mut self) {}
}

/// Feedback that goes nowhere
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFeedback;

impl Feedback for NoFeedback {}

impl<O: ToneOutput> Feedback for AudioManager<O> {
    fn placement_succeeded(&mut self, score: u32) {
        self.play(AudioCue::Place { score });
    }

    fn placement_failed(&mut self) {
        self.play(AudioCue::Fail);
    }
}

/// One player's game: simulation, high score, input and feedback
pub struct Session<F: Feedback = NoFeedback> {
    state: GameState,
    high_score: HighScore,
    latch: ActionLatch,
    accumulator: f32,
    idle_mode: bool,
    feedback: F,
}

impl<F: Feedback> Session<F> {
    /// A session on the menu screen
    pub fn new(state: GameState, feedback: F) -> Self {
        Self {
            state,
            high_score: HighScore::new(),
            latch: ActionLatch::default(),
            accumulator: 0.0,
            idle_mode: false,
            feedback,
        }
    }

    /// Build from settings (seed and sim tunables)
    pub fn from_settings(settings: &Settings, feedback: F) -> Self {
        let seed = settings.resolve_seed();
        log::info!("Game initialized with seed: {}", seed);
        Self::new(GameState::with_config(seed, settings.sim_config()), feedback)
    }

    pub fn press(&mut self, source: InputSource) {
        self.latch.press(source);
    }

    pub fn release(&mut self, source: InputSource) {
        self.latch.release(source);
    }

    /// Fire the abstract action once
    pub fn action(&mut self) {
        self.latch.pulse();
    }

    /// Forget every held source, for when the window loses focus and the
    /// matching releases will never arrive
    pub fn reset_input(&mut self) {
        self.latch.reset_held();
        log::debug!("Input reset");
    }

    pub fn set_idle_mode(&mut self, idle: bool) {
        self.idle_mode = idle;
        log::info!("Idle mode: {}", idle);
    }

    /// Advance by one rendered frame of `dt` seconds
    ///
    /// Actions are resolved between fixed substeps, never inside one.
    pub fn frame(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        self.accumulator += dt;

        if self.state.phase != GamePhase::Playing && self.latch.take() {
            self.begin();
        }

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = TickInput {
                place: self.state.phase == GamePhase::Playing && self.latch.take(),
                idle_mode: self.idle_mode,
            };
            if tick(&mut self.state, &input, SIM_DT) == PlaceOutcome::Collapsed {
                // Taps queued behind the fatal one must not skip the game over screen
                self.latch.clear_pending();
            }
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        self.latch.end_frame();
        self.dispatch_events();
    }

    /// Start or restart a session
    ///
    /// Whatever else was queued belonged to the gesture that started it.
    fn begin(&mut self) {
        self.state.start();
        self.high_score.begin_session();
        self.latch.clear_pending();
        self.accumulator = 0.0;
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Placed { score, .. } => {
                    if self.high_score.record(score) {
                        log::debug!("New high score: {}", score);
                    }
                    self.feedback.placement_succeeded(score);
                }
                GameEvent::Collapsed { score } => {
                    log::info!("Game over with score {} (best {})", score, self.high_score.best());
                    self.feedback.placement_failed();
                }
                GameEvent::Milestone { .. } => self.feedback.milestone(),
                GameEvent::Started | GameEvent::DebrisRemoved { .. } => {}
            }
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score.best()
    }

    pub fn is_new_best(&self) -> bool {
        self.high_score.is_new_best()
    }

    /// Read-only view for rendering
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for drivers and tests that pose the mover directly
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }
}
