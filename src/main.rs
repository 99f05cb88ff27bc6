//! Stacker entry point
//!
//! Headless native driver: runs the autoplayer against a simulated 60 Hz
//! frame clock and reports each session. Rendering is left to a frontend.

use stacker::audio::AudioManager;
use stacker::sim::GamePhase;
use stacker::{Feedback, Session, Settings};

/// Frames simulated per run (two minutes at 60 Hz)
const DEMO_FRAMES: u32 = 60 * 120;
const FRAME_DT: f32 = 1.0 / 60.0;
/// Sessions the demo plays before exiting
const DEMO_SESSIONS: u32 = 3;

/// Audio plus a console celebration every milestone
struct ConsoleFeedback {
    audio: AudioManager,
    celebrations: u32,
}

impl Feedback for ConsoleFeedback {
    fn placement_succeeded(&mut self, score: u32) {
        self.audio.placement_succeeded(score);
    }

    fn placement_failed(&mut self) {
        self.audio.placement_failed();
    }

    fn milestone(&mut self) {
        self.celebrations += 1;
        log::info!("Milestone celebration #{}", self.celebrations);
    }
}

fn main() {
    env_logger::init();
    log::info!("Stacker (native) starting...");

    let settings = Settings::load();
    let mut audio: AudioManager = AudioManager::default();
    audio.apply_settings(&settings);

    let feedback = ConsoleFeedback {
        audio,
        celebrations: 0,
    };
    let mut session = Session::from_settings(&settings, feedback);
    session.set_idle_mode(true);

    let mut played = 0;
    let mut frames = 0;
    while played < DEMO_SESSIONS && frames < DEMO_FRAMES {
        if session.phase() != GamePhase::Playing {
            session.action();
        }
        session.frame(FRAME_DT);
        frames += 1;

        if session.phase() == GamePhase::GameOver {
            played += 1;
            let state = session.state();
            println!(
                "Session {}: score {} (tower height {}, best {}{})",
                played,
                session.score(),
                state.height(),
                session.high_score(),
                if session.is_new_best() { ", new best!" } else { "" }
            );
        }
    }

    println!(
        "Played {} session(s) in {:.1}s of simulated time, best score {}",
        played,
        frames as f32 * FRAME_DT,
        session.high_score()
    );
}
