//! Audio cues
//!
//! The simulation only says *what* happened; this module turns that into a
//! tone description (pitch, sweep, envelope) and hands it to an output.
//! Placement pitch climbs a C major scale, one octave every seven blocks.

use crate::settings::Settings;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Block placed; pitch follows the new score
    Place { score: u32 },
    /// Tower collapsed
    Fail,
}

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Sawtooth,
}

/// A single synthesized tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    /// Starting frequency (Hz)
    pub start_hz: f32,
    /// Frequency at the end of the exponential sweep (Hz)
    pub end_hz: f32,
    /// Peak gain before master/sfx volume
    pub peak_gain: f32,
    /// Attack to peak (seconds)
    pub attack: f32,
    /// Total length (seconds)
    pub duration: f32,
}

/// C4 major scale (Hz)
pub const C_MAJOR: [f32; 7] = [261.63, 293.66, 329.63, 349.23, 392.00, 440.00, 493.88];

/// Placement tones stop climbing here (C7)
pub const MAX_PLACE_HZ: f32 = 2093.0;

/// Pitch for a placement that brought the score to `score`
pub fn place_frequency(score: u32) -> f32 {
    let note = C_MAJOR[(score % 7) as usize];
    let octave = (score / 7).min(16) as i32;
    (note * 2f32.powi(octave)).min(MAX_PLACE_HZ)
}

impl AudioCue {
    pub fn tone(&self) -> Tone {
        match *self {
            AudioCue::Place { score } => {
                let hz = place_frequency(score);
                Tone {
                    waveform: Waveform::Sine,
                    start_hz: hz,
                    end_hz: hz,
                    peak_gain: 0.3,
                    attack: 0.02,
                    duration: 0.3,
                }
            }
            AudioCue::Fail => Tone {
                waveform: Waveform::Sawtooth,
                start_hz: 150.0,
                end_hz: 40.0,
                peak_gain: 0.3,
                attack: 0.0,
                duration: 0.5,
            },
        }
    }
}

/// Something that can actually make noise
pub trait ToneOutput {
    /// Fire-and-forget; `volume` is already scaled
    fn emit(&mut self, tone: &Tone, volume: f32);
}

/// Writes tones to the log (headless builds)
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOutput;

impl ToneOutput for LogOutput {
    fn emit(&mut self, tone: &Tone, volume: f32) {
        log::debug!(
            "tone {:?} {:.1}Hz -> {:.1}Hz for {:.2}s at {:.2}",
            tone.waveform,
            tone.start_hz,
            tone.end_hz,
            tone.duration,
            volume * tone.peak_gain
        );
    }
}

/// Audio manager for the game
pub struct AudioManager<O: ToneOutput = LogOutput> {
    output: O,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager<LogOutput> {
    fn default() -> Self {
        Self::new(LogOutput)
    }
}

impl<O: ToneOutput> AudioManager<O> {
    pub fn new(output: O) -> Self {
        Self {
            output,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Take volume and mute from the player's settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a cue
    pub fn play(&mut self, cue: AudioCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.output.emit(&cue.tone(), vol);
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}
