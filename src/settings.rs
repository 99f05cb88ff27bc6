//! Game settings and preferences
//!
//! Loaded from a JSON file named by `STACKER_SETTINGS`; anything missing
//! falls back to the defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{CAMERA_FOLLOW_RATE, MILESTONE_INTERVAL};
use crate::sim::SimConfig;

/// Environment variable pointing at a settings file
pub const SETTINGS_ENV: &str = "STACKER_SETTINGS";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed RNG seed for reproducible runs (None = time-based)
    pub seed: Option<u64>,

    // === Simulation ===
    /// Camera follow smoothing rate (per second)
    pub camera_follow_rate: f32,
    /// Successful placements between celebrations
    pub milestone_interval: u32,
    /// Falling debris for cut-off pieces
    pub debris: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (camera snaps instead of easing)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,

            camera_follow_rate: CAMERA_FOLLOW_RATE,
            milestone_interval: MILESTONE_INTERVAL,
            debris: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load from `STACKER_SETTINGS` if set, otherwise defaults
    ///
    /// A broken settings file is logged and ignored.
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(SETTINGS_ENV) else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    /// Reject values the simulation cannot use
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.camera_follow_rate.is_finite() || self.camera_follow_rate < 0.0 {
            return Err(SettingsError::Invalid {
                field: "camera_follow_rate",
                reason: format!("must be a finite non-negative number, got {}", self.camera_follow_rate),
            });
        }
        if self.milestone_interval == 0 {
            return Err(SettingsError::Invalid {
                field: "milestone_interval",
                reason: "must be at least 1".to_string(),
            });
        }
        for (field, value) in [
            ("master_volume", self.master_volume),
            ("sfx_volume", self.sfx_volume),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::Invalid {
                    field,
                    reason: format!("must be within 0.0 - 1.0, got {}", value),
                });
            }
        }
        Ok(())
    }

    /// Simulation tunables derived from these settings
    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            camera_follow_rate: self.camera_follow_rate,
            milestone_interval: self.milestone_interval,
            spawn_debris: self.debris,
            snap_camera: self.reduced_motion,
        }
    }

    /// The configured seed, or one derived from the clock
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        })
    }
}
