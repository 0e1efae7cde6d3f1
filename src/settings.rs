//! Run and presentation settings
//!
//! Loaded from an optional JSON file; every field has a default so partial
//! files work. Presentation preferences are applied to render snapshots and
//! never change the simulation itself.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::leaderboard::DEFAULT_PLAYER_NAME;
use crate::sim::{RenderSnapshot, SimConfig};

/// Errors from loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Presentation detail level; caps the particles a frame hands out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum particles handed to the renderer for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }
}

/// Playfield, presentation and score-service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    pub width: f32,
    pub height: f32,
    /// Fixed seed for reproducible sessions (random when absent)
    pub seed: Option<u64>,

    // === Visual Effects ===
    pub quality: QualityPreset,
    /// Camera shake on kills and contact
    pub screen_shake: bool,
    /// Full-screen hit flash
    pub flash: bool,
    /// Particle bursts
    pub particles: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, no flashes)
    pub reduced_motion: bool,

    // === Score service ===
    pub leaderboard_path: PathBuf,
    /// Per-request timeout for the score service
    pub service_timeout_ms: u64,
    pub player_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            seed: None,

            quality: QualityPreset::Medium,
            screen_shake: true,
            flash: true,
            particles: true,

            reduced_motion: false,

            leaderboard_path: PathBuf::from("leaderboard.json"),
            service_timeout_ms: 4000,
            player_name: DEFAULT_PLAYER_NAME.to_string(),
        }
    }
}

impl Settings {
    /// Load and validate settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject playfields too small to hold the player's lane and spawn band
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.sim_config()?;
        if self.service_timeout_ms == 0 {
            return Err(SettingsError::Invalid(
                "service_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Switch preset; Low also turns the hit flash off
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        if preset == QualityPreset::Low {
            self.flash = false;
        }
    }

    pub fn sim_config(&self) -> Result<SimConfig, SettingsError> {
        SimConfig::new(self.width, self.height)
    }

    pub fn service_timeout(&self) -> Duration {
        Duration::from_millis(self.service_timeout_ms)
    }

    /// Shake is shown only when enabled and motion is not reduced
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Flash follows the same rule as shake
    pub fn effective_flash(&self) -> bool {
        self.flash && !self.reduced_motion
    }

    /// Particle cap after the particles toggle
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Apply presentation preferences to a snapshot before it is drawn
    pub fn apply_to<'a>(&self, snapshot: RenderSnapshot<'a>) -> RenderSnapshot<'a> {
        let particles = snapshot.particles;
        RenderSnapshot {
            camera_shake: if self.effective_screen_shake() {
                snapshot.camera_shake
            } else {
                0.0
            },
            flash: if self.effective_flash() {
                snapshot.flash
            } else {
                0.0
            },
            particles: &particles[..particles.len().min(self.max_particles())],
            ..snapshot
        }
    }
}
