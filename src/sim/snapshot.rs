//! Read-only views handed to the render surface and HUD after each tick

use serde::Serialize;

use super::state::{Bullet, Enemy, GameState, Particle, Player, RunMode};

/// Everything a renderer needs for one frame. Borrowed; never mutates the run.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RenderSnapshot<'a> {
    pub mode: RunMode,
    pub scroll_offset: f32,
    pub camera_shake: f32,
    pub flash: f32,
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub bullets: &'a [Bullet],
    pub particles: &'a [Particle],
}

/// Aggregate stats for the heads-up display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HudStats {
    pub sector: u32,
    /// Floored meters
    pub distance: u32,
    pub kills: u32,
    pub weapon_level: u32,
    pub squad_size: u32,
    pub health: i32,
}

impl HudStats {
    pub fn sector_label(&self) -> String {
        format!("{:02}", self.sector)
    }

    pub fn distance_label(&self) -> String {
        format!("{:04} m", self.distance)
    }

    pub fn kills_label(&self) -> String {
        format!("{:03}", self.kills)
    }

    pub fn weapon_label(&self) -> String {
        format!("Lv.{}", self.weapon_level)
    }

    pub fn squad_label(&self) -> String {
        format!("x{}", self.squad_size)
    }

    /// Health bar fill in [0, 1]
    pub fn health_fraction(&self) -> f32 {
        (self.health as f32 / crate::consts::PLAYER_MAX_HEALTH as f32).clamp(0.0, 1.0)
    }
}

impl GameState {
    pub fn snapshot(&self) -> RenderSnapshot<'_> {
        RenderSnapshot {
            mode: self.run.mode,
            scroll_offset: self.run.scroll_offset,
            camera_shake: self.run.camera_shake,
            flash: self.run.flash,
            player: &self.player,
            enemies: &self.entities.enemies,
            bullets: &self.entities.bullets,
            particles: &self.entities.particles,
        }
    }

    pub fn hud(&self) -> HudStats {
        HudStats {
            sector: self.run.sector,
            distance: self.run.distance.floor() as u32,
            kills: self.run.kills,
            weapon_level: self.player.weapon_level,
            squad_size: self.player.squad_size,
            health: self.player.health,
        }
    }
}
