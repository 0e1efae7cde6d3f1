//! Auto-fire volleys shaped by squad size and weapon level

use glam::Vec2;

use super::rng::RandomSource;
use super::state::{Bullet, Player};
use crate::consts::{BULLET_LIFE, SQUAD_SPACING};

/// Vertical jitter applied to each shooter per volley
const SHOOTER_JITTER: f32 = 4.0;

/// Half-width of the bullet fan for a weapon level
pub fn fan_spread(weapon_level: u32) -> i32 {
    (weapon_level.saturating_sub(1) / 2).min(5) as i32
}

/// Upward bullet speed for a weapon level (negative is up)
pub fn bullet_vy(weapon_level: u32) -> f32 {
    -8.5 - weapon_level as f32 * 0.32
}

/// Horizontal offsets of each squad member, symmetric about the player
pub fn shooter_offsets(squad_size: u32) -> impl Iterator<Item = f32> {
    let center = (squad_size as f32 - 1.0) / 2.0;
    (0..squad_size).map(move |i| (i as f32 - center) * SQUAD_SPACING)
}

/// Whether the fire interval has elapsed at `now` (ms)
pub fn ready_to_fire(player: &Player, now: f64) -> bool {
    now - player.last_shot_at >= player.fire_interval
}

/// Fire a volley if the interval has elapsed. Returns the number of bullets emitted.
pub fn fire_if_ready(
    player: &mut Player,
    bullets: &mut Vec<Bullet>,
    rng: &mut impl RandomSource,
    now: f64,
) -> usize {
    if !ready_to_fire(player, now) {
        return 0;
    }

    let spread = fan_spread(player.weapon_level);
    let vy = bullet_vy(player.weapon_level);
    let before = bullets.len();

    for offset in shooter_offsets(player.squad_size) {
        let origin = Vec2::new(
            player.pos.x + offset,
            player.pos.y + rng.range(-SHOOTER_JITTER, SHOOTER_JITTER),
        );
        for k in -spread..=spread {
            bullets.push(Bullet {
                pos: origin,
                vel: Vec2::new(k as f32 * 0.75, vy),
                damage: player.bullet_power,
                life: BULLET_LIFE,
            });
        }
    }

    player.last_shot_at = now;
    bullets.len() - before
}
