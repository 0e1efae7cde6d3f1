//! Collision detection and damage resolution
//!
//! Bullets use an axis-aligned box test against the enemy radius; enemy contact
//! with the player uses a circular test. A bullet is consumed by the first
//! living enemy it overlaps and never damages a second one in the same tick.

use glam::Vec2;

use super::particles::spawn_burst;
use super::rng::RandomSource;
use super::state::{Bullet, EnemyVariant, EntityStore, GameEvent, Player, RunState};
use crate::consts::*;

/// Result of resolving a single bullet against the enemy list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulletHit {
    pub enemy_id: u32,
    pub damage: i32,
    pub killed: bool,
}

/// Move bullets and drop those that expired or left the top of the playfield
pub fn advance_bullets(bullets: &mut Vec<Bullet>) {
    for bullet in bullets.iter_mut() {
        bullet.advance();
    }
    bullets.retain(Bullet::is_alive);
}

/// Resolve bullet/enemy overlaps, applying damage, kills and feedback
pub fn resolve_bullet_hits(
    entities: &mut EntityStore,
    run: &mut RunState,
    rng: &mut impl RandomSource,
    events: &mut Vec<GameEvent>,
) -> Vec<BulletHit> {
    let EntityStore {
        enemies,
        bullets,
        particles,
        ..
    } = entities;
    let mut hits = Vec::new();

    for bullet in bullets.iter_mut().filter(|b| b.life > 0) {
        let Some(enemy) = enemies
            .iter_mut()
            .find(|e| !e.dead && e.box_contains(bullet.pos))
        else {
            continue;
        };

        enemy.hp -= bullet.damage;
        bullet.life = 0;
        spawn_burst(particles, rng, bullet.pos, enemy.tint);
        run.flash = HIT_FLASH;

        let killed = enemy.hp <= 0;
        if killed {
            enemy.dead = true;
            run.kills += enemy.variant.kill_score();
            run.camera_shake = KILL_SHAKE;
            spawn_burst(particles, rng, enemy.pos, KILL_TINT);
            events.push(GameEvent::EnemyKilled {
                id: enemy.id,
                variant: enemy.variant,
            });
        }

        hits.push(BulletHit {
            enemy_id: enemy.id,
            damage: bullet.damage,
            killed,
        });
    }

    hits
}

/// Resolve enemies reaching the player. Returns the variants that made contact.
pub fn resolve_player_contacts(
    entities: &mut EntityStore,
    player: &mut Player,
    run: &mut RunState,
    rng: &mut impl RandomSource,
    events: &mut Vec<GameEvent>,
) -> Vec<EnemyVariant> {
    let EntityStore {
        enemies, particles, ..
    } = entities;
    let player_pos: Vec2 = player.pos;
    let mut contacts = Vec::new();

    for enemy in enemies.iter_mut().filter(|e| !e.dead) {
        if !enemy.touches_player(player_pos) {
            continue;
        }

        player.health =
            (player.health - enemy.variant.contact_damage()).clamp(0, PLAYER_MAX_HEALTH);
        enemy.dead = true;
        run.camera_shake = CONTACT_SHAKE;
        run.flash = CONTACT_FLASH;
        spawn_burst(particles, rng, player_pos, PLAYER_HIT_TINT);
        events.push(GameEvent::PlayerHit {
            variant: enemy.variant,
            health: player.health,
        });
        contacts.push(enemy.variant);
    }

    contacts
}
