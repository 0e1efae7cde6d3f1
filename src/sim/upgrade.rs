//! Upgrade choices offered at each choice gate

use serde::{Deserialize, Serialize};

use super::state::{Player, RunMode, RunState};
use crate::consts::*;

/// What the player picked at the choice gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeChoice {
    /// Stronger, wider, faster volleys
    Weapon,
    /// One more shooter (up to the squad cap)
    Squad,
}

/// Apply a choice and advance the sector schedule, resuming the run
pub fn apply_upgrade(player: &mut Player, run: &mut RunState, choice: UpgradeChoice) {
    match choice {
        UpgradeChoice::Weapon => {
            player.weapon_level += 1;
            player.bullet_power += 5;
            player.fire_interval = (player.fire_interval - 14.0).max(MIN_FIRE_INTERVAL_MS);
        }
        UpgradeChoice::Squad => {
            player.squad_size = (player.squad_size + 1).min(MAX_SQUAD_SIZE);
        }
    }

    run.enemy_hp_boost += 6;
    run.speed = (run.speed + SPEED_PER_UPGRADE).min(MAX_SPEED);
    run.sector += 1;
    run.next_choice_at += CHOICE_BASE_STEP + run.sector as f32 * CHOICE_STEP_PER_SECTOR;
    run.mode = RunMode::Running;

    log::info!(
        "Upgrade {:?}: sector {} weapon Lv.{} squad x{} next gate at {}m",
        choice,
        run.sector,
        player.weapon_level,
        player.squad_size,
        run.next_choice_at
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::SimConfig;

    fn baseline() -> (Player, RunState) {
        let player = Player::new(&SimConfig::default());
        let run = RunState {
            mode: RunMode::ChoicePending,
            ..RunState::default()
        };
        (player, run)
    }

    #[test]
    fn test_weapon_upgrade_from_baseline() {
        let (mut player, mut run) = baseline();
        apply_upgrade(&mut player, &mut run, UpgradeChoice::Weapon);
        assert_eq!(player.weapon_level, 2);
        assert_eq!(player.bullet_power, 21);
        assert_eq!(player.fire_interval, 156.0);
        assert_eq!(run.mode, RunMode::Running);
    }

    #[test]
    fn test_shared_deltas_use_new_sector() {
        let (mut player, mut run) = baseline();
        apply_upgrade(&mut player, &mut run, UpgradeChoice::Squad);
        assert_eq!(player.squad_size, 2);
        assert_eq!(run.sector, 2);
        assert_eq!(run.enemy_hp_boost, 6);
        assert!((run.speed - 4.34).abs() < 1e-5);
        // 300 + 270 + 2 * 42
        assert_eq!(run.next_choice_at, 654.0);
    }

    #[test]
    fn test_fire_interval_floor() {
        let (mut player, mut run) = baseline();
        for _ in 0..20 {
            apply_upgrade(&mut player, &mut run, UpgradeChoice::Weapon);
        }
        assert_eq!(player.fire_interval, 72.0);
        assert_eq!(player.weapon_level, 21);
        assert_eq!(run.speed, 9.2);
    }

    #[test]
    fn test_squad_caps_at_eight() {
        let (mut player, mut run) = baseline();
        for _ in 0..12 {
            apply_upgrade(&mut player, &mut run, UpgradeChoice::Squad);
        }
        assert_eq!(player.squad_size, 8);
    }
}
