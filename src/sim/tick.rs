//! Per-frame simulation tick
//!
//! Core game loop that advances the run by one frame. Only `Running` executes
//! spawning, firing and combat; every mode keeps decaying shake/flash and
//! aging particles so transient effects finish.

use super::combat::{advance_bullets, resolve_bullet_hits, resolve_player_contacts};
use super::particles::tick_particles;
use super::spawn::maybe_spawn;
use super::state::{GameEvent, GameState, RunMode};
use super::upgrade::{UpgradeChoice, apply_upgrade};
use crate::consts::SCROLL_FACTOR;

/// One-shot commands from the input source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Restart,
    ChooseWeapon,
    ChooseSquad,
    /// Routed to the score client by the session; the simulation ignores it
    SubmitScore,
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held intents, sampled every tick
    pub move_left: bool,
    pub move_right: bool,
    /// Discrete command issued this frame
    pub command: Option<Command>,
}

impl TickInput {
    /// Net horizontal direction: -1, 0 or 1
    pub fn direction(&self) -> f32 {
        f32::from(u8::from(self.move_right)) - f32::from(u8::from(self.move_left))
    }

    pub fn with_command(command: Command) -> Self {
        Self {
            command: Some(command),
            ..Default::default()
        }
    }
}

/// Advance the game state by one frame at timestamp `now_ms`
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) {
    if let Some(command) = input.command {
        handle_command(state, command);
    }

    state.time_ticks += 1;
    state.run.decay_feedback();

    match state.run.mode {
        RunMode::Running => run_frame(state, input, now_ms),
        RunMode::Title | RunMode::ChoicePending | RunMode::GameOver => {}
    }

    tick_particles(&mut state.entities.particles);
}

/// Apply a command if it is valid for the current mode
fn handle_command(state: &mut GameState, command: Command) {
    match (state.run.mode, command) {
        (RunMode::Title, Command::Start) | (RunMode::GameOver, Command::Restart) => {
            state.reset_run();
        }
        (RunMode::ChoicePending, Command::ChooseWeapon) => choose(state, UpgradeChoice::Weapon),
        (RunMode::ChoicePending, Command::ChooseSquad) => choose(state, UpgradeChoice::Squad),
        (_, Command::SubmitScore) => {}
        (mode, command) => {
            log::debug!("Ignoring {:?} while {:?}", command, mode);
        }
    }
}

fn choose(state: &mut GameState, choice: UpgradeChoice) {
    apply_upgrade(&mut state.player, &mut state.run, choice);
    state.events.push(GameEvent::UpgradeApplied {
        choice,
        sector: state.run.sector,
    });
}

/// Running-mode frame: motion, spawning, firing, combat, then gate checks
fn run_frame(state: &mut GameState, input: &TickInput, now_ms: f64) {
    let GameState {
        config,
        rng,
        run,
        player,
        entities,
        events,
        ..
    } = state;

    player.steer(input.direction(), config.width());
    run.distance += run.speed;
    run.scroll_offset += run.speed * SCROLL_FACTOR;

    maybe_spawn(entities, run, config.width(), rng, events);
    super::weapon::fire_if_ready(player, &mut entities.bullets, rng, now_ms);

    advance_bullets(&mut entities.bullets);
    for enemy in entities.enemies.iter_mut() {
        enemy.advance();
    }

    resolve_bullet_hits(entities, run, rng, events);
    // Killed enemies leave before they can reach the player
    entities.enemies.retain(|e| e.is_alive(config.height()));
    resolve_player_contacts(entities, player, run, rng, events);

    entities.retain_live(config.height());

    if player.health <= 0 {
        enter_game_over(state);
    } else if state.run.distance >= state.run.next_choice_at {
        enter_choice(state);
    }
}

fn enter_game_over(state: &mut GameState) {
    let summary = state.summary();
    state.run.mode = RunMode::GameOver;
    state.run.summary = Some(summary);
    state.events.push(GameEvent::GameOver(summary));
    log::info!("Game over: {}", summary);
}

fn enter_choice(state: &mut GameState) {
    state.entities.enemies.clear();
    state.run.mode = RunMode::ChoicePending;
    state.events.push(GameEvent::ChoiceReached {
        sector: state.run.sector,
        distance: state.run.distance,
    });
    log::info!(
        "Choice gate reached at {:.0}m (sector {:02})",
        state.run.distance,
        state.run.sector
    );
}
