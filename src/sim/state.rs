//! Game state and core simulation types
//!
//! `GameState` is the single simulation context for one run. It is owned by
//! exactly one mutator (the per-frame tick) and passed by reference into each
//! subsystem, so independent instances can run side by side in tests.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rng::seeded;
use crate::consts::*;
use crate::settings::SettingsError;

/// Current mode of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunMode {
    /// Waiting for the first start command
    Title,
    /// Active gameplay
    Running,
    /// Choice gate reached, waiting for an upgrade pick
    ChoicePending,
    /// Health ran out; a restart begins a fresh run
    GameOver,
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyVariant {
    Walker,
    Brute,
}

impl EnemyVariant {
    pub fn radius(self) -> f32 {
        match self {
            EnemyVariant::Walker => 17.0,
            EnemyVariant::Brute => 24.0,
        }
    }

    /// Hit points before the run's cumulative boost
    pub fn base_hp(self) -> i32 {
        match self {
            EnemyVariant::Walker => 30,
            EnemyVariant::Brute => 65,
        }
    }

    /// Spawn row just above the top edge
    pub fn spawn_y(self) -> f32 {
        match self {
            EnemyVariant::Walker => -20.0,
            EnemyVariant::Brute => -40.0,
        }
    }

    /// Horizontal sway multiplier applied to sin(phase)
    pub fn sway(self) -> f32 {
        match self {
            EnemyVariant::Walker => 2.2,
            EnemyVariant::Brute => 1.4,
        }
    }

    /// Health removed from the player on contact
    pub fn contact_damage(self) -> i32 {
        match self {
            EnemyVariant::Walker => 18,
            EnemyVariant::Brute => 28,
        }
    }

    /// Kill score awarded when destroyed by bullets
    pub fn kill_score(self) -> u32 {
        match self {
            EnemyVariant::Walker => 1,
            EnemyVariant::Brute => 3,
        }
    }

    pub fn tint(self) -> u32 {
        match self {
            EnemyVariant::Walker => WALKER_TINT,
            EnemyVariant::Brute => BRUTE_TINT,
        }
    }
}

/// A descending enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub variant: EnemyVariant,
    pub pos: Vec2,
    pub radius: f32,
    pub hp: i32,
    /// Vertical speed (units per tick)
    pub speed: f32,
    /// Phase advance per tick
    pub zigzag: f32,
    pub phase: f32,
    /// Render hint (0xRRGGBB)
    pub tint: u32,
    /// Set when killed or after touching the player; removed at end of tick
    #[serde(default)]
    pub dead: bool,
}

impl Enemy {
    /// Zigzag down the playfield
    pub fn advance(&mut self) {
        self.phase += self.zigzag;
        self.pos.x += self.phase.sin() * self.variant.sway();
        self.pos.y += self.speed;
    }

    /// Axis-aligned proximity test used for bullets
    pub fn box_contains(&self, point: Vec2) -> bool {
        (point.x - self.pos.x).abs() < self.radius && (point.y - self.pos.y).abs() < self.radius
    }

    /// Circular contact test against the player
    pub fn touches_player(&self, player_pos: Vec2) -> bool {
        self.pos.distance(player_pos) < self.radius + PLAYER_HIT_RADIUS
    }

    pub fn is_alive(&self, height: f32) -> bool {
        !self.dead && self.pos.y < height + ENEMY_BOTTOM_MARGIN
    }
}

/// A player bullet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: i32,
    /// Remaining life in ticks; zero once consumed by a hit
    pub life: i32,
}

impl Bullet {
    pub fn advance(&mut self) {
        self.pos += self.vel;
        self.life -= 1;
    }

    pub fn is_alive(&self) -> bool {
        self.pos.y > BULLET_TOP_BOUND && self.life > 0
    }
}

/// A cosmetic particle (no gameplay effect)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in ticks
    pub life: f32,
    pub size: f32,
    pub tint: u32,
}

impl Particle {
    /// Opacity a renderer should use for this particle
    pub fn alpha(&self) -> f32 {
        (self.life / PARTICLE_MAX_LIFE).clamp(0.0, 1.0)
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// The player's avatar and combat attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub health: i32,
    pub squad_size: u32,
    pub weapon_level: u32,
    pub bullet_power: i32,
    /// Milliseconds between volleys
    pub fire_interval: f64,
    /// Timestamp (ms) of the last volley
    pub last_shot_at: f64,
}

impl Player {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            pos: Vec2::new(config.width() / 2.0, config.player_y()),
            health: PLAYER_MAX_HEALTH,
            squad_size: 1,
            weapon_level: 1,
            bullet_power: START_BULLET_POWER,
            fire_interval: START_FIRE_INTERVAL_MS,
            last_shot_at: 0.0,
        }
    }

    /// Move horizontally, staying inside the side margins
    pub fn steer(&mut self, direction: f32, width: f32) {
        self.pos.x = (self.pos.x + direction * PLAYER_MOVE_SPEED)
            .clamp(PLAYER_X_MARGIN, width - PLAYER_X_MARGIN);
    }
}

/// Progression and feedback state for the current run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub mode: RunMode,
    /// Monotonic travel distance (meters)
    pub distance: f32,
    /// Travel per tick
    pub speed: f32,
    pub kills: u32,
    pub sector: u32,
    pub next_choice_at: f32,
    pub enemy_hp_boost: i32,
    pub camera_shake: f32,
    pub flash: f32,
    /// Background scroll position (render hint)
    pub scroll_offset: f32,
    /// Set once the score service accepted this run's record
    pub score_submitted: bool,
    /// Incremented on every reset so late async completions can be matched to their run
    pub run_id: u32,
    /// Populated when the run ends
    pub summary: Option<GameOverSummary>,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            mode: RunMode::Title,
            distance: 0.0,
            speed: START_SPEED,
            kills: 0,
            sector: 1,
            next_choice_at: FIRST_CHOICE_AT,
            enemy_hp_boost: 0,
            camera_shake: 0.0,
            flash: 0.0,
            scroll_offset: 0.0,
            score_submitted: false,
            run_id: 0,
            summary: None,
        }
    }
}

impl RunState {
    /// Saturating difficulty scalar in [0, 1]
    pub fn difficulty(&self) -> f32 {
        (self.distance / DIFFICULTY_DISTANCE).clamp(0.0, 1.0)
    }

    /// Decay shake and flash (runs in every mode)
    pub fn decay_feedback(&mut self) {
        self.flash = (self.flash - FLASH_DECAY).max(0.0);
        self.camera_shake *= SHAKE_DECAY;
        if self.camera_shake < 0.01 {
            self.camera_shake = 0.0;
        }
    }
}

/// End-of-run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverSummary {
    pub sector: u32,
    /// Floored distance in meters
    pub distance: u32,
    pub kills: u32,
    pub weapon_level: u32,
    pub squad_size: u32,
}

impl std::fmt::Display for GameOverSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SECTOR {:02} / DIST {}m / KILLS {}",
            self.sector, self.distance, self.kills
        )
    }
}

/// Live entity collections
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub particles: Vec<Particle>,
    next_id: u32,
}

impl EntityStore {
    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// Drop every entity that failed its liveness check this tick
    pub fn retain_live(&mut self, height: f32) {
        self.enemies.retain(|e| e.is_alive(height));
        self.bullets.retain(Bullet::is_alive);
        self.particles.retain(Particle::is_alive);
    }

    pub fn clear(&mut self) {
        self.enemies.clear();
        self.bullets.clear();
        self.particles.clear();
        self.next_id = 0;
    }
}

/// Fixed playfield configuration for a simulation.
///
/// Only built through [`SimConfig::new`] (or the default), so the player lane
/// and spawn band are never empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    width: f32,
    height: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl SimConfig {
    /// Checked playfield: wider than both spawn margins, taller than the player row
    pub fn new(width: f32, height: f32) -> Result<Self, SettingsError> {
        if !(width > 2.0 * SPAWN_MARGIN) || !width.is_finite() {
            return Err(SettingsError::Invalid(format!(
                "width {} must exceed {}",
                width,
                2.0 * SPAWN_MARGIN
            )));
        }
        if !(height > MIN_PLAYFIELD_HEIGHT) || !height.is_finite() {
            return Err(SettingsError::Invalid(format!(
                "height {} must exceed {}",
                height, MIN_PLAYFIELD_HEIGHT
            )));
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn player_y(&self) -> f32 {
        self.height - PLAYER_Y_OFFSET
    }
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted { run_id: u32 },
    EnemySpawned { id: u32, variant: EnemyVariant },
    EnemyKilled { id: u32, variant: EnemyVariant },
    PlayerHit { variant: EnemyVariant, health: i32 },
    ChoiceReached { sector: u32, distance: f32 },
    UpgradeApplied { choice: super::upgrade::UpgradeChoice, sector: u32 },
    GameOver(GameOverSummary),
}

/// Complete simulation context for one player session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the generator was created from
    pub seed: u64,
    pub config: SimConfig,
    /// The only source of randomness for this state
    pub rng: Pcg32,
    pub run: RunState,
    pub player: Player,
    pub entities: EntityStore,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a state on the title screen
    pub fn new(seed: u64, config: SimConfig) -> Self {
        Self {
            seed,
            config,
            rng: seeded(seed),
            run: RunState::default(),
            player: Player::new(&config),
            entities: EntityStore::default(),
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    pub fn mode(&self) -> RunMode {
        self.run.mode
    }

    /// Full entity and stat reset, entering Running.
    ///
    /// The generator is not reseeded: consecutive runs continue the same
    /// stream, so a whole session replays from its seed.
    pub fn reset_run(&mut self) {
        let run_id = self.run.run_id.wrapping_add(1);
        self.run = RunState {
            mode: RunMode::Running,
            run_id,
            ..RunState::default()
        };
        self.player = Player::new(&self.config);
        self.entities.clear();
        self.events.push(GameEvent::RunStarted { run_id });
        log::info!("Run {} started (seed {})", run_id, self.seed);
    }

    pub fn summary(&self) -> GameOverSummary {
        GameOverSummary {
            sector: self.run.sector,
            distance: self.run.distance.floor() as u32,
            kills: self.run.kills,
            weapon_level: self.player.weapon_level,
            squad_size: self.player.squad_size,
        }
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_on_title() {
        let state = GameState::new(1, SimConfig::default());
        assert_eq!(state.mode(), RunMode::Title);
        assert_eq!(state.player.health, 100);
        assert_eq!(state.player.pos.x, DEFAULT_WIDTH / 2.0);
        assert_eq!(state.player.pos.y, DEFAULT_HEIGHT - 110.0);
        assert_eq!(state.run.next_choice_at, 300.0);
        assert_eq!(state.run.sector, 1);
    }

    #[test]
    fn test_reset_restores_baseline() {
        let mut state = GameState::new(1, SimConfig::default());
        state.reset_run();
        state.player.weapon_level = 4;
        state.player.health = 12;
        state.run.kills = 9;
        state.run.distance = 1200.0;
        let id = state.entities.next_entity_id();
        state.entities.enemies.push(Enemy {
            id,
            variant: EnemyVariant::Walker,
            pos: Vec2::new(100.0, 100.0),
            radius: 17.0,
            hp: 30,
            speed: 2.2,
            zigzag: 0.03,
            phase: 0.0,
            tint: WALKER_TINT,
            dead: false,
        });

        state.reset_run();
        assert_eq!(state.mode(), RunMode::Running);
        assert_eq!(state.run.run_id, 2);
        assert_eq!(state.player.weapon_level, 1);
        assert_eq!(state.player.health, 100);
        assert_eq!(state.run.kills, 0);
        assert_eq!(state.run.distance, 0.0);
        assert!(state.entities.enemies.is_empty());
        assert_eq!(state.entities.next_entity_id(), 1);
    }

    #[test]
    fn test_steer_clamps_to_margins() {
        let config = SimConfig::default();
        let mut player = Player::new(&config);
        for _ in 0..200 {
            player.steer(-1.0, config.width());
        }
        assert_eq!(player.pos.x, 60.0);
        for _ in 0..200 {
            player.steer(1.0, config.width());
        }
        assert_eq!(player.pos.x, config.width() - 60.0);
    }

    #[test]
    fn test_sim_config_rejects_unusable_playfields() {
        for (width, height) in [
            (100.0, 800.0),
            (130.0, 800.0),
            (140.0, 800.0),
            (480.0, 120.0),
            (f32::NAN, 800.0),
            (480.0, f32::INFINITY),
        ] {
            assert!(
                matches!(
                    SimConfig::new(width, height),
                    Err(SettingsError::Invalid(_))
                ),
                "{}x{} accepted",
                width,
                height
            );
        }

        let config = SimConfig::new(141.0, 121.0).unwrap();
        assert_eq!(config.width(), 141.0);
        assert_eq!(SimConfig::default().width(), DEFAULT_WIDTH);

        // the narrowest accepted playfield still steers without panicking
        let mut state = GameState::new(1, config);
        state.reset_run();
        for _ in 0..5 {
            state.player.steer(-1.0, config.width());
        }
        assert_eq!(state.player.pos.x, PLAYER_X_MARGIN);
    }

    #[test]
    fn test_difficulty_saturates() {
        let mut run = RunState::default();
        assert_eq!(run.difficulty(), 0.0);
        run.distance = 1750.0;
        assert!((run.difficulty() - 0.5).abs() < 1e-6);
        run.distance = 99_999.0;
        assert_eq!(run.difficulty(), 1.0);
    }

    #[test]
    fn test_feedback_decay() {
        let mut run = RunState {
            flash: 0.03,
            camera_shake: 6.0,
            ..RunState::default()
        };
        run.decay_feedback();
        assert!((run.flash - 0.005).abs() < 1e-6);
        assert!((run.camera_shake - 5.52).abs() < 1e-5);
        run.decay_feedback();
        assert_eq!(run.flash, 0.0);
    }

    #[test]
    fn test_summary_display() {
        let summary = GameOverSummary {
            sector: 3,
            distance: 1234,
            kills: 5,
            weapon_level: 2,
            squad_size: 2,
        };
        assert_eq!(summary.to_string(), "SECTOR 03 / DIST 1234m / KILLS 5");
    }

    #[test]
    fn test_particle_alpha() {
        let mut p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            life: 22.0,
            size: 2.0,
            tint: 0,
        };
        assert!((p.alpha() - 0.5).abs() < 1e-6);
        p.life = 60.0;
        assert_eq!(p.alpha(), 1.0);
        p.life = -1.0;
        assert_eq!(p.alpha(), 0.0);
    }
}
