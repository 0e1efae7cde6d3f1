//! Sector Runner - a vertically scrolling auto-fire arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, weapons, combat, upgrades, run state)
//! - `leaderboard`: Score records, ranked storage and the asynchronous score client
//! - `session`: Binds one run to the score client and routes frame input
//! - `settings`: Playfield, presentation and score-service configuration

pub mod leaderboard;
pub mod session;
pub mod settings;
pub mod sim;

pub use leaderboard::{LeaderboardDisplay, ScoreClient, ScoreError, ScoreRecord, ScoreService};
pub use session::Session;
pub use settings::{QualityPreset, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Default playfield dimensions
    pub const DEFAULT_WIDTH: f32 = 480.0;
    pub const DEFAULT_HEIGHT: f32 = 800.0;

    /// Player row sits this far above the bottom edge
    pub const PLAYER_Y_OFFSET: f32 = 110.0;
    /// Smallest playfield height that still leaves room above the player row
    pub const MIN_PLAYFIELD_HEIGHT: f32 = PLAYER_Y_OFFSET + 10.0;
    /// Horizontal spawn margin from either edge
    pub const SPAWN_MARGIN: f32 = 70.0;
    /// Horizontal margin the player can never cross
    pub const PLAYER_X_MARGIN: f32 = 60.0;
    /// Horizontal travel per tick while a move intent is held
    pub const PLAYER_MOVE_SPEED: f32 = 6.2;
    pub const PLAYER_MAX_HEALTH: i32 = 100;
    /// Extra reach added to an enemy radius for the player contact test
    pub const PLAYER_HIT_RADIUS: f32 = 28.0;

    /// Scroll speed (meters per tick)
    pub const START_SPEED: f32 = 4.0;
    pub const MAX_SPEED: f32 = 9.2;
    pub const SPEED_PER_UPGRADE: f32 = 0.34;
    /// Background grid scroll relative to travel speed
    pub const SCROLL_FACTOR: f32 = 0.6;

    /// Choice gate schedule
    pub const FIRST_CHOICE_AT: f32 = 300.0;
    pub const CHOICE_BASE_STEP: f32 = 270.0;
    pub const CHOICE_STEP_PER_SECTOR: f32 = 42.0;

    /// Distance at which difficulty saturates
    pub const DIFFICULTY_DISTANCE: f32 = 3500.0;

    /// Squad / weapon limits
    pub const MAX_SQUAD_SIZE: u32 = 8;
    pub const SQUAD_SPACING: f32 = 24.0;
    pub const START_BULLET_POWER: i32 = 16;
    pub const START_FIRE_INTERVAL_MS: f64 = 170.0;
    pub const MIN_FIRE_INTERVAL_MS: f64 = 72.0;

    /// Bullets
    pub const BULLET_LIFE: i32 = 130;
    /// Bullets above this line are discarded
    pub const BULLET_TOP_BOUND: f32 = -40.0;
    /// Enemies this far below the bottom edge are discarded
    pub const ENEMY_BOTTOM_MARGIN: f32 = 80.0;

    /// Feedback effects
    pub const FLASH_DECAY: f32 = 0.025;
    pub const SHAKE_DECAY: f32 = 0.92;
    pub const HIT_FLASH: f32 = 0.18;
    pub const KILL_SHAKE: f32 = 6.0;
    pub const CONTACT_SHAKE: f32 = 9.0;
    pub const CONTACT_FLASH: f32 = 0.35;

    /// Particle bursts
    pub const BURST_PARTICLES: usize = 12;
    pub const PARTICLE_MAX_LIFE: f32 = 44.0;
    pub const PARTICLE_DAMPING: f32 = 0.96;

    /// Tints (0xRRGGBB)
    pub const WALKER_TINT: u32 = 0xff7e6d;
    pub const BRUTE_TINT: u32 = 0x7af5cc;
    pub const KILL_TINT: u32 = 0xffe69c;
    pub const PLAYER_HIT_TINT: u32 = 0xff9b97;
}
