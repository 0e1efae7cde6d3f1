//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One update per frame, driven by an external timestamp
//! - Seeded RNG only, threaded explicitly into every draw
//! - Stable iteration order (insertion order, ids increase monotonically)
//! - No rendering, network or platform dependencies

pub mod combat;
pub mod particles;
pub mod rng;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod upgrade;
pub mod weapon;

pub use combat::BulletHit;
pub use rng::RandomSource;
pub use snapshot::{HudStats, RenderSnapshot};
pub use state::{
    Bullet, Enemy, EnemyVariant, EntityStore, GameEvent, GameOverSummary, GameState, Particle,
    Player, RunMode, RunState, SimConfig,
};
pub use tick::{Command, TickInput, tick};
pub use upgrade::UpgradeChoice;
