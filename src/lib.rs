//! Galactic Defender - simulation core for a 2D arcade space shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, spawning, session)
//! - `profile`: Credits, permanent upgrades and stat bonuses
//! - `stock`: Randomized time-limited item shop
//! - `persistence`: Save/load of pilot profiles
//! - `audio`: Named cue events for an external sound collaborator
//!
//! Rendering, DOM screens, tone synthesis and raw input capture are external
//! collaborators; the core only consumes a normalized input snapshot and
//! exposes read-only entity views.

pub mod audio;
pub mod persistence;
pub mod profile;
pub mod sim;
pub mod stock;

pub use audio::AudioCue;
pub use profile::{PilotProfile, UpgradeKind};
pub use stock::{Rarity, StatKind, StockItem};

/// Game tuning constants
pub mod consts {
    /// Nominal simulation rate; one tick per animation frame.
    pub const TICKS_PER_SECOND: u64 = 60;

    /// Default play-area width for headless runs.
    pub const DEFAULT_PLAY_WIDTH: f32 = 800.0;
    /// Default play-area height for headless runs.
    pub const DEFAULT_PLAY_HEIGHT: f32 = 600.0;

    /// Player ship is a square of this side length.
    pub const PLAYER_SIZE: f32 = 60.0;
    /// Base movement speed, scaled by the speed-multiplier stat.
    pub const PLAYER_BASE_SPEED: f32 = 5.0;
    /// Lateral dash distance.
    pub const PLAYER_DASH_DISTANCE: f32 = 120.0;
    /// Two taps of the same direction inside this window trigger a dash (250 ms).
    pub const DOUBLE_TAP_WINDOW_TICKS: u64 = 15;
    /// Lives at the start of every run.
    pub const STARTING_LIVES: u32 = 3;

    /// Player projectile speed (upward, per tick).
    pub const PROJECTILE_SPEED: f32 = 7.0;
    /// Player projectile radius before stat bonus.
    pub const PROJECTILE_BASE_RADIUS: f32 = 4.0;
    /// Extra projectile radius on a critical hit.
    pub const CRIT_RADIUS_BONUS: f32 = 3.0;
    /// Enemy projectile speed (downward, per tick).
    pub const ENEMY_PROJECTILE_SPEED: f32 = 4.0;
    /// Enemy projectile radius.
    pub const ENEMY_PROJECTILE_RADIUS: f32 = 5.0;

    /// Enemy ship size.
    pub const ENEMY_SIZE: f32 = 50.0;
    /// Base downward speed before jitter and score scaling.
    pub const ENEMY_BASE_SPEED: f32 = 1.2;
    /// Armored spawn probability cap.
    pub const ARMORED_CHANCE_CAP: f64 = 0.5;

    /// Boss width.
    pub const BOSS_WIDTH: f32 = 120.0;
    /// Boss height.
    pub const BOSS_HEIGHT: f32 = 80.0;
    /// Score reward for a boss kill.
    pub const BOSS_POINTS: u64 = 5000;
    /// Flat credit bonus for a boss kill, on top of the points reward.
    pub const BOSS_CREDIT_BONUS: u64 = 1000;
    /// Fraction of play height where the boss stops descending and hovers.
    pub const BOSS_HOVER_FRACTION: f32 = 0.15;
    /// Ticks between boss 3-projectile volleys.
    pub const BOSS_SHOOT_COOLDOWN_TICKS: u32 = 100;
    /// Score interval between boss spawns.
    pub const BOSS_SCORE_INTERVAL: u64 = 5000;

    /// Powerup fall speed per tick.
    pub const POWERUP_FALL_SPEED: f32 = 1.5;
    /// Single-slot timed powerup duration (~8 s).
    pub const POWERUP_DURATION_TICKS: u32 = 500;
    /// Slow-mo duration (~7 s).
    pub const SLOW_MO_DURATION_TICKS: u32 = 400;
    /// Powerup drop chance on a normal enemy kill.
    pub const POWERUP_DROP_CHANCE: f64 = 0.1;

    /// Player-enemy overlap threshold, squared (40 units).
    pub const PLAYER_ENEMY_DIST_SQ: f32 = 1600.0;
    /// Projectile-enemy overlap threshold, squared (30 units).
    pub const PROJECTILE_ENEMY_DIST_SQ: f32 = 900.0;
    /// Player-enemy-projectile overlap threshold.
    pub const PLAYER_ENEMY_PROJECTILE_DIST: f32 = 30.0;
    /// Powerup collection radius.
    pub const POWERUP_PICKUP_DIST: f32 = 50.0;

    /// Spawn director interval (2 s).
    pub const SPAWN_INTERVAL_TICKS: u64 = 120;
    /// Spawning stays quiet this long after a boss dies.
    pub const BOSS_GRACE_TICKS: u64 = 300;

    /// Particles per explosion burst.
    pub const EXPLOSION_PARTICLES: usize = 15;

    /// Launch animation ship ascent per tick.
    pub const LAUNCH_ASCENT_SPEED: f32 = 5.0;

    /// Stock inventory refresh period (wall-clock, ms).
    pub const STOCK_REFRESH_MS: f64 = 10.0 * 60.0 * 1000.0;
}
