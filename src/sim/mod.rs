//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-frame ticks only
//! - Seeded RNG only
//! - Delayed side effects scheduled on the tick timeline, never real timers
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod session;
pub mod spawn;
pub mod state;
pub mod tick;

pub use entity::{Boss, Enemy, EnemyProjectile, Particle, Player, Powerup, PowerupKind, Projectile};
pub use session::{EntityView, GameSession};
pub use spawn::SpawnDirector;
pub use state::{ActiveEffects, Bounds, GamePhase, GameState};
pub use tick::{InputState, TickReport, tick};
