//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order within each entity list)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod entity;
pub mod rect;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod step;
pub mod tick;

pub use entity::{
    Body, Boss, BossBullet, Bullet, Enemy, EnemyBullet, Explosion, ExplosionTier, HealthPowerUp,
    MovePattern, Player, Rock, RockTier, SubEnemy,
};
pub use rect::Rect;
pub use snapshot::{RenderFrame, Sprite, SpriteKind};
pub use state::{Entities, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, restart, tick};
