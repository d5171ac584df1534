//! Game entities
//!
//! Every entity is a plain record owned by one of the per-kind collections in
//! [`Entities`](super::state::Entities). Entities never point at each other:
//! when one "produces" another (a boss firing, a rock exploding) it returns the
//! new value and the caller appends it to the right collection.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Anything with a collision box
pub trait Body {
    fn pos(&self) -> IVec2;
    fn size(&self) -> IVec2;

    fn rect(&self) -> Rect {
        Rect::at(self.pos(), self.size())
    }
}

macro_rules! fixed_size_body {
    ($ty:ty, $w:expr, $h:expr) => {
        impl Body for $ty {
            fn pos(&self) -> IVec2 {
                self.pos
            }
            fn size(&self) -> IVec2 {
                IVec2::new($w, $h)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

pub const PLAYER_SIZE: IVec2 = IVec2::new(96, 72);
/// Fixed spawn point for every new run
pub const PLAYER_START: IVec2 = IVec2::new(SCREEN_WIDTH / 2 - 32, SCREEN_HEIGHT - 100);
/// Gun muzzles relative to the ship's top-left
const PLAYER_GUNS: [IVec2; 2] = [IVec2::new(24, 48), IVec2::new(48, 48)];

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: IVec2,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: PLAYER_START,
            left: false,
            right: false,
            up: false,
            down: false,
        }
    }
}

impl Player {
    /// Apply held directions, then clamp to the screen
    pub fn update(&mut self, speed: i32) {
        if self.left {
            self.pos.x -= speed;
        }
        if self.right {
            self.pos.x += speed;
        }
        if self.up {
            self.pos.y -= speed;
        }
        if self.down {
            self.pos.y += speed;
        }
        self.pos.x = self.pos.x.clamp(0, SCREEN_WIDTH - PLAYER_SIZE.x);
        self.pos.y = self.pos.y.clamp(0, SCREEN_HEIGHT - PLAYER_SIZE.y);
    }

    pub fn is_moving(&self) -> bool {
        self.left || self.right || self.up || self.down
    }

    /// Two bullets, one per gun
    pub fn volley(&self, bullet_speed: i32) -> [Bullet; 2] {
        PLAYER_GUNS.map(|gun| Bullet {
            pos: self.pos + gun,
            speed: bullet_speed,
        })
    }
}

fixed_size_body!(Player, PLAYER_SIZE.x, PLAYER_SIZE.y);

// ---------------------------------------------------------------------------
// Rocks
// ---------------------------------------------------------------------------

/// Rock size class; drives dimensions, toughness, score and explosion size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RockTier {
    Small,
    Medium,
    Large,
}

impl RockTier {
    pub const ALL: [RockTier; 3] = [RockTier::Small, RockTier::Medium, RockTier::Large];

    pub fn health(self) -> u32 {
        match self {
            RockTier::Small => 3,
            RockTier::Medium => 4,
            RockTier::Large => 5,
        }
    }

    /// Square edge length in pixels
    pub fn edge(self) -> i32 {
        match self {
            RockTier::Small => 32,
            RockTier::Medium => 64,
            RockTier::Large => 96,
        }
    }

    pub fn points(self) -> u64 {
        match self {
            RockTier::Small => 15,
            RockTier::Medium => 25,
            RockTier::Large => 50,
        }
    }

    pub fn explosion(self) -> ExplosionTier {
        match self {
            RockTier::Small => ExplosionTier::Small,
            RockTier::Medium => ExplosionTier::Medium,
            RockTier::Large => ExplosionTier::Large,
        }
    }

    pub fn variant(self) -> u8 {
        match self {
            RockTier::Small => 1,
            RockTier::Medium => 2,
            RockTier::Large => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rock {
    pub pos: IVec2,
    pub tier: RockTier,
    pub health: u32,
    pub speed: i32,
}

impl Rock {
    pub fn new(pos: IVec2, tier: RockTier, speed: i32) -> Self {
        Self {
            pos,
            tier,
            health: tier.health(),
            speed,
        }
    }

    pub fn update(&mut self) {
        self.pos.y += self.speed;
    }

    /// Take one point of damage; returns true once the rock is destroyed
    pub fn hit(&mut self) -> bool {
        self.health = self.health.saturating_sub(1);
        self.health == 0
    }
}

impl Body for Rock {
    fn pos(&self) -> IVec2 {
        self.pos
    }
    fn size(&self) -> IVec2 {
        IVec2::splat(self.tier.edge())
    }
}

// ---------------------------------------------------------------------------
// Projectiles
// ---------------------------------------------------------------------------

pub const BULLET_SIZE: IVec2 = IVec2::new(16, 16);

/// Player bullet, travels up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: IVec2,
    pub speed: i32,
}

impl Bullet {
    pub fn update(&mut self) {
        self.pos.y -= self.speed;
    }
}

fixed_size_body!(Bullet, BULLET_SIZE.x, BULLET_SIZE.y);

/// Regular enemy bullet, travels down
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyBullet {
    pub pos: IVec2,
    pub speed: i32,
}

impl EnemyBullet {
    pub fn update(&mut self) {
        self.pos.y += self.speed;
    }
}

fixed_size_body!(EnemyBullet, BULLET_SIZE.x, BULLET_SIZE.y);

/// Number of cosmetic boss bullet sprites
pub const BOSS_BULLET_VARIANTS: u8 = 6;

/// Boss bullet, travels down; `variant` only picks the sprite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossBullet {
    pub pos: IVec2,
    pub speed: i32,
    pub variant: u8,
}

impl BossBullet {
    pub fn update(&mut self) {
        self.pos.y += self.speed;
    }
}

fixed_size_body!(BossBullet, BULLET_SIZE.x, BULLET_SIZE.y);

// ---------------------------------------------------------------------------
// Enemies
// ---------------------------------------------------------------------------

pub const ENEMY_SIZE: IVec2 = IVec2::new(64, 64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovePattern {
    Straight,
    ZigZag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: IVec2,
    pub pattern: MovePattern,
    pub speed: i32,
    pub move_counter: u32,
}

impl Enemy {
    pub fn new(pos: IVec2, pattern: MovePattern, speed: i32) -> Self {
        Self {
            pos,
            pattern,
            speed,
            move_counter: 0,
        }
    }

    pub fn update(&mut self) {
        self.move_counter += 1;
        self.pos.y += self.speed;
        if self.pattern == MovePattern::ZigZag {
            self.pos.x += ((self.move_counter as f32 * 0.1).sin() * 3.0) as i32;
        }
    }

    /// Bullet from the enemy's lower center
    pub fn shoot(&self, speed: i32) -> EnemyBullet {
        EnemyBullet {
            pos: IVec2::new(
                self.pos.x + ENEMY_SIZE.x / 2 - BULLET_SIZE.x / 2,
                self.pos.y + ENEMY_SIZE.y,
            ),
            speed,
        }
    }
}

fixed_size_body!(Enemy, ENEMY_SIZE.x, ENEMY_SIZE.y);

pub const SUB_ENEMY_SIZE: IVec2 = IVec2::new(64, 32);

/// Small drone thrown by the boss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubEnemy {
    pub pos: IVec2,
    pub speed: i32,
}

impl SubEnemy {
    pub fn update(&mut self) {
        self.pos.y += self.speed;
    }
}

fixed_size_body!(SubEnemy, SUB_ENEMY_SIZE.x, SUB_ENEMY_SIZE.y);

// ---------------------------------------------------------------------------
// Boss
// ---------------------------------------------------------------------------

pub const BOSS_SIZE: IVec2 = IVec2::new(144, 192);
/// Top-center, fully above the screen
pub const BOSS_ENTRY: IVec2 = IVec2::new(SCREEN_WIDTH / 2 - BOSS_SIZE.x / 2, -BOSS_SIZE.y);
/// The boss descends until its top edge reaches this line
const BOSS_HOVER_Y: i32 = 50;
/// Muzzles along the bottom row
const BOSS_GUNS: [IVec2; 3] = [
    IVec2::new(24, BOSS_SIZE.y),
    IVec2::new(72, BOSS_SIZE.y),
    IVec2::new(120, BOSS_SIZE.y),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    /// Sliding down into view
    Descending,
    /// Drifting side to side
    Oscillating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub pos: IVec2,
    pub health: u32,
    pub speed: i32,
    pub move_counter: u32,
}

impl Boss {
    pub fn new(health: u32, speed: i32) -> Self {
        Self {
            pos: BOSS_ENTRY,
            health,
            speed,
            move_counter: 0,
        }
    }

    pub fn phase(&self) -> BossPhase {
        if self.pos.y < BOSS_HOVER_Y {
            BossPhase::Descending
        } else {
            BossPhase::Oscillating
        }
    }

    pub fn update(&mut self) {
        self.move_counter += 1;
        match self.phase() {
            BossPhase::Descending => self.pos.y += self.speed,
            BossPhase::Oscillating => {
                self.pos.x += ((self.move_counter as f32 * 0.02).sin() * 3.0) as i32;
                self.pos.x = self.pos.x.clamp(0, SCREEN_WIDTH - BOSS_SIZE.x);
            }
        }
    }

    /// Take one point of damage; returns true once the boss is destroyed
    pub fn hit(&mut self) -> bool {
        self.health = self.health.saturating_sub(1);
        self.health == 0
    }

    /// Health-bar sprite index, 1 (full) through 6 (nearly dead)
    pub fn health_bucket(&self) -> u8 {
        match self.health {
            h if h > 100 => 1,
            h if h > 80 => 2,
            h if h > 60 => 3,
            h if h > 40 => 4,
            h if h > 20 => 5,
            _ => 6,
        }
    }

    /// One bullet from each gun, each with a random sprite
    pub fn volley<R: Rng + ?Sized>(&self, speed: i32, rng: &mut R) -> [BossBullet; 3] {
        BOSS_GUNS.map(|gun| BossBullet {
            pos: self.pos + gun,
            speed,
            variant: rng.random_range(0..BOSS_BULLET_VARIANTS),
        })
    }

    /// Drone dropped from under the boss's center
    pub fn launch_sub_enemy(&self, speed: i32) -> SubEnemy {
        SubEnemy {
            pos: IVec2::new(
                self.pos.x + BOSS_SIZE.x / 2 - SUB_ENEMY_SIZE.x / 2,
                self.pos.y + BOSS_SIZE.y,
            ),
            speed,
        }
    }
}

fixed_size_body!(Boss, BOSS_SIZE.x, BOSS_SIZE.y);

// ---------------------------------------------------------------------------
// Effects & pickups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExplosionTier {
    Small,
    Medium,
    Large,
}

impl ExplosionTier {
    pub fn edge(self) -> i32 {
        match self {
            ExplosionTier::Small => 32,
            ExplosionTier::Medium => 64,
            ExplosionTier::Large => 128,
        }
    }

    pub fn variant(self) -> u8 {
        match self {
            ExplosionTier::Small => 1,
            ExplosionTier::Medium => 2,
            ExplosionTier::Large => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: IVec2,
    pub tier: ExplosionTier,
    pub frame: u32,
    pub duration: u32,
}

impl Explosion {
    pub fn new(pos: IVec2, tier: ExplosionTier, duration: u32) -> Self {
        Self {
            pos,
            tier,
            frame: 0,
            duration,
        }
    }

    pub fn update(&mut self) {
        self.frame += 1;
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= self.duration
    }
}

impl Body for Explosion {
    fn pos(&self) -> IVec2 {
        self.pos
    }
    fn size(&self) -> IVec2 {
        IVec2::splat(self.tier.edge())
    }
}

pub const POWER_UP_SIZE: IVec2 = IVec2::new(32, 32);

/// Falling extra life
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthPowerUp {
    pub pos: IVec2,
    pub speed: i32,
}

impl HealthPowerUp {
    pub fn update(&mut self) {
        self.pos.y += self.speed;
    }
}

fixed_size_body!(HealthPowerUp, POWER_UP_SIZE.x, POWER_UP_SIZE.y);
