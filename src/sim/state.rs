//! Game state and core simulation types
//!
//! All state the simulation mutates lives here; renderers and audio only read it.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{
    Boss, BossBullet, Bullet, Enemy, EnemyBullet, Explosion, HealthPowerUp, Player, Rock,
    RockTier, SubEnemy,
};
use crate::tuning::Tuning;

/// Current phase of the game state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    Menu,
    /// Active gameplay
    Playing,
    /// Frozen mid-run
    Paused,
    /// Out of lives
    GameOver,
    /// Boss destroyed
    Won,
}

impl GamePhase {
    /// Runs that ended and wait for restart
    pub fn is_finished(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Won)
    }
}

/// Something that happened during a tick, for audio and logging consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    RockDestroyed { tier: RockTier, points: u64 },
    EnemyDestroyed,
    SubEnemyDestroyed,
    /// Field cleared, boss arrives after the entry delay
    BossIncoming,
    BossArrived,
    BossHit { health: u32 },
    BossDefeated,
    PlayerHit { lives: u32 },
    LifeRestored { lives: u32 },
    GameOver,
    Restarted,
    ReturnedToMenu,
}

/// Live entities, one ordered collection per kind (insertion order = spawn order)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entities {
    pub rocks: Vec<Rock>,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub boss: Option<Boss>,
    pub boss_bullets: Vec<BossBullet>,
    pub sub_enemies: Vec<SubEnemy>,
    pub explosions: Vec<Explosion>,
    pub power_ups: Vec<HealthPowerUp>,
}

impl Entities {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Total live entities, excluding the player
    pub fn len(&self) -> usize {
        self.rocks.len()
            + self.bullets.len()
            + self.enemies.len()
            + self.enemy_bullets.len()
            + self.boss.is_some() as usize
            + self.boss_bullets.len()
            + self.sub_enemies.len()
            + self.explosions.len()
            + self.power_ups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawn randomness; every random decision draws from here
    pub rng: Pcg32,
    /// Balance constants for this session
    pub tuning: Tuning,
    /// Current phase
    pub phase: GamePhase,
    pub lives: u32,
    pub score: u64,
    pub kill_count: u32,
    /// Ticks spent in `Playing` this run
    pub game_time: u64,
    /// Ticks of damage immunity left
    pub invincibility: u32,
    /// Ticks until the next rock may spawn
    pub rock_timer: u32,
    /// Ticks until the next formation may spawn
    pub enemy_timer: u32,
    /// Ticks until the next volley
    pub fire_timer: u32,
    /// Set once the boss sequence starts; it never starts twice per run
    pub boss_triggered: bool,
    pub boss_defeated: bool,
    /// Ticks left before the boss appears, while the sequence is pending
    pub boss_delay: Option<u32>,
    /// Background scroll in pixels, wraps at screen height
    pub scroll_offset: f32,
    pub player: Player,
    pub entities: Entities,
    /// Events emitted since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game sitting at the main menu
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self::with_rng(seed, Pcg32::seed_from_u64(seed), tuning)
    }

    /// Create a game with an explicit generator (tests inject theirs here)
    pub fn with_rng(seed: u64, rng: Pcg32, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            rng,
            tuning,
            phase: GamePhase::Menu,
            lives: 0,
            score: 0,
            kill_count: 0,
            game_time: 0,
            invincibility: 0,
            rock_timer: 0,
            enemy_timer: 0,
            fire_timer: 0,
            boss_triggered: false,
            boss_defeated: false,
            boss_delay: None,
            scroll_offset: 0.0,
            player: Player::default(),
            entities: Entities::default(),
            events: Vec::new(),
        };
        state.reset_run();
        state
    }

    /// Discard the current run and restore every counter to its initial value.
    ///
    /// The phase and the RNG stream are left alone.
    pub fn reset_run(&mut self) {
        self.lives = self.tuning.start_lives;
        self.score = 0;
        self.kill_count = 0;
        self.game_time = 0;
        self.invincibility = 0;
        self.rock_timer = self.tuning.rock_spawn_period;
        self.enemy_timer = self.tuning.enemy_spawn_period;
        self.fire_timer = 0;
        self.boss_triggered = false;
        self.boss_defeated = false;
        self.boss_delay = None;
        self.scroll_offset = 0.0;
        self.player = Player::default();
        self.entities.clear();
    }

    /// Boss on screen or about to be
    pub fn boss_active(&self) -> bool {
        self.entities.boss.is_some() || self.boss_delay.is_some()
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Lose one life and start the immunity window
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.invincibility = self.tuning.invincibility_ticks;
        log::debug!("Player hit, {} lives left", self.lives);
        self.emit(GameEvent::PlayerHit { lives: self.lives });
        if self.lives == 0 {
            log::info!("Game over (score {})", self.score);
            self.phase = GamePhase::GameOver;
            self.emit(GameEvent::GameOver);
        }
    }

    /// Gain one life, never above the maximum
    pub fn restore_life(&mut self) {
        self.lives = (self.lives + 1).min(self.tuning.max_lives);
        self.emit(GameEvent::LifeRestored { lives: self.lives });
    }
}
