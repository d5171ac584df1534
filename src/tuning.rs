//! Data-driven game balance
//!
//! Every spawn rate, cap, speed and duration the simulation uses lives here.
//! Probabilities are expressed as "one in N" per tick.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub start_lives: u32,
    pub max_lives: u32,
    pub player_speed: i32,
    /// Ticks of damage immunity after a hit
    pub invincibility_ticks: u32,
    /// Ticks between volleys (two bullets each)
    pub fire_interval: u32,
    /// Fire without holding the trigger
    pub auto_fire: bool,
    pub bullet_speed: i32,
    /// Oldest player bullets are evicted beyond this
    pub bullet_cap: usize,

    // === Rocks ===
    pub rock_spawn_period: u32,
    pub rock_cap: usize,
    pub rock_speed_min: i32,
    pub rock_speed_max: i32,
    /// Rocks spawn at least this far from either screen edge
    pub rock_spawn_margin: i32,
    pub rock_spawn_y: i32,

    // === Enemies ===
    pub enemy_spawn_period: u32,
    pub enemy_cap: usize,
    pub enemy_speed_min: i32,
    pub enemy_speed_max: i32,
    pub enemy_fire_one_in: u32,
    pub enemy_bullet_speed: i32,
    pub enemy_score: u64,

    // === Boss ===
    /// Elapsed game ticks before the boss sequence begins
    pub boss_trigger_tick: u64,
    /// Ticks between clearing the field and the boss appearing
    pub boss_entry_delay: u32,
    pub boss_health: u32,
    pub boss_speed: i32,
    pub boss_fire_one_in: u32,
    pub boss_bullet_speed: i32,
    /// Boss stops firing while this many of its bullets are alive
    pub boss_bullet_spawn_ceiling: usize,
    /// Oldest boss bullets are evicted beyond this
    pub boss_bullet_cap: usize,
    pub sub_enemy_one_in: u32,
    pub sub_enemy_cap: usize,
    pub sub_enemy_speed: i32,
    pub sub_enemy_score: u64,

    // === Misc ===
    pub power_up_one_in: u32,
    pub power_up_speed: i32,
    pub explosion_frames: u32,
    /// Background scroll in pixels per tick
    pub scroll_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            start_lives: 10,
            max_lives: 10,
            player_speed: 5,
            invincibility_ticks: 60,
            fire_interval: 8,
            auto_fire: true,
            bullet_speed: 10,
            bullet_cap: 30,

            rock_spawn_period: 100,
            rock_cap: 10,
            rock_speed_min: 1,
            rock_speed_max: 2,
            rock_spawn_margin: 50,
            rock_spawn_y: -50,

            enemy_spawn_period: 100,
            enemy_cap: 8,
            enemy_speed_min: 1,
            enemy_speed_max: 2,
            enemy_fire_one_in: 100,
            enemy_bullet_speed: 5,
            enemy_score: 10,

            boss_trigger_tick: 1500,
            boss_entry_delay: 50,
            boss_health: 150,
            boss_speed: 2,
            boss_fire_one_in: 30,
            boss_bullet_speed: 4,
            boss_bullet_spawn_ceiling: 30,
            boss_bullet_cap: 35,
            sub_enemy_one_in: 240,
            sub_enemy_cap: 5,
            sub_enemy_speed: 3,
            sub_enemy_score: 10,

            power_up_one_in: 1200,
            power_up_speed: 2,
            explosion_frames: 10,
            scroll_speed: 1.5,
        }
    }
}

impl Tuning {
    /// Reject values that would stall or panic the simulation
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        }

        let one_in = [
            ("enemy_fire_one_in", self.enemy_fire_one_in),
            ("boss_fire_one_in", self.boss_fire_one_in),
            ("sub_enemy_one_in", self.sub_enemy_one_in),
            ("power_up_one_in", self.power_up_one_in),
            ("rock_spawn_period", self.rock_spawn_period),
            ("enemy_spawn_period", self.enemy_spawn_period),
            ("fire_interval", self.fire_interval),
            ("explosion_frames", self.explosion_frames),
        ];
        for (field, value) in one_in {
            if value == 0 {
                return invalid(field, "must be at least 1");
            }
        }

        let caps = [
            ("bullet_cap", self.bullet_cap),
            ("rock_cap", self.rock_cap),
            ("enemy_cap", self.enemy_cap),
            ("boss_bullet_cap", self.boss_bullet_cap),
            ("sub_enemy_cap", self.sub_enemy_cap),
        ];
        for (field, value) in caps {
            if value == 0 {
                return invalid(field, "cap must be at least 1");
            }
        }

        if self.rock_speed_min < 1 || self.rock_speed_min > self.rock_speed_max {
            return invalid("rock_speed_min", "need 1 <= rock_speed_min <= rock_speed_max");
        }
        if self.enemy_speed_min < 1 || self.enemy_speed_min > self.enemy_speed_max {
            return invalid("enemy_speed_min", "need 1 <= enemy_speed_min <= enemy_speed_max");
        }
        if self.rock_spawn_margin < 0 || self.rock_spawn_margin * 2 + 96 >= crate::consts::SCREEN_WIDTH
        {
            return invalid("rock_spawn_margin", "leaves no room to spawn rocks");
        }
        if self.start_lives == 0 || self.start_lives > self.max_lives {
            return invalid("start_lives", "need 1 <= start_lives <= max_lives");
        }
        if self.boss_health == 0 {
            return invalid("boss_health", "must be at least 1");
        }
        if !(self.scroll_speed.is_finite() && self.scroll_speed >= 0.0) {
            return invalid("scroll_speed", "must be a non-negative number");
        }
        Ok(())
    }
}
