//! Void Shooter - A vertically scrolling arcade shooter
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (entities, spawning, collisions, game state)
//! - `game`: Session driver tying simulation, menus and audio together
//! - `audio`: Music track switching and volume (playback is external)
//! - `menu`: Main/pause menu navigation
//! - `settings`: Player preferences persisted as JSON
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod game;
pub mod menu;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::ConfigError;
pub use game::Game;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Playable area width in pixels
    pub const SCREEN_WIDTH: i32 = 800;
    /// Playable area height in pixels
    pub const SCREEN_HEIGHT: i32 = 600;

    /// Fixed simulation tick (20 ms)
    pub const TICK_MS: u64 = 20;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = TICK_MS as f32 / 1000.0;
    /// Ticks per second of game time
    pub const TICKS_PER_SECOND: u32 = 50;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// No live entity may sit further than this outside the screen
    pub const OFFSCREEN_MARGIN: i32 = 200;
}
