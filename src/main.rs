//! Void Shooter entry point
//!
//! Headless runner: loads settings, plays a run with the autopilot (or with no
//! input at all) for a fixed number of ticks and reports how it went.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use void_shooter::audio::LogSink;
use void_shooter::consts::TICKS_PER_SECOND;
use void_shooter::menu::MenuKey;
use void_shooter::sim::GamePhase;
use void_shooter::{Game, Settings};

#[derive(Parser, Debug)]
#[command(name = "void-shooter")]
#[command(about = "Headless runner for the Void Shooter simulation")]
struct Cli {
    /// Run seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,
    /// Ticks to simulate
    #[arg(long, default_value_t = 3_000)]
    ticks: u64,
    /// Settings JSON file
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,
    /// Don't steer; the ship sits still and only auto-fires
    #[arg(long)]
    manual: bool,
    /// Print the final render frame as JSON
    #[arg(long)]
    snapshot: bool,
    /// Write the effective settings back to the settings file
    #[arg(long)]
    save_settings: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let settings = Settings::load_or_default(&cli.settings);
    if cli.save_settings {
        settings.save_to(&cli.settings)?;
    }

    let seed = cli.seed.unwrap_or_else(clock_seed);
    log::info!("Void Shooter starting (seed {seed})");

    let mut game = Game::new(seed, settings, Box::new(LogSink));
    game.input_mut().idle_mode = !cli.manual;
    game.press(MenuKey::Confirm);

    for _ in 0..cli.ticks {
        game.step_once();
        if game.state.phase.is_finished() {
            break;
        }
    }

    let state = &game.state;
    let outcome = match state.phase {
        GamePhase::Won => "boss destroyed",
        GamePhase::GameOver => "out of lives",
        _ => "time limit",
    };
    log::info!(
        "Run ended ({outcome}) after {} ticks ({:.1}s): score {}, kills {}, lives {}",
        state.game_time,
        state.game_time as f32 / TICKS_PER_SECOND as f32,
        state.score,
        state.kill_count,
        state.lives,
    );

    if cli.snapshot {
        println!("{}", serde_json::to_string_pretty(&game.frame())?);
    }
    Ok(())
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
