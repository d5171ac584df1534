//! Fixed timestep simulation tick
//!
//! Applies state-machine transitions, then (only while playing) runs the
//! simulation step, the collision resolver and the spawner, in that order.

use super::autopilot;
use super::collision::resolve;
use super::spawn::spawn;
use super::state::{GameEvent, GamePhase, GameState};
use super::step::step;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held directions
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Fire trigger held (auto-fire makes this redundant)
    pub fire: bool,
    /// Leave the main menu and start a run
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start over after game over or victory
    pub restart: bool,
    /// Abandon the run and go back to the main menu
    pub to_menu: bool,
    /// Idle/demo mode - autopilot steers the ship
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
///
/// A tick that starts or restarts a run only performs the transition; the
/// fresh run's first simulated tick is the next one.
pub fn tick(state: &mut GameState, input: &TickInput) {
    let fresh_run = apply_transitions(state, input);

    if fresh_run || state.phase != GamePhase::Playing {
        return;
    }

    let mut input = input.clone();
    if input.idle_mode {
        autopilot::steer(state, &mut input);
    }
    state.player.left = input.left;
    state.player.right = input.right;
    state.player.up = input.up;
    state.player.down = input.down;

    let firing = state.tuning.auto_fire || input.fire;
    step(state, firing);
    resolve(state);
    if state.phase == GamePhase::Playing {
        spawn(state);
    }
}

/// Menu, pause, restart and back-to-menu requests
///
/// Returns true when a new run began this tick.
fn apply_transitions(state: &mut GameState, input: &TickInput) -> bool {
    if input.start && state.phase == GamePhase::Menu {
        state.reset_run();
        state.phase = GamePhase::Playing;
        log::info!("Run started (seed {})", state.seed);
        state.emit(GameEvent::Started);
        return true;
    }

    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("Paused at tick {}", state.game_time);
                state.emit(GameEvent::Paused);
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::info!("Resumed at tick {}", state.game_time);
                state.emit(GameEvent::Resumed);
            }
            _ => {}
        }
    }

    if input.restart && state.phase.is_finished() {
        restart(state);
        return true;
    }

    let can_leave = state.phase == GamePhase::Paused || state.phase.is_finished();
    if input.to_menu && can_leave {
        state.reset_run();
        state.phase = GamePhase::Menu;
        log::info!("Returned to main menu");
        state.emit(GameEvent::ReturnedToMenu);
    }
    false
}

/// Throw away the finished run and start a fresh one
pub fn restart(state: &mut GameState) {
    state.reset_run();
    state.phase = GamePhase::Playing;
    log::info!("Run restarted");
    state.emit(GameEvent::Restarted);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{OFFSCREEN_MARGIN, SCREEN_HEIGHT, SCREEN_WIDTH};
    use crate::sim::entity::{Body, Boss, EnemyBullet, PLAYER_START, Rock, RockTier};
    use crate::tuning::Tuning;
    use glam::IVec2;
    use proptest::prelude::*;

    fn started(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default());
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
        );
        state
    }

    fn assert_caps(state: &GameState) {
        let e = &state.entities;
        assert!(e.bullets.len() <= 30, "bullets {}", e.bullets.len());
        assert!(e.boss_bullets.len() <= 35, "boss bullets {}", e.boss_bullets.len());
        assert!(e.sub_enemies.len() <= 5, "sub-enemies {}", e.sub_enemies.len());
        assert!(e.rocks.len() <= 10, "rocks {}", e.rocks.len());
        assert!(e.enemies.len() <= 8, "enemies {}", e.enemies.len());
    }

    fn assert_within_margin<T: Body>(bodies: &[T]) {
        for body in bodies {
            let pos = body.pos();
            assert!(pos.x >= -OFFSCREEN_MARGIN && pos.x <= SCREEN_WIDTH + OFFSCREEN_MARGIN);
            assert!(pos.y >= -OFFSCREEN_MARGIN && pos.y <= SCREEN_HEIGHT + OFFSCREEN_MARGIN);
        }
    }

    #[test]
    fn test_menu_to_playing() {
        let mut state = GameState::new(12345, Tuning::default());
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.game_time, 0);

        let mut state = started(12345);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.game_time, 0);
        assert!(state.entities.is_empty());

        tick(&mut state, &TickInput::default());
        assert_eq!(state.game_time, 1);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = started(12345);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);
        let frozen_time = state.game_time;
        let frozen_entities = state.entities.clone();

        for _ in 0..100 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.game_time, frozen_time);
        assert_eq!(state.entities, frozen_entities);

        // Unpause
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.game_time, frozen_time + 1);
    }

    #[test]
    fn test_auto_fire_volleys() {
        let mut state = started(1);
        assert!(state.entities.bullets.is_empty());
        // First volley fires on the first playing tick
        tick(&mut state, &TickInput::default());
        assert_eq!(state.entities.bullets.len(), 2);
        for _ in 0..7 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.entities.bullets.len(), 2);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.entities.bullets.len(), 4);
    }

    #[test]
    fn test_manual_fire_only_when_held() {
        let mut state = GameState::new(1, Tuning {
            auto_fire: false,
            ..Default::default()
        });
        state.phase = GamePhase::Playing;
        tick(&mut state, &TickInput::default());
        assert!(state.entities.bullets.is_empty());
        tick(
            &mut state,
            &TickInput {
                fire: true,
                ..Default::default()
            },
        );
        assert_eq!(state.entities.bullets.len(), 2);
    }

    #[test]
    fn test_game_over_freezes_until_restart() {
        let mut state = started(3);
        state.lives = 1;
        state.entities.enemy_bullets.push(EnemyBullet {
            pos: state.player.pos + IVec2::new(30, 30),
            speed: 0,
        });
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);

        let time = state.game_time;
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.game_time, time);

        tick(
            &mut state,
            &TickInput {
                restart: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, 10);
    }

    #[test]
    fn test_restart_tick_leaves_fresh_run() {
        let mut state = started(21);
        for _ in 0..200 {
            tick(&mut state, &TickInput::default());
        }
        state.score = 1234;
        state.phase = GamePhase::GameOver;

        tick(&mut state, &restart_input());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.game_time, 0);
        assert_eq!(state.score, 0);
        assert!(state.entities.is_empty());
        assert_eq!(state.player.pos, PLAYER_START);
        assert_eq!(state.drain_events().last(), Some(&GameEvent::Restarted));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.game_time, 1);
        assert_eq!(state.entities.bullets.len(), 2);
    }

    #[test]
    fn test_restart_ignored_while_playing() {
        let mut state = started(3);
        state.score = 500;
        tick(
            &mut state,
            &TickInput {
                restart: true,
                ..Default::default()
            },
        );
        assert_eq!(state.score, 500);
    }

    #[test]
    fn test_boss_fight_to_victory() {
        let mut state = started(77);
        state.invincibility = u32::MAX;
        while state.entities.boss.is_none() {
            assert!(state.game_time < 1600, "boss never arrived");
            tick(&mut state, &TickInput::default());
            state.invincibility = u32::MAX;
        }
        assert_eq!(state.game_time, 1550);
        assert!(state.entities.rocks.is_empty());
        assert!(state.entities.enemies.is_empty());

        // Finish it off directly under the ship's guns
        if let Some(boss) = state.entities.boss.as_mut() {
            boss.health = 1;
            boss.pos = IVec2::new(300, 50);
        }
        state.player.pos = IVec2::new(330, 260);
        state.fire_timer = 0;
        let mut guard = 0;
        while state.phase == GamePhase::Playing {
            tick(&mut state, &TickInput::default());
            state.invincibility = u32::MAX;
            guard += 1;
            assert!(guard < 100);
        }
        assert_eq!(state.phase, GamePhase::Won);
        assert!(state.boss_defeated);
        assert!(state.entities.boss.is_none());
    }

    #[test]
    fn test_to_menu_from_pause() {
        let mut state = started(9);
        state.entities.rocks.push(Rock::new(IVec2::new(10, 10), RockTier::Small, 1));
        tick(
            &mut state,
            &TickInput {
                pause: true,
                ..Default::default()
            },
        );
        tick(
            &mut state,
            &TickInput {
                to_menu: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.entities.is_empty());
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = started(99999);
        let mut state2 = started(99999);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..2000 {
            tick(&mut state1, &input);
            tick(&mut state2, &input);
        }
        assert_eq!(state1.game_time, state2.game_time);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.entities, state2.entities);
    }

    fn restart_input() -> TickInput {
        TickInput {
            restart: true,
            ..Default::default()
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_caps_and_margins_hold(seed in any::<u64>(), ticks in 100usize..2500) {
            let mut state = started(seed);
            let input = TickInput { idle_mode: true, ..Default::default() };
            for _ in 0..ticks {
                tick(&mut state, &input);
                assert_caps(&state);
                let e = &state.entities;
                assert_within_margin(&e.rocks);
                assert_within_margin(&e.bullets);
                assert_within_margin(&e.enemies);
                assert_within_margin(&e.enemy_bullets);
                assert_within_margin(&e.boss_bullets);
                assert_within_margin(&e.sub_enemies);
                assert_within_margin(&e.power_ups);
                if let Some(boss) = &e.boss {
                    assert_within_margin(std::slice::from_ref(boss));
                }
                if state.phase != GamePhase::Playing {
                    tick(&mut state, &restart_input());
                }
            }
        }

        #[test]
        fn prop_restart_is_idempotent(seed in any::<u64>(), ticks in 1usize..3000, won in any::<bool>()) {
            let mut state = started(seed);
            let input = TickInput { idle_mode: true, ..Default::default() };
            for _ in 0..ticks {
                tick(&mut state, &input);
                if state.phase != GamePhase::Playing {
                    break;
                }
            }
            if state.phase == GamePhase::Playing {
                if won {
                    state.entities.boss = Some(Boss::new(1, 2));
                    state.phase = GamePhase::Won;
                    state.boss_defeated = true;
                } else {
                    state.phase = GamePhase::GameOver;
                    state.lives = 0;
                }
            }

            restart(&mut state);

            prop_assert_eq!(state.phase, GamePhase::Playing);
            prop_assert_eq!(state.lives, 10);
            prop_assert_eq!(state.score, 0);
            prop_assert_eq!(state.kill_count, 0);
            prop_assert_eq!(state.game_time, 0);
            prop_assert_eq!(state.invincibility, 0);
            prop_assert!(!state.boss_triggered);
            prop_assert!(!state.boss_defeated);
            prop_assert!(state.boss_delay.is_none());
            prop_assert!(state.entities.is_empty());
            prop_assert_eq!(state.player.pos, PLAYER_START);
        }
    }
}
