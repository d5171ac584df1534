//! Idle/demo mode - the game plays itself
//!
//! Produces directional flags for one tick from the current state. Used by the
//! headless runner and as an attract mode.

use super::entity::Body;
use super::rect::Rect;
use super::state::GameState;
use super::tick::TickInput;

/// Threats within this many pixels above the ship are dodged
const DANGER_RANGE: i32 = 150;
/// Stop steering once within this many pixels of the target column
const DEADZONE: i32 = 6;

/// Fill the directional flags of `input` for this tick
pub fn steer(state: &GameState, input: &mut TickInput) {
    let ship = state.player.rect();
    let center = ship.center_x();

    input.left = false;
    input.right = false;
    input.up = false;
    input.down = false;

    if let Some(threat_x) = nearest_threat(state, &ship) {
        // Move away from the threat, toward open screen if pinned at an edge
        let dodge_right = threat_x < center || ship.x <= 0;
        let pinned_right = ship.right() >= crate::consts::SCREEN_WIDTH;
        if dodge_right && !pinned_right {
            input.right = true;
        } else {
            input.left = true;
        }
        input.down = true;
        return;
    }

    let target = state
        .entities
        .power_ups
        .iter()
        .map(|p| p.rect())
        .chain(state.entities.boss.iter().map(|b| b.rect()))
        .chain(state.entities.sub_enemies.iter().map(|s| s.rect()))
        .chain(state.entities.enemies.iter().map(|e| e.rect()))
        .chain(state.entities.rocks.iter().map(|r| r.rect()))
        .max_by_key(|r| r.bottom())
        .map(|r| r.center_x());

    if let Some(target_x) = target {
        if target_x < center - DEADZONE {
            input.left = true;
        } else if target_x > center + DEADZONE {
            input.right = true;
        }
    }
}

/// Horizontal center of the closest hostile thing bearing down on the ship
fn nearest_threat(state: &GameState, ship: &Rect) -> Option<i32> {
    let lane = Rect::new(ship.x - 16, ship.y - DANGER_RANGE, ship.w + 32, DANGER_RANGE + ship.h);
    let entities = &state.entities;
    entities
        .enemy_bullets
        .iter()
        .map(|b| b.rect())
        .chain(entities.boss_bullets.iter().map(|b| b.rect()))
        .chain(entities.sub_enemies.iter().map(|s| s.rect()))
        .chain(entities.enemies.iter().map(|e| e.rect()))
        .chain(entities.rocks.iter().map(|r| r.rect()))
        .filter(|r| r.overlaps(&lane))
        .max_by_key(|r| r.bottom())
        .map(|r| r.center_x())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{EnemyBullet, Rock, RockTier};
    use crate::tuning::Tuning;
    use glam::IVec2;

    #[test]
    fn test_dodges_incoming_bullet() {
        let mut state = GameState::new(1, Tuning::default());
        let ship = state.player.rect();
        // Bullet slightly left of center, closing in
        state.entities.enemy_bullets.push(EnemyBullet {
            pos: IVec2::new(ship.center_x() - 20, ship.y - 40),
            speed: 5,
        });
        let mut input = TickInput::default();
        steer(&state, &mut input);
        assert!(input.right);
        assert!(!input.left);
    }

    #[test]
    fn test_tracks_lowest_rock() {
        let mut state = GameState::new(1, Tuning::default());
        state
            .entities
            .rocks
            .push(Rock::new(IVec2::new(50, 100), RockTier::Small, 1));
        let mut input = TickInput::default();
        steer(&state, &mut input);
        assert!(input.left);
        assert!(!input.right);
    }

    #[test]
    fn test_idle_when_nothing_around() {
        let state = GameState::new(1, Tuning::default());
        let mut input = TickInput {
            up: true,
            ..Default::default()
        };
        steer(&state, &mut input);
        assert!(!(input.left || input.right || input.up || input.down));
    }
}
