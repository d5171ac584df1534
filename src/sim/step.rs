//! Simulation step
//!
//! Advances every entity by one tick, then culls whatever left the play area
//! and trims the projectile lists that have hard caps.

use super::entity::Body;
use super::state::{Entities, GameState};
use crate::consts::{OFFSCREEN_MARGIN, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::tuning::Tuning;

/// Falling things are dropped this far below the screen
const BOTTOM_EXIT: i32 = SCREEN_HEIGHT + 100;
/// Player bullets are dropped once above this line
const TOP_EXIT: i32 = -50;

/// Player, timers, background and all entity movement for one tick
///
/// With `firing` set the ship fires a volley whenever its gun cooldown is
/// spent.
pub fn step(state: &mut GameState, firing: bool) {
    state.game_time += 1;
    state.invincibility = state.invincibility.saturating_sub(1);

    state.player.update(state.tuning.player_speed);

    state.fire_timer = state.fire_timer.saturating_sub(1);
    if firing && state.fire_timer == 0 {
        let volley = state.player.volley(state.tuning.bullet_speed);
        state.entities.bullets.extend(volley);
        state.fire_timer = state.tuning.fire_interval;
    }

    state.scroll_offset += state.tuning.scroll_speed;
    if state.scroll_offset >= SCREEN_HEIGHT as f32 {
        state.scroll_offset -= SCREEN_HEIGHT as f32;
    }

    move_entities(&mut state.entities);
    cull(&mut state.entities);
    cap_projectiles(&mut state.entities, &state.tuning);
}

/// Advance positions and animation counters, in fixed order
pub fn move_entities(entities: &mut Entities) {
    entities.rocks.iter_mut().for_each(|r| r.update());
    entities.bullets.iter_mut().for_each(|b| b.update());
    entities.enemies.iter_mut().for_each(|e| e.update());
    entities.enemy_bullets.iter_mut().for_each(|b| b.update());
    if let Some(boss) = entities.boss.as_mut() {
        boss.update();
    }
    entities.boss_bullets.iter_mut().for_each(|b| b.update());
    entities.sub_enemies.iter_mut().for_each(|s| s.update());
    entities.explosions.iter_mut().for_each(|e| e.update());
    entities.power_ups.iter_mut().for_each(|p| p.update());
}

/// Past the bottom exit line or drifted sideways beyond the margin
fn fell_out<T: Body>(body: &T) -> bool {
    let rect = body.rect();
    rect.y > BOTTOM_EXIT
        || rect.right() < -OFFSCREEN_MARGIN
        || rect.x > SCREEN_WIDTH + OFFSCREEN_MARGIN
}

/// Remove entities that exited the screen and finished explosions
pub fn cull(entities: &mut Entities) {
    entities.rocks.retain(|r| !fell_out(r));
    entities.bullets.retain(|b| b.pos.y >= TOP_EXIT);
    entities.enemies.retain(|e| !fell_out(e));
    entities.enemy_bullets.retain(|b| !fell_out(b));
    entities.boss_bullets.retain(|b| !fell_out(b));
    entities.sub_enemies.retain(|s| !fell_out(s));
    entities.explosions.retain(|e| !e.is_finished());
    entities.power_ups.retain(|p| !fell_out(p));
}

/// Evict the oldest bullets beyond the hard caps
pub fn cap_projectiles(entities: &mut Entities, tuning: &Tuning) {
    evict_oldest(&mut entities.bullets, tuning.bullet_cap);
    evict_oldest(&mut entities.boss_bullets, tuning.boss_bullet_cap);
}

fn evict_oldest<T>(list: &mut Vec<T>, cap: usize) {
    if list.len() > cap {
        let excess = list.len() - cap;
        list.drain(..excess);
    }
}
