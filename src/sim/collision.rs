//! Collision and scoring
//!
//! Naive pairwise AABB tests, run once per tick after movement. A bullet can
//! register at most one hit per tick; among overlapping victims the oldest
//! (lowest index) is the one struck. Bullets are walked newest-first so they
//! can be removed in place.

use super::entity::{Body, Explosion, ExplosionTier};
use super::rect::Rect;
use super::state::{GameEvent, GamePhase, GameState};

/// Index of the first (oldest) body overlapping `rect`
pub fn first_hit<T: Body>(bodies: &[T], rect: &Rect) -> Option<usize> {
    bodies.iter().position(|b| b.rect().overlaps(rect))
}

/// Resolve every collision pair for this tick
pub fn resolve(state: &mut GameState) {
    bullets_vs_rocks(state);
    bullets_vs_enemies(state);
    bullets_vs_boss(state);
    bullets_vs_sub_enemies(state);
    if state.phase == GamePhase::Playing {
        player_collisions(state);
    }
}

fn bullets_vs_rocks(state: &mut GameState) {
    let frames = state.tuning.explosion_frames;
    for i in (0..state.entities.bullets.len()).rev() {
        let rect = state.entities.bullets[i].rect();
        let Some(hit) = first_hit(&state.entities.rocks, &rect) else {
            continue;
        };
        state.entities.bullets.remove(i);
        if state.entities.rocks[hit].hit() {
            let rock = state.entities.rocks.remove(hit);
            let points = rock.tier.points();
            state.score += points;
            state
                .entities
                .explosions
                .push(Explosion::new(rock.pos, rock.tier.explosion(), frames));
            log::debug!("{:?} rock destroyed (+{points})", rock.tier);
            state.emit(GameEvent::RockDestroyed {
                tier: rock.tier,
                points,
            });
        }
    }
}

fn bullets_vs_enemies(state: &mut GameState) {
    let frames = state.tuning.explosion_frames;
    for i in (0..state.entities.bullets.len()).rev() {
        let rect = state.entities.bullets[i].rect();
        let Some(hit) = first_hit(&state.entities.enemies, &rect) else {
            continue;
        };
        state.entities.bullets.remove(i);
        let enemy = state.entities.enemies.remove(hit);
        state
            .entities
            .explosions
            .push(Explosion::new(enemy.pos, ExplosionTier::Medium, frames));
        state.score += state.tuning.enemy_score;
        state.kill_count += 1;
        state.emit(GameEvent::EnemyDestroyed);
    }
}

fn bullets_vs_boss(state: &mut GameState) {
    for i in (0..state.entities.bullets.len()).rev() {
        // The boss may have died to an earlier bullet this tick
        let Some(boss) = state.entities.boss.as_mut() else {
            return;
        };
        if !state.entities.bullets[i].rect().overlaps(&boss.rect()) {
            continue;
        }
        state.entities.bullets.remove(i);
        let destroyed = boss.hit();
        let health = boss.health;
        let pos = boss.pos;
        state.emit(GameEvent::BossHit { health });
        if destroyed {
            state.entities.boss = None;
            state.entities.explosions.push(Explosion::new(
                pos,
                ExplosionTier::Large,
                state.tuning.explosion_frames,
            ));
            state.boss_defeated = true;
            state.phase = GamePhase::Won;
            log::info!("Boss defeated at tick {} (score {})", state.game_time, state.score);
            state.emit(GameEvent::BossDefeated);
        }
    }
}

fn bullets_vs_sub_enemies(state: &mut GameState) {
    for i in (0..state.entities.bullets.len()).rev() {
        let rect = state.entities.bullets[i].rect();
        let Some(hit) = first_hit(&state.entities.sub_enemies, &rect) else {
            continue;
        };
        state.entities.bullets.remove(i);
        state.entities.sub_enemies.remove(hit);
        state.score += state.tuning.sub_enemy_score;
        state.kill_count += 1;
        state.emit(GameEvent::SubEnemyDestroyed);
    }
}

/// Hostile contact costs a life unless the player is still immune; pickups
/// always work. Hostile projectiles are consumed, bodies pass through.
fn player_collisions(state: &mut GameState) {
    let player = state.player.rect();

    if state.invincibility == 0 {
        let entities = &mut state.entities;
        let body_hit = entities.boss.as_ref().is_some_and(|b| b.rect().overlaps(&player))
            || first_hit(&entities.sub_enemies, &player).is_some()
            || first_hit(&entities.enemies, &player).is_some()
            || first_hit(&entities.rocks, &player).is_some();

        let hit = if body_hit {
            true
        } else if let Some(i) = first_hit(&entities.enemy_bullets, &player) {
            entities.enemy_bullets.remove(i);
            true
        } else if let Some(i) = first_hit(&entities.boss_bullets, &player) {
            entities.boss_bullets.remove(i);
            true
        } else {
            false
        };

        if hit {
            state.lose_life();
        }
    }

    while let Some(i) = first_hit(&state.entities.power_ups, &player) {
        state.entities.power_ups.remove(i);
        state.restore_life();
    }
}
