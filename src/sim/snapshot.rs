//! Render snapshot
//!
//! A flat, read-only description of one frame for whatever draws it. Built
//! from the state after a tick; nothing here feeds back into the simulation.

use serde::Serialize;

use super::entity::{Body, MovePattern};
use super::state::{GamePhase, GameState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpriteKind {
    Player,
    Rock,
    Bullet,
    Enemy,
    EnemyBullet,
    Boss,
    BossBullet,
    SubEnemy,
    Explosion,
    PowerUp,
}

/// One drawable, in screen pixels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    /// Art selector: rock/explosion size tier, boss bullet style, enemy
    /// movement pattern
    pub variant: u8,
    /// Animation frame (explosions only)
    pub frame: u32,
}

impl Sprite {
    fn of<T: Body>(kind: SpriteKind, body: &T, variant: u8) -> Self {
        let rect = body.rect();
        Self {
            kind,
            x: rect.x,
            y: rect.y,
            w: rect.w,
            h: rect.h,
            variant,
            frame: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    pub kill_count: u32,
    pub scroll_offset: f32,
    /// Player sprite should blink
    pub invincible: bool,
    /// Selects the moving/idle ship art
    pub player_moving: bool,
    /// Health-bar sprite index while a boss is on screen
    pub boss_health_bucket: Option<u8>,
    /// Back to front
    pub sprites: Vec<Sprite>,
}

impl RenderFrame {
    pub fn build(state: &GameState) -> Self {
        let e = &state.entities;
        let mut sprites = Vec::with_capacity(e.len() + 1);

        sprites.extend(e.power_ups.iter().map(|p| Sprite::of(SpriteKind::PowerUp, p, 0)));
        sprites.extend(
            e.rocks
                .iter()
                .map(|r| Sprite::of(SpriteKind::Rock, r, r.tier.variant())),
        );
        sprites.extend(e.enemies.iter().map(|en| {
            let variant = match en.pattern {
                MovePattern::Straight => 0,
                MovePattern::ZigZag => 1,
            };
            Sprite::of(SpriteKind::Enemy, en, variant)
        }));
        sprites.extend(e.sub_enemies.iter().map(|s| Sprite::of(SpriteKind::SubEnemy, s, 0)));
        if let Some(boss) = &e.boss {
            sprites.push(Sprite::of(SpriteKind::Boss, boss, 0));
        }
        if state.phase != GamePhase::Menu {
            sprites.push(Sprite::of(SpriteKind::Player, &state.player, 0));
        }
        sprites.extend(e.bullets.iter().map(|b| Sprite::of(SpriteKind::Bullet, b, 0)));
        sprites.extend(
            e.enemy_bullets
                .iter()
                .map(|b| Sprite::of(SpriteKind::EnemyBullet, b, 0)),
        );
        sprites.extend(
            e.boss_bullets
                .iter()
                .map(|b| Sprite::of(SpriteKind::BossBullet, b, b.variant)),
        );
        sprites.extend(e.explosions.iter().map(|x| Sprite {
            frame: x.frame,
            ..Sprite::of(SpriteKind::Explosion, x, x.tier.variant())
        }));

        Self {
            phase: state.phase,
            score: state.score,
            lives: state.lives,
            kill_count: state.kill_count,
            scroll_offset: state.scroll_offset,
            invincible: state.invincibility > 0,
            player_moving: state.player.is_moving(),
            boss_health_bucket: e.boss.as_ref().map(|b| b.health_bucket()),
            sprites,
        }
    }

    pub fn count(&self, kind: SpriteKind) -> usize {
        self.sprites.iter().filter(|s| s.kind == kind).count()
    }
}
