//! Spawner
//!
//! Decides when and where new entities appear. Timed spawns (rocks, enemy
//! formations) use countdowns; everything else is a per-tick Bernoulli draw.
//! Population ceilings suppress spawns, the simulation step evicts on top.

use glam::IVec2;
use rand::Rng;

use super::entity::{
    Boss, ENEMY_SIZE, Enemy, Explosion, ExplosionTier, HealthPowerUp, MovePattern, POWER_UP_SIZE,
    Rock, RockTier,
};
use super::state::{Entities, GameEvent, GameState};
use crate::consts::SCREEN_WIDTH;
use crate::tuning::Tuning;

/// Row where enemy formations enter (just above the screen)
const FORMATION_Y: i32 = -ENEMY_SIZE.y;

/// Enemy wave shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formation {
    Single,
    Pair,
    Row,
    Vee,
    Diagonal,
}

impl Formation {
    pub const ALL: [Formation; 5] = [
        Formation::Single,
        Formation::Pair,
        Formation::Row,
        Formation::Vee,
        Formation::Diagonal,
    ];

    /// Member positions relative to the formation's anchor
    pub fn offsets(self) -> &'static [IVec2] {
        match self {
            Formation::Single => const { &[IVec2::new(0, 0)] },
            Formation::Pair => const { &[IVec2::new(0, 0), IVec2::new(96, 0)] },
            Formation::Row => const { &[IVec2::new(0, 0), IVec2::new(96, 0), IVec2::new(192, 0)] },
            Formation::Vee => {
                const { &[IVec2::new(96, 0), IVec2::new(0, -60), IVec2::new(192, -60)] }
            }
            Formation::Diagonal => {
                const { &[IVec2::new(0, 0), IVec2::new(80, -60), IVec2::new(160, -120)] }
            }
        }
    }

    /// Horizontal extent including the last member's body
    pub fn width(self) -> i32 {
        self.offsets().iter().map(|o| o.x).max().unwrap_or(0) + ENEMY_SIZE.x
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Run every spawner for one tick
pub fn spawn(state: &mut GameState) {
    let mut events = Vec::new();
    {
        let GameState {
            entities,
            rng,
            tuning,
            game_time,
            rock_timer,
            enemy_timer,
            boss_triggered,
            boss_defeated,
            boss_delay,
            ..
        } = state;

        enemy_fire(entities, tuning, rng);

        // Countdown first, so the trigger tick itself is not counted
        if let Some(delay) = boss_delay.as_mut() {
            *delay = delay.saturating_sub(1);
            if *delay == 0 {
                *boss_delay = None;
                entities.boss = Some(Boss::new(tuning.boss_health, tuning.boss_speed));
                log::info!("Boss arrived at tick {game_time}");
                events.push(GameEvent::BossArrived);
            }
        }

        if !*boss_triggered && !*boss_defeated && *game_time >= tuning.boss_trigger_tick {
            *boss_triggered = true;
            *boss_delay = Some(tuning.boss_entry_delay.max(1));
            clear_field(entities, tuning);
            log::info!("Boss incoming at tick {game_time}");
            events.push(GameEvent::BossIncoming);
        }

        let boss_active = entities.boss.is_some() || boss_delay.is_some();
        if !boss_active {
            rocks(entities, tuning, rock_timer, rng);
            formations(entities, tuning, enemy_timer, rng);
            power_ups(entities, tuning, rng);
        }
        boss_attacks(entities, tuning, rng);
    }
    for event in events {
        state.emit(event);
    }
}

/// Rock countdown; at zero a rock spawns if there is room, otherwise it waits
pub fn rocks<R: Rng + ?Sized>(
    entities: &mut Entities,
    tuning: &Tuning,
    timer: &mut u32,
    rng: &mut R,
) {
    *timer = timer.saturating_sub(1);
    if *timer > 0 || entities.rocks.len() >= tuning.rock_cap {
        return;
    }
    *timer = tuning.rock_spawn_period;

    let tier = RockTier::ALL[rng.random_range(0..RockTier::ALL.len())];
    let x = rng.random_range(tuning.rock_spawn_margin..SCREEN_WIDTH - tuning.rock_spawn_margin);
    let speed = rng.random_range(tuning.rock_speed_min..=tuning.rock_speed_max);
    entities
        .rocks
        .push(Rock::new(IVec2::new(x, tuning.rock_spawn_y), tier, speed));
}

/// Formation countdown; members beyond the enemy cap are dropped
pub fn formations<R: Rng + ?Sized>(
    entities: &mut Entities,
    tuning: &Tuning,
    timer: &mut u32,
    rng: &mut R,
) {
    *timer = timer.saturating_sub(1);
    if *timer > 0 || entities.enemies.len() >= tuning.enemy_cap {
        return;
    }
    *timer = tuning.enemy_spawn_period;

    let formation = Formation::random(rng);
    let pattern = if rng.random_bool(0.5) {
        MovePattern::Straight
    } else {
        MovePattern::ZigZag
    };
    let anchor_x = rng.random_range(0..=SCREEN_WIDTH - formation.width());
    let room = tuning.enemy_cap - entities.enemies.len();

    for offset in formation.offsets().iter().take(room) {
        let speed = rng.random_range(tuning.enemy_speed_min..=tuning.enemy_speed_max);
        let pos = IVec2::new(anchor_x, FORMATION_Y) + *offset;
        entities.enemies.push(Enemy::new(pos, pattern, speed));
    }
}

/// Each enemy independently may fire this tick
pub fn enemy_fire<R: Rng + ?Sized>(entities: &mut Entities, tuning: &Tuning, rng: &mut R) {
    let Entities {
        enemies,
        enemy_bullets,
        ..
    } = entities;
    for enemy in enemies.iter() {
        if rng.random_ratio(1, tuning.enemy_fire_one_in) {
            enemy_bullets.push(enemy.shoot(tuning.enemy_bullet_speed));
        }
    }
}

/// Rare falling extra life
pub fn power_ups<R: Rng + ?Sized>(entities: &mut Entities, tuning: &Tuning, rng: &mut R) {
    if rng.random_ratio(1, tuning.power_up_one_in) {
        let x = rng.random_range(0..SCREEN_WIDTH - POWER_UP_SIZE.x);
        entities.power_ups.push(HealthPowerUp {
            pos: IVec2::new(x, -POWER_UP_SIZE.y),
            speed: tuning.power_up_speed,
        });
    }
}

/// Boss volleys and drones, while the boss is alive
pub fn boss_attacks<R: Rng + ?Sized>(entities: &mut Entities, tuning: &Tuning, rng: &mut R) {
    let Some(boss) = entities.boss.as_ref() else {
        return;
    };
    if entities.boss_bullets.len() < tuning.boss_bullet_spawn_ceiling
        && rng.random_ratio(1, tuning.boss_fire_one_in)
    {
        entities
            .boss_bullets
            .extend(boss.volley(tuning.boss_bullet_speed, rng));
    }
    if entities.sub_enemies.len() < tuning.sub_enemy_cap
        && rng.random_ratio(1, tuning.sub_enemy_one_in)
    {
        entities
            .sub_enemies
            .push(boss.launch_sub_enemy(tuning.sub_enemy_speed));
    }
}

/// Blow up every rock and enemy so nothing overlaps the boss's entrance
fn clear_field(entities: &mut Entities, tuning: &Tuning) {
    let frames = tuning.explosion_frames;
    let rock_blasts = entities
        .rocks
        .drain(..)
        .map(|rock| Explosion::new(rock.pos, rock.tier.explosion(), frames));
    let enemy_blasts = entities
        .enemies
        .drain(..)
        .map(|enemy| Explosion::new(enemy.pos, ExplosionTier::Medium, frames));
    entities.explosions.extend(rock_blasts.chain(enemy_blasts));
    entities.enemy_bullets.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EnemyBullet;
    use crate::sim::state::GamePhase;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default());
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_formations_fit_on_screen() {
        for formation in Formation::ALL {
            assert!(formation.width() <= SCREEN_WIDTH);
            assert!(formation.offsets().iter().all(|o| FORMATION_Y + o.y >= -200));
        }
    }

    #[test]
    fn test_rock_spawns_on_timer() {
        let tuning = Tuning::default();
        let mut entities = Entities::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut timer = tuning.rock_spawn_period;

        for _ in 0..tuning.rock_spawn_period - 1 {
            rocks(&mut entities, &tuning, &mut timer, &mut rng);
        }
        assert!(entities.rocks.is_empty());
        rocks(&mut entities, &tuning, &mut timer, &mut rng);
        assert_eq!(entities.rocks.len(), 1);
        assert_eq!(timer, tuning.rock_spawn_period);

        let rock = &entities.rocks[0];
        assert!(rock.pos.x >= 50 && rock.pos.x < SCREEN_WIDTH - 50);
        assert_eq!(rock.pos.y, -50);
        assert!((1..=2).contains(&rock.speed));
        assert_eq!(rock.health, rock.tier.health());
    }

    #[test]
    fn test_rock_cap_suppresses_spawn() {
        let tuning = Tuning::default();
        let mut entities = Entities::default();
        entities.rocks = vec![Rock::new(IVec2::ZERO, RockTier::Small, 1); tuning.rock_cap];
        let mut rng = Pcg32::seed_from_u64(3);
        let mut timer = 1;
        rocks(&mut entities, &tuning, &mut timer, &mut rng);
        assert_eq!(entities.rocks.len(), tuning.rock_cap);
        assert_eq!(timer, 0);

        entities.rocks.pop();
        rocks(&mut entities, &tuning, &mut timer, &mut rng);
        assert_eq!(entities.rocks.len(), tuning.rock_cap);
    }

    #[test]
    fn test_formation_respects_enemy_cap() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..50 {
            let mut entities = Entities::default();
            entities.enemies =
                vec![Enemy::new(IVec2::ZERO, MovePattern::Straight, 1); tuning.enemy_cap - 1];
            let mut timer = 1;
            formations(&mut entities, &tuning, &mut timer, &mut rng);
            assert_eq!(entities.enemies.len(), tuning.enemy_cap);
        }
    }

    #[test]
    fn test_boss_sequence_clears_field_then_spawns() {
        let mut state = playing_state(5);
        state.entities.rocks.push(Rock::new(IVec2::new(100, 100), RockTier::Large, 1));
        state
            .entities
            .enemies
            .push(Enemy::new(IVec2::new(300, 50), MovePattern::Straight, 1));
        state.entities.enemy_bullets.push(EnemyBullet {
            pos: IVec2::new(10, 10),
            speed: 5,
        });

        state.game_time = 1500;
        spawn(&mut state);
        assert!(state.boss_triggered);
        assert_eq!(state.boss_delay, Some(50));
        assert!(state.entities.rocks.is_empty());
        assert!(state.entities.enemies.is_empty());
        assert!(state.entities.enemy_bullets.is_empty());
        let blasts: Vec<_> = state
            .entities
            .explosions
            .iter()
            .map(|e| (e.pos, e.tier))
            .collect();
        assert_eq!(
            blasts,
            vec![
                (IVec2::new(100, 100), ExplosionTier::Large),
                (IVec2::new(300, 50), ExplosionTier::Medium)
            ]
        );
        assert_eq!(state.drain_events(), vec![GameEvent::BossIncoming]);

        for tick in 1..50 {
            state.game_time += 1;
            spawn(&mut state);
            assert!(state.entities.boss.is_none(), "boss early at +{tick}");
            assert!(state.entities.rocks.is_empty());
            assert!(state.entities.enemies.is_empty());
        }
        state.game_time += 1;
        spawn(&mut state);
        assert!(state.entities.boss.is_some());
        assert_eq!(state.boss_delay, None);
        assert!(state.drain_events().contains(&GameEvent::BossArrived));
    }

    #[test]
    fn test_boss_never_retriggers() {
        let mut state = playing_state(5);
        state.game_time = 1500;
        spawn(&mut state);
        state.boss_delay = None;
        state.entities.boss = None;
        state.boss_defeated = true;
        state.game_time = 1600;
        spawn(&mut state);
        assert!(state.boss_delay.is_none());
        assert!(state.entities.boss.is_none());
    }

    #[test]
    fn test_boss_attack_caps() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(99);
        let mut entities = Entities {
            boss: Some(Boss::new(150, 2)),
            ..Default::default()
        };
        for _ in 0..20_000 {
            boss_attacks(&mut entities, &tuning, &mut rng);
            assert!(entities.boss_bullets.len() < tuning.boss_bullet_spawn_ceiling + 3);
            assert!(entities.sub_enemies.len() <= tuning.sub_enemy_cap);
        }
        assert_eq!(entities.sub_enemies.len(), tuning.sub_enemy_cap);
    }

    #[test]
    fn test_every_enemy_fires_from_its_gun() {
        let tuning = Tuning {
            enemy_fire_one_in: 1,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(4);
        let mut entities = Entities::default();
        entities
            .enemies
            .push(Enemy::new(IVec2::new(100, 40), MovePattern::Straight, 1));
        entities
            .enemies
            .push(Enemy::new(IVec2::new(400, 10), MovePattern::ZigZag, 2));

        enemy_fire(&mut entities, &tuning, &mut rng);
        let shots: Vec<_> = entities
            .enemy_bullets
            .iter()
            .map(|b| (b.pos, b.speed))
            .collect();
        assert_eq!(
            shots,
            vec![(IVec2::new(124, 104), 5), (IVec2::new(424, 74), 5)]
        );
    }

    #[test]
    fn test_enemy_fire_is_rare_by_default() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut entities = Entities::default();
        entities
            .enemies
            .push(Enemy::new(IVec2::new(100, 40), MovePattern::Straight, 1));
        for _ in 0..1000 {
            enemy_fire(&mut entities, &tuning, &mut rng);
        }
        // About 10 expected at 1-in-100
        let shots = entities.enemy_bullets.len();
        assert!((1..40).contains(&shots), "{shots} shots");
    }

    #[test]
    fn test_power_up_spawns_inside_screen() {
        let tuning = Tuning {
            power_up_one_in: 1,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(6);
        let mut entities = Entities::default();
        for _ in 0..100 {
            power_ups(&mut entities, &tuning, &mut rng);
        }
        assert_eq!(entities.power_ups.len(), 100);
        for power_up in &entities.power_ups {
            assert!(power_up.pos.x >= 0 && power_up.pos.x + POWER_UP_SIZE.x <= SCREEN_WIDTH);
            assert_eq!(power_up.pos.y, -POWER_UP_SIZE.y);
            assert_eq!(power_up.speed, tuning.power_up_speed);
        }
    }

    #[test]
    fn test_power_up_spawns_when_boss_absent() {
        let mut state = playing_state(8);
        state.tuning.power_up_one_in = 1;
        spawn(&mut state);
        assert_eq!(state.entities.power_ups.len(), 1);
    }

    #[test]
    fn test_no_spawns_while_boss_pending() {
        let mut state = playing_state(8);
        state.boss_triggered = true;
        state.boss_delay = Some(1000);
        state.tuning.power_up_one_in = 1;
        for _ in 0..500 {
            spawn(&mut state);
        }
        assert!(state.entities.rocks.is_empty());
        assert!(state.entities.enemies.is_empty());
        assert!(state.entities.power_ups.is_empty());
    }
}
