//! Per-tick actor behaviour: movement, firing and collisions.
//!
//! Everything here walks id snapshots from the registry and re-checks
//! liveness per id, so contact kills and pickups during the walk never skip
//! or revisit another entity. Processing stops as soon as the player dies.

use rand::Rng;

use super::damage::{apply_powerup, take_hit};
use super::logic::advance_boss_phase;
use super::types::Encounter;
use crate::core::constants::*;
use crate::core::tick::{DamageSource, GameEvent};
use crate::core::timers::Expiry;
use crate::entities::{
    BossPhase, EnemyKind, Entity, EntityClass, EntityId, EntityKind, Projectile, Vec2,
};

fn seconds(dt_ms: u64) -> f32 {
    dt_ms as f32 / 1000.0
}

/// Advance every actor by `dt_ms`: player movement, enemies, boss,
/// projectiles, then pickups.
pub fn update_actors<R: Rng>(enc: &mut Encounter, movement: Vec2, dt_ms: u64, rng: &mut R) {
    move_player(enc, movement, dt_ms);
    update_enemies(enc, dt_ms, rng);
    update_boss(enc, dt_ms, rng);
    update_projectiles(enc, dt_ms, rng);
    collect_powerups(enc, rng);
}

fn player_position(enc: &Encounter) -> Option<Vec2> {
    enc.registry
        .player()
        .and_then(|id| enc.registry.position(id))
}

/// Move the player along `direction` at the run's move speed. Directions
/// longer than one are normalized; the player stays inside the arena.
pub fn move_player(enc: &mut Encounter, direction: Vec2, dt_ms: u64) {
    let direction = if direction.length() > 1.0 {
        direction.normalized()
    } else {
        direction
    };
    let step = direction.scale(enc.run.move_speed as f32 * seconds(dt_ms));
    let bounds = enc.config.arena_bounds();
    let Some(player) = enc.registry.player().and_then(|id| enc.registry.get_mut(id)) else {
        return;
    };
    player.position = bounds.clamp(player.position + step);
}

/// Spawn a projectile at `from` aimed at where `target` is now.
pub fn fire_projectile(enc: &mut Encounter, from: Vec2, target: Vec2) -> EntityId {
    let velocity = (target - from).normalized().scale(PROJECTILE_SPEED);
    let id = enc.registry.spawn(
        from,
        EntityKind::Projectile(Projectile {
            velocity,
            damage: PROJECTILE_DAMAGE,
        }),
    );
    enc.expiries
        .schedule(enc.config.projectile_lifetime_ms, Expiry::Despawn(id));
    enc.events.push(GameEvent::ProjectileFired { id });
    id
}

/// Chase the player; shooters hold a band between the retreat and approach
/// distances and fire. An enemy that touches the player is destroyed and
/// deals its contact damage unless negated.
pub fn update_enemies<R: Rng>(enc: &mut Encounter, dt_ms: u64, rng: &mut R) {
    let Some(target) = player_position(enc) else {
        return;
    };
    let secs = seconds(dt_ms);
    let bounds = enc.config.arena_bounds();

    for id in enc.registry.ids_of(EntityClass::Enemy) {
        if enc.run.is_dead() {
            return;
        }
        let Some(Entity {
            position,
            kind: EntityKind::Enemy(enemy),
            ..
        }) = enc.registry.get_mut(id)
        else {
            continue;
        };

        let toward = (target - *position).normalized();
        let distance = position.distance(target);
        let velocity = match enemy.kind {
            EnemyKind::Shooter if distance > SHOOTER_APPROACH_DISTANCE => {
                toward.scale(enemy.speed)
            }
            EnemyKind::Shooter if distance < SHOOTER_RETREAT_DISTANCE => {
                toward.scale(-enemy.speed)
            }
            EnemyKind::Shooter => Vec2::ZERO,
            _ => toward.scale(enemy.speed),
        };
        *position = bounds.clamp(*position + velocity.scale(secs));

        let now = *position;
        let shooter = enemy.kind == EnemyKind::Shooter;
        let contact_damage = enemy.contact_damage;

        if shooter && rng.gen::<f64>() < SHOOTER_FIRE_RATE_PER_SECOND * secs as f64 {
            fire_projectile(enc, now, target);
        }
        if now.distance(target) < ENEMY_CONTACT_RADIUS && enc.registry.destroy(id).is_some() {
            take_hit(enc, contact_damage, DamageSource::Contact, rng);
        }
    }
}

/// Boss chase, phase checks, phase-three fire and cooldown-gated contact
/// damage. The boss is never destroyed by contact.
pub fn update_boss<R: Rng>(enc: &mut Encounter, dt_ms: u64, rng: &mut R) {
    if enc.run.is_dead() {
        return;
    }
    advance_boss_phase(enc, rng);

    let Some(target) = player_position(enc) else {
        return;
    };
    let Some(id) = enc.registry.boss() else {
        return;
    };
    let secs = seconds(dt_ms);
    let bounds = enc.config.arena_bounds();
    let Some(Entity {
        position,
        kind: EntityKind::Boss(boss),
        ..
    }) = enc.registry.get_mut(id)
    else {
        return;
    };

    let step = (target - *position).normalized().scale(BOSS_SPEED * secs);
    *position = bounds.clamp(*position + step);
    boss.contact_cooldown_ms = boss.contact_cooldown_ms.saturating_sub(dt_ms);

    let now = *position;
    let firing = boss.phase == BossPhase::Three;
    let touching = now.distance(target) < BOSS_CONTACT_RADIUS && boss.contact_cooldown_ms == 0;
    let contact_damage = boss.contact_damage;
    if touching {
        boss.contact_cooldown_ms = BOSS_CONTACT_COOLDOWN_MS;
    }

    if firing && rng.gen::<f64>() < BOSS_FIRE_RATE_PER_SECOND * secs as f64 {
        fire_projectile(enc, now, target);
    }
    if touching {
        take_hit(enc, contact_damage, DamageSource::BossContact, rng);
    }
}

/// Move projectiles; drop those that leave the arena and resolve those that
/// reach the player.
pub fn update_projectiles<R: Rng>(enc: &mut Encounter, dt_ms: u64, rng: &mut R) {
    let Some(target) = player_position(enc) else {
        return;
    };
    let secs = seconds(dt_ms);
    let bounds = enc.config.arena_bounds();

    for id in enc.registry.ids_of(EntityClass::Projectile) {
        if enc.run.is_dead() {
            return;
        }
        let Some(Entity {
            position,
            kind: EntityKind::Projectile(projectile),
            ..
        }) = enc.registry.get_mut(id)
        else {
            continue;
        };
        *position = *position + projectile.velocity.scale(secs);
        let now = *position;
        let damage = projectile.damage;

        if !bounds.contains(now) {
            enc.registry.destroy(id);
        } else if now.distance(target) < PROJECTILE_HIT_RADIUS && enc.registry.destroy(id).is_some()
        {
            take_hit(enc, damage, DamageSource::Projectile, rng);
        }
    }
}

/// Pick up every powerup within reach of the player.
pub fn collect_powerups<R: Rng>(enc: &mut Encounter, rng: &mut R) {
    let Some(target) = player_position(enc) else {
        return;
    };
    for id in enc.registry.ids_of(EntityClass::Powerup) {
        let in_reach = enc
            .registry
            .position(id)
            .is_some_and(|position| position.distance(target) < PICKUP_RADIUS);
        if !in_reach {
            continue;
        }
        if let Some(Entity {
            kind: EntityKind::Powerup(powerup),
            ..
        }) = enc.registry.destroy(id)
        {
            apply_powerup(enc, powerup.kind, rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GameConfig;
    use crate::core::run_state::RunState;
    use crate::core::timers::ExpiryQueue;
    use crate::entities::{Boss, Enemy, EntityRegistry, Powerup, PowerupKind};
    use crate::progress::PersistentProgress;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Fixture {
        config: GameConfig,
        run: RunState,
        registry: EntityRegistry,
        expiries: ExpiryQueue,
        events: Vec<GameEvent>,
    }

    impl Fixture {
        fn new() -> Self {
            let mut registry = EntityRegistry::new();
            registry.spawn(Vec2::new(400.0, 300.0), EntityKind::Player);
            Self {
                config: GameConfig::default(),
                run: RunState::new(&PersistentProgress::default()),
                registry,
                expiries: ExpiryQueue::new(),
                events: Vec::new(),
            }
        }

        fn enc(&mut self) -> Encounter<'_> {
            Encounter {
                config: &self.config,
                run: &mut self.run,
                registry: &mut self.registry,
                expiries: &mut self.expiries,
                events: &mut self.events,
            }
        }

        fn spawn_enemy(&mut self, kind: EnemyKind, at: Vec2) -> EntityId {
            self.registry
                .spawn(at, EntityKind::Enemy(Enemy::for_level(kind, 1)))
        }

        fn player_pos(&self) -> Vec2 {
            self.registry
                .position(self.registry.player().unwrap())
                .unwrap()
        }
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(21)
    }

    #[test]
    fn test_player_moves_and_stays_in_arena() {
        let mut fx = Fixture::new();
        move_player(&mut fx.enc(), Vec2::new(1.0, 0.0), 1_000);
        assert_eq!(fx.player_pos(), Vec2::new(675.0, 300.0));
        move_player(&mut fx.enc(), Vec2::new(1.0, 0.0), 10_000);
        assert_eq!(fx.player_pos(), Vec2::new(800.0, 300.0));
    }

    #[test]
    fn test_chaser_closes_distance() {
        let mut fx = Fixture::new();
        let id = fx.spawn_enemy(EnemyKind::Chaser, Vec2::new(100.0, 300.0));
        update_enemies(&mut fx.enc(), 1_000, &mut rng());
        assert_eq!(fx.registry.position(id), Some(Vec2::new(155.0, 300.0)));
    }

    #[test]
    fn test_shooter_holds_band() {
        let mut fx = Fixture::new();
        let near = fx.spawn_enemy(EnemyKind::Shooter, Vec2::new(300.0, 300.0));
        let mid = fx.spawn_enemy(EnemyKind::Shooter, Vec2::new(400.0, 125.0));
        update_enemies(&mut fx.enc(), 100, &mut rng());
        assert!(fx.registry.position(near).unwrap().x < 300.0);
        assert_eq!(fx.registry.position(mid), Some(Vec2::new(400.0, 125.0)));
    }

    #[test]
    fn test_contact_destroys_enemy_and_damages() {
        let mut fx = Fixture::new();
        let id = fx.spawn_enemy(EnemyKind::Slime, Vec2::new(410.0, 300.0));
        update_enemies(&mut fx.enc(), 16, &mut rng());
        assert!(!fx.registry.contains(id));
        assert_eq!(fx.run.health, 125.0 - 4.0);
    }

    #[test]
    fn test_shield_does_not_stop_contact_damage() {
        let mut fx = Fixture::new();
        fx.run.shield_layers = 1;
        let id = fx.spawn_enemy(EnemyKind::Slime, Vec2::new(410.0, 300.0));
        update_enemies(&mut fx.enc(), 16, &mut rng());
        assert!(!fx.registry.contains(id));
        assert_eq!(fx.run.health, 125.0 - 4.0);
        assert!(fx.run.is_shielded());
    }

    #[test]
    fn test_boss_contact_has_cooldown_and_survives() {
        let mut fx = Fixture::new();
        let boss = fx
            .registry
            .spawn(Vec2::new(400.0, 320.0), EntityKind::Boss(Boss::for_level(5)));
        let mut rng = rng();
        update_boss(&mut fx.enc(), 100, &mut rng);
        assert_eq!(fx.run.health, 110.0);
        for _ in 0..10 {
            update_boss(&mut fx.enc(), 100, &mut rng);
        }
        assert_eq!(fx.run.health, 95.0);
        assert!(fx.registry.contains(boss));
    }

    #[test]
    fn test_projectile_hits_player_once() {
        let mut fx = Fixture::new();
        let id = fire_projectile(&mut fx.enc(), Vec2::new(400.0, 250.0), Vec2::new(400.0, 300.0));
        assert_eq!(fx.expiries.len(), 1);
        update_projectiles(&mut fx.enc(), 150, &mut rng());
        assert!(!fx.registry.contains(id));
        assert_eq!(fx.run.health, 115.0);
    }

    #[test]
    fn test_projectile_leaving_arena_is_removed() {
        let mut fx = Fixture::new();
        let id = fire_projectile(&mut fx.enc(), Vec2::new(10.0, 10.0), Vec2::new(0.0, 10.0));
        update_projectiles(&mut fx.enc(), 100, &mut rng());
        assert!(!fx.registry.contains(id));
        assert_eq!(fx.run.health, fx.run.max_health);
    }

    #[test]
    fn test_pickup_in_reach_only() {
        let mut fx = Fixture::new();
        let near = fx.registry.spawn(
            Vec2::new(420.0, 300.0),
            EntityKind::Powerup(Powerup {
                kind: PowerupKind::Score,
            }),
        );
        let far = fx.registry.spawn(
            Vec2::new(500.0, 300.0),
            EntityKind::Powerup(Powerup {
                kind: PowerupKind::Score,
            }),
        );
        collect_powerups(&mut fx.enc(), &mut rng());
        assert!(!fx.registry.contains(near));
        assert!(fx.registry.contains(far));
        assert_eq!(fx.run.score, 200);
        assert_eq!(fx.run.powerups_collected, 1);
    }

    #[test]
    fn test_dead_player_stops_processing() {
        let mut fx = Fixture::new();
        fx.run.health = 1.0;
        fx.spawn_enemy(EnemyKind::Chaser, Vec2::new(405.0, 300.0));
        let second = fx.spawn_enemy(EnemyKind::Chaser, Vec2::new(395.0, 300.0));
        update_enemies(&mut fx.enc(), 16, &mut rng());
        assert!(fx.run.is_dead());
        assert!(fx.registry.contains(second));
        assert_eq!(fx.run.damage_taken, 4.0);
    }
}
