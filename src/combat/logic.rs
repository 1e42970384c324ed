//! Attack, kill and loot rules.
//!
//! Every function takes an [`Encounter`] and applies its effects in place.
//! A kill always goes through [`EntityRegistry::destroy`] first and only
//! credits score when that call actually removed the entity, so an enemy
//! reduced below zero by several effects in one step is credited once.
//!
//! [`EntityRegistry::destroy`]: crate::entities::EntityRegistry::destroy

use rand::Rng;

use super::types::{AttackOutcome, Encounter};
use crate::core::constants::*;
use crate::core::director::spawn_enemy;
use crate::core::run_state::RunState;
use crate::core::tick::{AudioCue, GameEvent};
use crate::core::timers::Expiry;
use crate::entities::{
    BossPhase, EntityClass, EntityId, EntityKind, Powerup, PowerupKind, Vec2,
};
use crate::perks::PerkId;

/// Convert one mining input into hash-power and score. Returns the
/// hash-power gained.
pub fn mine(enc: &mut Encounter) -> f64 {
    let vampire = enc.run.has_perk(PerkId::Vampire);
    let amount = if vampire {
        enc.run.mining_power * VAMPIRE_MINING_MULTIPLIER
    } else {
        enc.run.mining_power
    };
    let score = (amount / MINE_SCORE_DIVISOR).floor() as u64 * enc.run.fortune_multiplier();

    enc.run.hash_power += amount;
    enc.run.score += score;
    enc.run.total_mines += 1;
    if vampire {
        enc.run.heal(VAMPIRE_HEAL);
    }

    enc.events.push(GameEvent::Cue(AudioCue::Mine));
    enc.events.push(GameEvent::Mined { amount, score });
    amount
}

/// Damage for one paid hit and whether it crit. Only rolls when the crit perk
/// is held.
pub fn roll_attack_damage<R: Rng>(run: &RunState, rng: &mut R) -> (f64, bool) {
    let crit = run.has_perk(PerkId::Crit) && rng.gen::<f64>() < CRIT_CHANCE;
    let damage = if crit {
        run.attack_damage * CRIT_MULTIPLIER
    } else {
        run.attack_damage
    };
    (damage, crit)
}

/// Deduct the attack cost if affordable. Hash-power never goes negative.
fn pay_for_hit(run: &mut RunState) -> bool {
    if !run.can_afford_attack() {
        return false;
    }
    run.hash_power -= run.attack_cost;
    true
}

/// Attack everything whose hit region contains `point`.
///
/// Each struck enemy costs `attack_cost` separately; once hash-power runs
/// short the remaining targets are left alone. A target killed by an earlier
/// target's chain splash is skipped without cost. The boss is attacked last.
pub fn attack_at<R: Rng>(enc: &mut Encounter, point: Vec2, rng: &mut R) -> AttackOutcome {
    let mut outcome = AttackOutcome::default();
    if !enc.run.can_afford_attack() {
        return outcome;
    }

    let targets: Vec<EntityId> = enc
        .registry
        .ids_of(EntityClass::Enemy)
        .into_iter()
        .filter(|id| {
            enc.registry
                .get(*id)
                .is_some_and(|entity| entity.hit_region_contains(point))
        })
        .collect();

    for id in targets {
        let Some(origin) = enc.registry.position(id) else {
            continue;
        };
        if !pay_for_hit(enc.run) {
            break;
        }
        let (damage, crit) = roll_attack_damage(enc.run, rng);
        enc.events.push(GameEvent::Cue(AudioCue::Attack));
        outcome.hits += 1;

        if hit_enemy(enc, id, damage, crit, false, rng) {
            outcome.kills += 1;
        }
        if enc.run.has_perk(PerkId::Chain) {
            outcome.kills += chain_lightning(enc, id, origin, damage, rng);
        }
    }

    let boss_targeted = enc
        .registry
        .boss()
        .and_then(|id| enc.registry.get(id))
        .is_some_and(|boss| boss.hit_region_contains(point));
    if boss_targeted && pay_for_hit(enc.run) {
        let (damage, crit) = roll_attack_damage(enc.run, rng);
        enc.events.push(GameEvent::Cue(AudioCue::Attack));
        outcome.hits += 1;
        outcome.boss_killed = hit_boss(enc, damage, crit, rng);
    }

    outcome
}

/// Apply damage to one enemy and resolve its death in the same step.
/// Returns true only if this hit killed it. A stale handle is a no-op.
pub fn hit_enemy<R: Rng>(
    enc: &mut Encounter,
    id: EntityId,
    damage: f64,
    crit: bool,
    chained: bool,
    rng: &mut R,
) -> bool {
    let Some(EntityKind::Enemy(enemy)) = enc.registry.get_mut(id).map(|entity| &mut entity.kind)
    else {
        return false;
    };
    enemy.health = (enemy.health - damage).max(0.0);
    let dead = enemy.health <= 0.0;

    enc.events.push(GameEvent::EnemyHit {
        id,
        damage,
        crit,
        chained,
    });
    enc.events.push(GameEvent::Cue(AudioCue::Hit));

    dead && kill_enemy(enc, id, rng)
}

/// Remove an enemy and credit the kill. Returns false if it was already gone.
pub fn kill_enemy<R: Rng>(enc: &mut Encounter, id: EntityId, rng: &mut R) -> bool {
    let kind = match enc.registry.get(id).map(|entity| &entity.kind) {
        Some(EntityKind::Enemy(enemy)) => enemy.kind,
        _ => return false,
    };
    let Some(entity) = enc.registry.destroy(id) else {
        return false;
    };

    let score = KILL_SCORE * enc.run.fortune_multiplier();
    enc.run.score += score;
    enc.run.kills += 1;
    if enc.run.has_perk(PerkId::Lifesteal) {
        enc.run.heal(LIFESTEAL_HEAL);
    }

    enc.events.push(GameEvent::Cue(AudioCue::Kill));
    enc.events.push(GameEvent::EnemyKilled { id, kind, score });
    tracing::debug!(enemy = kind.name(), kills = enc.run.kills, "enemy killed");

    if rng.gen::<f64>() < enc.config.powerup_drop_chance {
        drop_powerup(enc, entity.position, rng);
    }
    true
}

/// Splash `damage * CHAIN_DAMAGE_FACTOR` onto every other live enemy within
/// `CHAIN_RADIUS` of `origin`. Runs after the primary hit has fully resolved.
/// Returns the number of kills.
pub fn chain_lightning<R: Rng>(
    enc: &mut Encounter,
    source: EntityId,
    origin: Vec2,
    damage: f64,
    rng: &mut R,
) -> u32 {
    let splash = damage * CHAIN_DAMAGE_FACTOR;
    let mut kills = 0;
    for id in enc.registry.ids_of(EntityClass::Enemy) {
        if id == source {
            continue;
        }
        let in_range = enc
            .registry
            .position(id)
            .is_some_and(|position| position.distance(origin) < CHAIN_RADIUS);
        if in_range && hit_enemy(enc, id, splash, false, true, rng) {
            kills += 1;
        }
    }
    kills
}

/// Apply damage to the boss, then either resolve its death or check for a
/// phase change. Returns true if the boss died.
pub fn hit_boss<R: Rng>(enc: &mut Encounter, damage: f64, crit: bool, rng: &mut R) -> bool {
    let Some(id) = enc.registry.boss() else {
        return false;
    };
    let Some(EntityKind::Boss(boss)) = enc.registry.get_mut(id).map(|entity| &mut entity.kind)
    else {
        return false;
    };
    boss.health = (boss.health - damage).max(0.0);
    let dead = boss.health <= 0.0;

    enc.events.push(GameEvent::BossHit { damage, crit });
    enc.events.push(GameEvent::Cue(AudioCue::Hit));

    if dead {
        return kill_boss(enc, id, rng);
    }
    advance_boss_phase(enc, rng);
    false
}

/// Move the boss forward through every phase its health fraction has crossed.
///
/// Phases never regress and each transition happens once: the step into
/// phase two spawns reinforcements even when a single hit skips straight
/// past it. Returns the latest phase entered, if any.
pub fn advance_boss_phase<R: Rng>(enc: &mut Encounter, rng: &mut R) -> Option<BossPhase> {
    let id = enc.registry.boss()?;
    let mut entered = None;
    loop {
        let next = match enc.registry.get_mut(id).map(|entity| &mut entity.kind) {
            Some(EntityKind::Boss(boss)) => {
                let target = BossPhase::for_health_fraction(boss.health_fraction());
                match boss.phase.next() {
                    Some(next) if next <= target => {
                        boss.phase = next;
                        next
                    }
                    _ => break,
                }
            }
            _ => break,
        };
        entered = Some(next);

        let reinforcements = if next == BossPhase::Two {
            BOSS_PHASE_TWO_REINFORCEMENTS
        } else {
            0
        };
        tracing::info!(phase = next.number(), reinforcements, "boss phase changed");
        enc.events.push(GameEvent::BossPhaseChanged {
            phase: next,
            reinforcements,
        });
        for _ in 0..reinforcements {
            spawn_enemy(enc, rng);
        }
    }
    entered
}

/// Remove the boss and credit the kill. The kill counter and lifesteal are
/// untouched; a powerup always drops.
pub fn kill_boss<R: Rng>(enc: &mut Encounter, id: EntityId, rng: &mut R) -> bool {
    if enc.registry.get(id).map(|entity| entity.class()) != Some(EntityClass::Boss) {
        return false;
    }
    let Some(entity) = enc.registry.destroy(id) else {
        return false;
    };

    let score = BOSS_KILL_SCORE * enc.run.fortune_multiplier();
    enc.run.score += score;
    enc.run.bosses_killed += 1;

    enc.events.push(GameEvent::Cue(AudioCue::Kill));
    enc.events.push(GameEvent::Cue(AudioCue::LevelUp));
    enc.events.push(GameEvent::BossKilled { score });
    tracing::info!(bosses_killed = enc.run.bosses_killed, score, "boss defeated");

    drop_powerup(enc, entity.position, rng);
    true
}

/// Spawn a random powerup at `position` with a finite lifetime.
pub fn drop_powerup<R: Rng>(enc: &mut Encounter, position: Vec2, rng: &mut R) -> EntityId {
    let kind = PowerupKind::ALL[rng.gen_range(0..PowerupKind::ALL.len())];
    let id = enc
        .registry
        .spawn(position, EntityKind::Powerup(Powerup { kind }));
    enc.expiries
        .schedule(enc.config.powerup_lifetime_ms, Expiry::Despawn(id));
    enc.events.push(GameEvent::PowerupDropped { id, kind });
    id
}

/// Flat damage to every live enemy, each resolving its own kill. The boss is
/// not affected. Returns the number of kills.
pub fn fire_laser<R: Rng>(enc: &mut Encounter, rng: &mut R) -> u32 {
    let mut kills = 0;
    for id in enc.registry.ids_of(EntityClass::Enemy) {
        if hit_enemy(enc, id, LASER_DAMAGE, false, false, rng) {
            kills += 1;
        }
    }
    kills
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GameConfig;
    use crate::core::timers::ExpiryQueue;
    use crate::entities::{Boss, Enemy, EnemyKind, EntityRegistry};
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
            Self {
                config: GameConfig {
                    powerup_drop_chance: 0.0,
                    ..GameConfig::default()
                },
                run: RunState::new(&PersistentProgress::default()),
                registry: EntityRegistry::new(),
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

        fn enemy_at(&mut self, x: f32, y: f32, health: f64) -> EntityId {
            let mut enemy = Enemy::for_level(EnemyKind::Chaser, 1);
            enemy.health = health;
            self.registry
                .spawn(Vec2::new(x, y), EntityKind::Enemy(enemy))
        }

        fn boss_at_fraction(&mut self, fraction: f64) -> EntityId {
            let mut boss = Boss::for_level(1);
            boss.health = boss.max_health * fraction;
            self.registry
                .spawn(Vec2::new(400.0, 50.0), EntityKind::Boss(boss))
        }
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn test_mine_base() {
        let mut fx = Fixture::new();
        fx.run.mining_power = 10.0;
        let amount = mine(&mut fx.enc());
        assert_eq!(amount, 10.0);
        assert_eq!(fx.run.hash_power, 10.0);
        assert_eq!(fx.run.score, 5);
        assert_eq!(fx.run.total_mines, 1);
    }

    #[test]
    fn test_mine_with_fortune_doubles_score() {
        let mut fx = Fixture::new();
        fx.run.mining_power = 10.0;
        fx.run.perks.insert(PerkId::Fortune);
        mine(&mut fx.enc());
        assert_eq!(fx.run.score, 10);
    }

    #[test]
    fn test_mine_with_vampire_heals_and_boosts() {
        let mut fx = Fixture::new();
        fx.run.mining_power = 15.0;
        fx.run.health = 100.0;
        fx.run.perks.insert(PerkId::Vampire);
        mine(&mut fx.enc());
        assert_eq!(fx.run.hash_power, 22.5);
        assert_eq!(fx.run.score, 11);
        assert_eq!(fx.run.health, 102.0);
    }

    #[test]
    fn test_attack_kills_low_health_enemy() {
        let mut fx = Fixture::new();
        fx.run.hash_power = 20.0;
        fx.run.attack_cost = 20.0;
        fx.run.attack_damage = 30.0;
        let id = fx.enemy_at(100.0, 100.0, 25.0);

        let outcome = attack_at(&mut fx.enc(), Vec2::new(105.0, 95.0), &mut rng());
        assert_eq!(outcome.hits, 1);
        assert_eq!(outcome.kills, 1);
        assert_eq!(fx.run.hash_power, 0.0);
        assert_eq!(fx.run.kills, 1);
        assert_eq!(fx.run.score, 50);
        assert!(!fx.registry.contains(id));
    }

    #[test]
    fn test_attack_without_hash_power_is_noop() {
        let mut fx = Fixture::new();
        fx.run.hash_power = 16.0;
        let id = fx.enemy_at(100.0, 100.0, 25.0);

        let outcome = attack_at(&mut fx.enc(), Vec2::new(100.0, 100.0), &mut rng());
        assert!(outcome.missed());
        assert_eq!(fx.run.hash_power, 16.0);
        assert!(fx.registry.contains(id));
        assert!(fx.events.is_empty());
    }

    #[test]
    fn test_attack_on_empty_point_costs_nothing() {
        let mut fx = Fixture::new();
        fx.run.hash_power = 100.0;
        fx.enemy_at(100.0, 100.0, 25.0);

        let outcome = attack_at(&mut fx.enc(), Vec2::new(300.0, 300.0), &mut rng());
        assert!(outcome.missed());
        assert_eq!(fx.run.hash_power, 100.0);
    }

    #[test]
    fn test_overlapping_enemies_each_cost() {
        let mut fx = Fixture::new();
        fx.run.hash_power = 40.0;
        fx.run.attack_cost = 17.0;
        fx.run.attack_damage = 10.0;
        fx.enemy_at(100.0, 100.0, 50.0);
        fx.enemy_at(104.0, 100.0, 50.0);
        fx.enemy_at(108.0, 100.0, 50.0);

        let outcome = attack_at(&mut fx.enc(), Vec2::new(104.0, 100.0), &mut rng());
        assert_eq!(outcome.hits, 2);
        assert_eq!(fx.run.hash_power, 6.0);
    }

    #[test]
    fn test_chain_kill_credited_once() {
        let mut fx = Fixture::new();
        fx.run.hash_power = 100.0;
        fx.run.attack_damage = 30.0;
        fx.run.perks.insert(PerkId::Chain);
        let primary = fx.enemy_at(100.0, 100.0, 20.0);
        let near = fx.enemy_at(150.0, 100.0, 10.0);
        let far = fx.enemy_at(300.0, 100.0, 10.0);

        let outcome = attack_at(&mut fx.enc(), Vec2::new(100.0, 100.0), &mut rng());
        assert_eq!(outcome.kills, 2);
        assert_eq!(fx.run.kills, 2);
        assert_eq!(fx.run.score, 100);
        assert!(!fx.registry.contains(primary));
        assert!(!fx.registry.contains(near));
        assert!(fx.registry.contains(far));
    }

    #[test]
    fn test_chain_splash_is_half_damage() {
        let mut fx = Fixture::new();
        fx.run.hash_power = 100.0;
        fx.run.attack_damage = 30.0;
        fx.run.perks.insert(PerkId::Chain);
        fx.enemy_at(100.0, 100.0, 100.0);
        let near = fx.enemy_at(160.0, 100.0, 100.0);

        attack_at(&mut fx.enc(), Vec2::new(100.0, 100.0), &mut rng());
        match &fx.registry.get(near).unwrap().kind {
            EntityKind::Enemy(enemy) => assert_eq!(enemy.health, 85.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_chain_skips_overlapping_target_it_killed() {
        let mut fx = Fixture::new();
        fx.run.hash_power = 100.0;
        fx.run.attack_cost = 10.0;
        fx.run.attack_damage = 40.0;
        fx.run.perks.insert(PerkId::Chain);
        fx.enemy_at(100.0, 100.0, 100.0);
        fx.enemy_at(105.0, 100.0, 15.0);

        let outcome = attack_at(&mut fx.enc(), Vec2::new(103.0, 100.0), &mut rng());
        assert_eq!(outcome.hits, 1);
        assert_eq!(outcome.kills, 1);
        assert_eq!(fx.run.hash_power, 90.0);
        assert_eq!(fx.run.kills, 1);
    }

    #[test]
    fn test_lifesteal_heals_on_kill_capped() {
        let mut fx = Fixture::new();
        fx.run.health = fx.run.max_health - 2.0;
        fx.run.perks.insert(PerkId::Lifesteal);
        let id = fx.enemy_at(0.0, 0.0, 1.0);
        assert!(kill_enemy(&mut fx.enc(), id, &mut rng()));
        assert_eq!(fx.run.health, fx.run.max_health);
        assert!(!kill_enemy(&mut fx.enc(), id, &mut rng()));
        assert_eq!(fx.run.kills, 1);
    }

    #[test]
    fn test_crit_doubles_damage() {
        let mut fx = Fixture::new();
        fx.run.attack_damage = 45.0;
        fx.run.perks.insert(PerkId::Crit);
        let mut rng = rng();
        let rolls: Vec<(f64, bool)> = (0..200)
            .map(|_| roll_attack_damage(&fx.run, &mut rng))
            .collect();
        assert!(rolls.iter().any(|(_, crit)| *crit));
        assert!(rolls.iter().any(|(_, crit)| !*crit));
        for (damage, crit) in rolls {
            assert_eq!(damage, if crit { 90.0 } else { 45.0 });
        }
    }

    #[test]
    fn test_no_crit_without_perk() {
        let fx = Fixture::new();
        let mut rng = rng();
        for _ in 0..100 {
            assert_eq!(roll_attack_damage(&fx.run, &mut rng), (45.0, false));
        }
    }

    #[test]
    fn test_boss_phase_two_spawns_reinforcements_once() {
        let mut fx = Fixture::new();
        fx.boss_at_fraction(0.49);
        let mut rng = rng();

        assert_eq!(advance_boss_phase(&mut fx.enc(), &mut rng), Some(BossPhase::Two));
        assert_eq!(fx.registry.count(EntityClass::Enemy), 3);

        let id = fx.registry.boss().unwrap();
        if let EntityKind::Boss(boss) = &mut fx.registry.get_mut(id).unwrap().kind {
            boss.health = boss.max_health * 0.48;
        }
        assert_eq!(advance_boss_phase(&mut fx.enc(), &mut rng), None);
        assert_eq!(fx.registry.count(EntityClass::Enemy), 3);
    }

    #[test]
    fn test_boss_phase_skip_still_reinforces() {
        let mut fx = Fixture::new();
        fx.boss_at_fraction(0.1);
        assert_eq!(
            advance_boss_phase(&mut fx.enc(), &mut rng()),
            Some(BossPhase::Three)
        );
        assert_eq!(fx.registry.count(EntityClass::Enemy), 3);
    }

    #[test]
    fn test_boss_kill_rewards() {
        let mut fx = Fixture::new();
        fx.run.hash_power = 100.0;
        fx.run.perks.insert(PerkId::Fortune);
        fx.run.perks.insert(PerkId::Lifesteal);
        fx.run.health = 50.0;
        fx.boss_at_fraction(0.1);

        let outcome = attack_at(&mut fx.enc(), Vec2::new(400.0, 50.0), &mut rng());
        assert!(outcome.boss_killed);
        assert_eq!(fx.run.score, 1000);
        assert_eq!(fx.run.bosses_killed, 1);
        assert_eq!(fx.run.kills, 0);
        assert_eq!(fx.run.health, 50.0);
        assert!(fx.registry.boss().is_none());
        assert_eq!(fx.registry.count(EntityClass::Powerup), 1);
        assert_eq!(fx.expiries.len(), 1);
    }

    #[test]
    fn test_laser_hits_every_enemy() {
        let mut fx = Fixture::new();
        fx.enemy_at(10.0, 10.0, 40.0);
        let tough = fx.enemy_at(500.0, 500.0, 80.0);
        fx.boss_at_fraction(1.0);

        assert_eq!(fire_laser(&mut fx.enc(), &mut rng()), 1);
        assert_eq!(fx.registry.count(EntityClass::Enemy), 1);
        assert!(fx.registry.contains(tough));
        let boss = fx.registry.get(fx.registry.boss().unwrap()).unwrap();
        assert_eq!(boss.health_fraction(), Some(1.0));
    }
}
