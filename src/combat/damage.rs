//! Damage taken by the player, powerup effects and timed effect expiry.

use rand::Rng;

use super::logic::fire_laser;
use super::types::Encounter;
use crate::core::constants::*;
use crate::core::run_state::DoubleMiningBuff;
use crate::core::tick::{AudioCue, AvoidReason, DamageSource, GameEvent};
use crate::core::timers::Expiry;
use crate::entities::PowerupKind;
use crate::perks::PerkId;

/// Apply incoming damage unless it is negated. The shield only stops
/// projectiles; any source can be dodged. Returns true if the hit killed the
/// player.
pub fn take_hit<R: Rng>(
    enc: &mut Encounter,
    amount: f64,
    source: DamageSource,
    rng: &mut R,
) -> bool {
    if enc.run.is_dead() {
        return false;
    }
    if source == DamageSource::Projectile && enc.run.is_shielded() {
        enc.events.push(GameEvent::DamageAvoided {
            source,
            reason: AvoidReason::Shield,
        });
        return false;
    }
    if enc.run.has_perk(PerkId::Dodge) && rng.gen::<f64>() < DODGE_CHANCE {
        enc.events.push(GameEvent::DamageAvoided {
            source,
            reason: AvoidReason::Dodge,
        });
        return false;
    }

    let died = enc.run.take_damage(amount);
    enc.events.push(GameEvent::PlayerDamaged { amount, source });
    enc.events.push(GameEvent::Cue(AudioCue::Hit));
    died
}

/// Apply a picked-up powerup. The entity itself is already gone.
pub fn apply_powerup<R: Rng>(enc: &mut Encounter, kind: PowerupKind, rng: &mut R) {
    enc.run.powerups_collected += 1;
    enc.events.push(GameEvent::Cue(AudioCue::Powerup));
    enc.events.push(GameEvent::PowerupCollected { kind });

    match kind {
        PowerupKind::Health => {
            enc.run.heal(HEALTH_POWERUP_AMOUNT);
        }
        PowerupKind::Shield => {
            enc.run.shield_layers += 1;
            enc.expiries.schedule(SHIELD_DURATION_MS, Expiry::ShieldFade);
        }
        PowerupKind::Double => {
            // A second pickup while the buff runs is absorbed.
            if enc.run.double_mining.is_none() {
                enc.run.double_mining = Some(DoubleMiningBuff {
                    restore_to: enc.run.mining_power,
                });
                enc.run.mining_power *= DOUBLE_MINING_MULTIPLIER;
                enc.expiries
                    .schedule(DOUBLE_MINING_DURATION_MS, Expiry::DoubleMiningEnd);
            }
        }
        PowerupKind::Score => {
            enc.run.score += SCORE_POWERUP_BONUS * enc.run.fortune_multiplier();
        }
        PowerupKind::Laser => {
            fire_laser(enc, rng);
        }
    }
}

/// Resolve a due expiry. Stale entries are no-ops.
pub fn apply_expiry(enc: &mut Encounter, expiry: Expiry) {
    match expiry {
        Expiry::Despawn(id) => {
            enc.registry.destroy(id);
        }
        Expiry::ShieldFade => {
            enc.run.shield_layers = enc.run.shield_layers.saturating_sub(1);
        }
        Expiry::DoubleMiningEnd => {
            if let Some(buff) = enc.run.double_mining.take() {
                enc.run.mining_power = buff.restore_to;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GameConfig;
    use crate::core::run_state::RunState;
    use crate::core::timers::ExpiryQueue;
    use crate::entities::{EntityKind, EntityRegistry, Powerup, Vec2};
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
                config: GameConfig::default(),
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

        /// Advance the expiry queue and apply whatever came due.
        fn advance(&mut self, dt_ms: u64) {
            let due = self.expiries.advance(dt_ms);
            let mut enc = self.enc();
            for expiry in due {
                apply_expiry(&mut enc, expiry);
            }
        }
    }

    #[test]
    fn test_hit_reduces_health() {
        let mut fx = Fixture::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let died = take_hit(&mut fx.enc(), 10.0, DamageSource::Projectile, &mut rng);
        assert!(!died);
        assert_eq!(fx.run.health, 115.0);
        assert_eq!(fx.run.damage_taken, 10.0);
    }

    #[test]
    fn test_shield_negates_damage() {
        let mut fx = Fixture::new();
        fx.run.shield_layers = 1;
        take_hit(&mut fx.enc(), 10.0, DamageSource::Projectile, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(fx.run.health, fx.run.max_health);
        assert_eq!(
            fx.events,
            vec![GameEvent::DamageAvoided {
                source: DamageSource::Projectile,
                reason: AvoidReason::Shield
            }]
        );
    }

    #[test]
    fn test_shield_does_not_stop_contact() {
        let mut fx = Fixture::new();
        fx.run.shield_layers = 1;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        take_hit(&mut fx.enc(), 10.0, DamageSource::Contact, &mut rng);
        take_hit(&mut fx.enc(), 15.0, DamageSource::BossContact, &mut rng);
        assert_eq!(fx.run.health, 100.0);
        assert_eq!(fx.run.shield_layers, 1);
    }

    #[test]
    fn test_dodge_rate_is_roughly_fifteen_percent() {
        let mut fx = Fixture::new();
        fx.run.max_health = 1_000_000.0;
        fx.run.health = fx.run.max_health;
        fx.run.perks.insert(PerkId::Dodge);
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..2_000 {
            take_hit(&mut fx.enc(), 1.0, DamageSource::Contact, &mut rng);
        }
        let dodged = fx
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::DamageAvoided { .. }))
            .count();
        assert!((200..400).contains(&dodged), "dodged {dodged} of 2000");
    }

    #[test]
    fn test_lethal_hit_clamps_to_zero() {
        let mut fx = Fixture::new();
        fx.run.health = 5.0;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(take_hit(&mut fx.enc(), 15.0, DamageSource::BossContact, &mut rng));
        assert_eq!(fx.run.health, 0.0);
    }

    #[test]
    fn test_health_powerup_caps() {
        let mut fx = Fixture::new();
        fx.run.health = 110.0;
        apply_powerup(&mut fx.enc(), PowerupKind::Health, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(fx.run.health, 125.0);
        assert_eq!(fx.run.powerups_collected, 1);
    }

    #[test]
    fn test_shield_fades_after_duration() {
        let mut fx = Fixture::new();
        apply_powerup(&mut fx.enc(), PowerupKind::Shield, &mut ChaCha8Rng::seed_from_u64(1));
        assert!(fx.run.is_shielded());
        fx.advance(SHIELD_DURATION_MS - 1);
        assert!(fx.run.is_shielded());
        fx.advance(1);
        assert!(!fx.run.is_shielded());
    }

    #[test]
    fn test_overlapping_shields_keep_later_window() {
        let mut fx = Fixture::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        apply_powerup(&mut fx.enc(), PowerupKind::Shield, &mut rng);
        fx.advance(3_000);
        apply_powerup(&mut fx.enc(), PowerupKind::Shield, &mut rng);
        fx.advance(2_000);
        assert!(fx.run.is_shielded());
        fx.advance(3_000);
        assert!(!fx.run.is_shielded());
    }

    #[test]
    fn test_double_mining_restores_exact_value() {
        let mut fx = Fixture::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        fx.run.mining_power = 15.0;
        apply_powerup(&mut fx.enc(), PowerupKind::Double, &mut rng);
        assert_eq!(fx.run.mining_power, 30.0);

        fx.advance(4_000);
        apply_powerup(&mut fx.enc(), PowerupKind::Double, &mut rng);
        assert_eq!(fx.run.mining_power, 30.0);
        assert_eq!(fx.run.powerups_collected, 2);

        fx.advance(6_000);
        assert_eq!(fx.run.mining_power, 15.0);
        assert!(fx.run.double_mining.is_none());
        fx.advance(10_000);
        assert_eq!(fx.run.mining_power, 15.0);
    }

    #[test]
    fn test_score_powerup_with_fortune() {
        let mut fx = Fixture::new();
        fx.run.perks.insert(PerkId::Fortune);
        apply_powerup(&mut fx.enc(), PowerupKind::Score, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(fx.run.score, 400);
    }

    #[test]
    fn test_stale_despawn_is_noop() {
        let mut fx = Fixture::new();
        let id = fx.registry.spawn(
            Vec2::new(1.0, 1.0),
            EntityKind::Powerup(Powerup {
                kind: PowerupKind::Laser,
            }),
        );
        fx.expiries.schedule(100, Expiry::Despawn(id));
        fx.registry.destroy(id);
        let other = fx.registry.spawn(
            Vec2::new(2.0, 2.0),
            EntityKind::Powerup(Powerup {
                kind: PowerupKind::Score,
            }),
        );
        fx.advance(100);
        assert!(fx.registry.contains(other));
        assert_eq!(fx.registry.len(), 1);
    }
}
