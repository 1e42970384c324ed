//! Encounter director: spawn cadence, level cadence, boss triggers and
//! passive regeneration.
//!
//! Each cadence is a [`PeriodicTimer`]. The director only advances while the
//! game controller calls [`EncounterDirector::advance`], so pausing is just
//! not calling it.

use rand::Rng;

use super::config::GameConfig;
use super::constants::*;
use super::tick::{AudioCue, GameEvent};
use super::timers::PeriodicTimer;
use crate::combat::Encounter;
use crate::entities::{Boss, Bounds, Enemy, EnemyKind, EntityId, EntityKind, Vec2};
use crate::perks::{roll_perk_offer, PerkId};

/// Number of enemy kinds, counted from the easiest, that may spawn at `level`.
pub fn eligible_enemy_count(level: u32) -> usize {
    let count = ENEMY_BASE_TYPES + level / LEVELS_PER_ENEMY_TYPE;
    (count as usize).min(EnemyKind::ALL.len())
}

/// Uniform pick among the kinds eligible at `level`.
pub fn roll_enemy_kind<R: Rng>(level: u32, rng: &mut R) -> EnemyKind {
    EnemyKind::ALL[rng.gen_range(0..eligible_enemy_count(level))]
}

fn along_edge<R: Rng>(length: f32, rng: &mut R) -> f32 {
    if length > 2.0 * SPAWN_EDGE_MARGIN {
        rng.gen_range(SPAWN_EDGE_MARGIN..=length - SPAWN_EDGE_MARGIN)
    } else {
        length / 2.0
    }
}

/// Random point on one of the four arena edges, inset along the edge.
pub fn edge_spawn_point<R: Rng>(bounds: Bounds, rng: &mut R) -> Vec2 {
    match rng.gen_range(0..4) {
        0 => Vec2::new(along_edge(bounds.width, rng), 0.0),
        1 => Vec2::new(bounds.width, along_edge(bounds.height, rng)),
        2 => Vec2::new(along_edge(bounds.width, rng), bounds.height),
        _ => Vec2::new(0.0, along_edge(bounds.height, rng)),
    }
}

/// Spawn one enemy for the current level on a random edge.
pub fn spawn_enemy<R: Rng>(enc: &mut Encounter, rng: &mut R) -> EntityId {
    let kind = roll_enemy_kind(enc.run.level, rng);
    let position = edge_spawn_point(enc.config.arena_bounds(), rng);
    let id = enc.registry.spawn(
        position,
        EntityKind::Enemy(Enemy::for_level(kind, enc.run.level)),
    );
    enc.events.push(GameEvent::EnemySpawned { id, kind });
    id
}

/// Spawn the boss at the top centre. No-op while a boss is alive.
pub fn spawn_boss(enc: &mut Encounter) -> Option<EntityId> {
    if enc.registry.boss().is_some() {
        tracing::debug!(level = enc.run.level, "boss already active, skipping spawn");
        return None;
    }
    let level = enc.run.level;
    let position = Vec2::new(enc.config.arena_width / 2.0, BOSS_SPAWN_Y);
    let id = enc
        .registry
        .spawn(position, EntityKind::Boss(Boss::for_level(level)));
    tracing::info!(level, "boss spawned");
    enc.events.push(GameEvent::BossSpawned { id, level });
    Some(id)
}

/// The three periodic triggers of a run.
#[derive(Debug, Clone)]
pub struct EncounterDirector {
    spawn: PeriodicTimer,
    level: PeriodicTimer,
    regen: PeriodicTimer,
}

impl EncounterDirector {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            spawn: PeriodicTimer::new(config.enemy_spawn_interval_ms),
            level: PeriodicTimer::new(config.level_duration_ms),
            regen: PeriodicTimer::new(config.regen_interval_ms),
        }
    }

    pub fn reset(&mut self) {
        self.spawn.reset();
        self.level.reset();
        self.regen.reset();
    }

    pub fn spawn_timer(&self) -> &PeriodicTimer {
        &self.spawn
    }

    pub fn level_timer(&self) -> &PeriodicTimer {
        &self.level
    }

    pub fn regen_timer(&self) -> &PeriodicTimer {
        &self.regen
    }

    /// Advance every trigger by `dt_ms` and apply what fired, in the fixed
    /// order spawn, level, regeneration.
    ///
    /// Time is fed in chunks that end on level boundaries. When a level-up
    /// opens a perk offer the remaining time is not fed to any trigger and
    /// the choices are returned; the caller must freeze the run until one is
    /// picked.
    pub fn advance<R: Rng>(
        &mut self,
        enc: &mut Encounter,
        dt_ms: u64,
        rng: &mut R,
    ) -> Option<Vec<PerkId>> {
        let mut left = dt_ms;
        while left > 0 {
            let chunk = left.min(self.level.remaining_ms());
            left -= chunk;

            for _ in 0..self.spawn.advance(chunk) {
                spawn_enemy(enc, rng);
            }
            let offer = if self.level.advance(chunk) > 0 {
                level_up(enc, rng)
            } else {
                None
            };
            for _ in 0..self.regen.advance(chunk) {
                regenerate(enc);
            }
            if offer.is_some() {
                return offer;
            }
        }
        None
    }

    /// Milliseconds of play until the next level-up.
    pub fn until_level_up_ms(&self) -> u64 {
        self.level.remaining_ms()
    }
}

/// Apply one level-up. The perk check and the boss check both use the new
/// level, so a level satisfying both does both.
pub fn level_up<R: Rng>(enc: &mut Encounter, rng: &mut R) -> Option<Vec<PerkId>> {
    let level = enc.run.level_up();
    tracing::info!(level, score = enc.run.score, "level up");
    enc.events.push(GameEvent::Cue(AudioCue::LevelUp));
    enc.events.push(GameEvent::LeveledUp { level });

    let mut offer = None;
    if level % enc.config.perk_interval == 0 {
        let choices = roll_perk_offer(&enc.run.perks, rng);
        if choices.is_empty() {
            tracing::debug!(level, "every perk already held, skipping offer");
        } else {
            offer = Some(choices);
        }
    }
    if level % enc.config.boss_interval == 0 {
        spawn_boss(enc);
    }
    offer
}

/// Regeneration perk tick.
pub fn regenerate(enc: &mut Encounter) {
    if enc.run.has_perk(PerkId::Regeneration) && enc.run.health < enc.run.max_health {
        enc.run.heal(REGEN_AMOUNT);
    }
}
