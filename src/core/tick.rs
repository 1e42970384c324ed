//! Events produced by the simulation.
//!
//! The core never talks to rendering, audio or UI directly. Every tick and
//! every UI callback returns the events it produced, in the order they
//! happened, and the presentation layer maps them to sounds, effects and
//! modals.

use crate::achievements::AchievementId;
use crate::core::run_state::RunSummary;
use crate::entities::{BossPhase, EnemyKind, EntityId, EntitySnapshot, PowerupKind};
use crate::perks::PerkId;

/// Fire-and-forget sound cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    Mine,
    Attack,
    Hit,
    Kill,
    Powerup,
    LevelUp,
}

/// What hurt the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    Contact,
    BossContact,
    Projectile,
}

/// Why incoming damage was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvoidReason {
    Shield,
    Dodge,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    // ── Boundary cues ───────────────────────────────────────────
    Cue(AudioCue),

    // ── Run lifecycle ───────────────────────────────────────────
    RunStarted,
    LeveledUp {
        level: u32,
    },
    /// The run is over; the summary is what score submission consumes.
    RunEnded(RunSummary),

    // ── Director ────────────────────────────────────────────────
    EnemySpawned {
        id: EntityId,
        kind: EnemyKind,
    },
    BossSpawned {
        id: EntityId,
        level: u32,
    },
    BossPhaseChanged {
        phase: BossPhase,
        reinforcements: u32,
    },
    ProjectileFired {
        id: EntityId,
    },

    // ── Combat ──────────────────────────────────────────────────
    Mined {
        amount: f64,
        score: u64,
    },
    EnemyHit {
        id: EntityId,
        damage: f64,
        crit: bool,
        /// Splash from the chain perk rather than a direct hit.
        chained: bool,
    },
    BossHit {
        damage: f64,
        crit: bool,
    },
    EnemyKilled {
        id: EntityId,
        kind: EnemyKind,
        score: u64,
    },
    BossKilled {
        score: u64,
    },
    PlayerDamaged {
        amount: f64,
        source: DamageSource,
    },
    DamageAvoided {
        source: DamageSource,
        reason: AvoidReason,
    },

    // ── Powerups ────────────────────────────────────────────────
    PowerupDropped {
        id: EntityId,
        kind: PowerupKind,
    },
    PowerupCollected {
        kind: PowerupKind,
    },

    // ── Notifications ───────────────────────────────────────────
    PerkOffered {
        choices: Vec<PerkId>,
    },
    PerkSelected {
        perk: PerkId,
    },
    AchievementUnlocked {
        id: AchievementId,
    },
}

/// Outcome of one call to [`crate::core::game::Game::tick`].
#[derive(Debug, Clone, Default)]
pub struct TickResult {
    /// Events produced during this tick, in chronological order.
    pub events: Vec<GameEvent>,
    /// Render boundary: every live entity after the tick.
    pub snapshots: Vec<EntitySnapshot>,
}

impl TickResult {
    pub fn unlocked_achievements(&self) -> Vec<AchievementId> {
        self.events
            .iter()
            .filter_map(|event| match event {
                GameEvent::AchievementUnlocked { id } => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn cues(&self) -> Vec<AudioCue> {
        self.events
            .iter()
            .filter_map(|event| match event {
                GameEvent::Cue(cue) => Some(*cue),
                _ => None,
            })
            .collect()
    }

    /// Summary carried by a `RunEnded` event, if the run ended this tick.
    pub fn run_ended(&self) -> Option<RunSummary> {
        self.events.iter().find_map(|event| match event {
            GameEvent::RunEnded(summary) => Some(*summary),
            _ => None,
        })
    }
}
