//! The simulation controller.
//!
//! [`Game`] owns the run state, the entity registry, the timers and the
//! persistent progress, and is the only thing the outer layers talk to.
//! Each [`Game::tick`] splits the frame into steps of at most
//! [`TICK_STEP_MS`], cut short at each level boundary, and runs, per step:
//! expiries, director timers, actor behaviour and collisions, queued inputs,
//! then achievement evaluation.

use std::collections::VecDeque;

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::config::GameConfig;
use super::constants::TICK_STEP_MS;
use super::director::{spawn_enemy, EncounterDirector};
use super::run_state::{RunState, RunSummary};
use super::tick::{GameEvent, TickResult};
use super::timers::ExpiryQueue;
use crate::achievements::evaluate_achievements;
use crate::combat::{apply_expiry, attack_at, mine, update_actors, Encounter};
use crate::entities::{Bounds, EntityClass, EntityKind, EntityRegistry, EntitySnapshot, Vec2};
use crate::perks::PerkId;
use crate::progress::{PersistentProgress, ProgressStore};
use crate::upgrades::{try_purchase, PurchaseError, PurchaseReceipt, UpgradeId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("no run is in progress")]
    RunNotActive,
    #[error("no perk offer is pending")]
    NoPerkOffer,
    #[error("perk {} was not offered", .0.id())]
    PerkNotOffered(PerkId),
}

/// Where the controller is in the run lifecycle. Every phase except
/// `Playing` freezes timers and rejects inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum RunPhase {
    NotStarted,
    Playing,
    Paused,
    ChoosingPerk(Vec<PerkId>),
    Ended(RunSummary),
}

/// Player actions applied at the end of the next step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerInput {
    Mine,
    Attack { point: Vec2 },
}

pub struct Game {
    config: GameConfig,
    store: Box<dyn ProgressStore>,
    progress: PersistentProgress,
    run: RunState,
    registry: EntityRegistry,
    expiries: ExpiryQueue,
    director: EncounterDirector,
    phase: RunPhase,
    inputs: VecDeque<PlayerInput>,
    movement: Vec2,
    save_pending: bool,
}

impl Game {
    /// Build a controller and load persistent progress. A config that fails
    /// validation is replaced by the defaults. A failed load is logged and
    /// play continues from fresh progress.
    pub fn new(config: GameConfig, store: Box<dyn ProgressStore>) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!(error = %e, "invalid game config, using defaults");
                GameConfig::default()
            }
        };
        let progress = match store.load() {
            Ok(Some(progress)) => progress,
            Ok(None) => PersistentProgress::default(),
            Err(e) => {
                warn!(error = %e, "failed to load progress, starting fresh");
                PersistentProgress::default()
            }
        };
        let run = RunState::new(&progress);
        let director = EncounterDirector::new(&config);
        Self {
            config,
            store,
            progress,
            run,
            registry: EntityRegistry::new(),
            expiries: ExpiryQueue::new(),
            director,
            phase: RunPhase::NotStarted,
            inputs: VecDeque::new(),
            movement: Vec2::ZERO,
            save_pending: false,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn run_mut(&mut self) -> &mut RunState {
        &mut self.run
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    pub fn expiries(&self) -> &ExpiryQueue {
        &self.expiries
    }

    pub fn director(&self) -> &EncounterDirector {
        &self.director
    }

    pub fn progress(&self) -> &PersistentProgress {
        &self.progress
    }

    pub fn phase(&self) -> &RunPhase {
        &self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == RunPhase::Playing
    }

    /// True while a failed save is waiting to be retried.
    pub fn save_pending(&self) -> bool {
        self.save_pending
    }

    pub fn arena_bounds(&self) -> Bounds {
        self.config.arena_bounds()
    }

    /// Render snapshot of every live entity. The player's health fraction
    /// comes from the run state.
    pub fn snapshots(&self) -> Vec<EntitySnapshot> {
        let mut snapshots = self.registry.snapshots();
        for snapshot in &mut snapshots {
            if snapshot.class == EntityClass::Player {
                snapshot.health_fraction = Some(self.run.health_fraction());
            }
        }
        snapshots
    }

    /// Begin a fresh run, discarding any previous one. Only persistent
    /// progress carries over.
    pub fn start_run<R: Rng>(&mut self, rng: &mut R) -> Vec<GameEvent> {
        self.run = RunState::new(&self.progress);
        self.registry.clear();
        self.expiries.clear();
        self.director.reset();
        self.inputs.clear();
        self.movement = Vec2::ZERO;

        let mut events = vec![GameEvent::RunStarted];
        let center = self.config.arena_bounds().center();
        self.registry.spawn(center, EntityKind::Player);
        let mut enc = Encounter {
            config: &self.config,
            run: &mut self.run,
            registry: &mut self.registry,
            expiries: &mut self.expiries,
            events: &mut events,
        };
        for _ in 0..self.config.initial_enemies {
            spawn_enemy(&mut enc, rng);
        }

        self.phase = RunPhase::Playing;
        info!(
            health = self.run.health,
            attack_damage = self.run.attack_damage,
            mining_power = self.run.mining_power,
            "run started"
        );
        events
    }

    /// Pause or resume. Returns whether the run is now paused. Pausing is
    /// ignored while a perk offer is open.
    pub fn toggle_pause(&mut self) -> Result<bool, GameError> {
        match self.phase {
            RunPhase::Playing => {
                self.phase = RunPhase::Paused;
                self.inputs.clear();
                debug!("paused");
                Ok(true)
            }
            RunPhase::Paused => {
                self.phase = RunPhase::Playing;
                debug!("resumed");
                Ok(false)
            }
            RunPhase::ChoosingPerk(_) => Ok(false),
            RunPhase::NotStarted | RunPhase::Ended(_) => Err(GameError::RunNotActive),
        }
    }

    /// Take one of the offered perks and resume play.
    pub fn select_perk(&mut self, perk: PerkId) -> Result<Vec<GameEvent>, GameError> {
        let RunPhase::ChoosingPerk(choices) = &self.phase else {
            return Err(GameError::NoPerkOffer);
        };
        if !choices.contains(&perk) {
            return Err(GameError::PerkNotOffered(perk));
        }
        self.run.perks.insert(perk);
        self.phase = RunPhase::Playing;
        info!(perk = perk.id(), "perk selected");
        Ok(vec![GameEvent::PerkSelected { perk }])
    }

    /// Buy one level of an upgrade with run score. On success the progress
    /// is saved and every derived stat is recomputed, which also refills
    /// health. Rejections change nothing.
    pub fn purchase_upgrade(&mut self, id: UpgradeId) -> Result<PurchaseReceipt, PurchaseError> {
        let receipt = match try_purchase(id, &mut self.progress, &mut self.run.score) {
            Ok(receipt) => receipt,
            Err(e) => {
                debug!(upgrade = id.key(), error = %e, "upgrade purchase rejected");
                return Err(e);
            }
        };
        self.run.apply_upgrades(&self.progress);
        info!(
            upgrade = id.key(),
            level = receipt.new_level,
            cost = receipt.cost,
            "upgrade purchased"
        );
        self.save_progress();
        Ok(receipt)
    }

    /// Queue an input for the next step. Returns false and drops it while
    /// the game is frozen.
    pub fn push_input(&mut self, input: PlayerInput) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.inputs.push_back(input);
        true
    }

    /// Movement direction held by the player; applied every step until
    /// changed.
    pub fn set_movement(&mut self, direction: Vec2) {
        self.movement = direction;
    }

    /// Advance the simulation by `dt_ms`. Frozen phases consume no time.
    ///
    /// Steps end on level boundaries, so a perk offer freezes every timer at
    /// the exact moment of the level-up and the rest of the frame is dropped.
    pub fn tick<R: Rng>(&mut self, dt_ms: u64, rng: &mut R) -> TickResult {
        let mut events = Vec::new();
        let mut remaining = dt_ms;
        while self.is_playing() {
            let step = remaining
                .min(TICK_STEP_MS)
                .min(self.director.until_level_up_ms());
            remaining -= step;
            self.step(step, rng, &mut events);
            if remaining == 0 {
                break;
            }
        }
        if self.save_pending {
            self.save_progress();
        }
        TickResult {
            events,
            snapshots: self.snapshots(),
        }
    }

    fn step<R: Rng>(&mut self, dt_ms: u64, rng: &mut R, events: &mut Vec<GameEvent>) {
        let mut enc = Encounter {
            config: &self.config,
            run: &mut self.run,
            registry: &mut self.registry,
            expiries: &mut self.expiries,
            events: &mut *events,
        };

        for expiry in enc.expiries.advance(dt_ms) {
            apply_expiry(&mut enc, expiry);
        }

        let offer = self.director.advance(&mut enc, dt_ms, rng);
        let mut unlocked = evaluate_achievements(enc.run, &mut self.progress);

        if let Some(choices) = offer {
            info!(level = enc.run.level, choices = ?choices, "perk offered");
            enc.events.push(GameEvent::PerkOffered {
                choices: choices.clone(),
            });
            self.phase = RunPhase::ChoosingPerk(choices);
            self.inputs.clear();
        } else {
            update_actors(&mut enc, self.movement, dt_ms, rng);
            while let Some(input) = self.inputs.pop_front() {
                if enc.run.is_dead() {
                    break;
                }
                match input {
                    PlayerInput::Mine => {
                        mine(&mut enc);
                    }
                    PlayerInput::Attack { point } => {
                        attack_at(&mut enc, point, rng);
                    }
                }
            }
            unlocked.extend(evaluate_achievements(enc.run, &mut self.progress));
        }

        for id in &unlocked {
            enc.events.push(GameEvent::AchievementUnlocked { id: *id });
        }
        let died = enc.run.is_dead();
        if died {
            self.end_run(events);
        }
        if !unlocked.is_empty() {
            self.save_progress();
        }
    }

    fn end_run(&mut self, events: &mut Vec<GameEvent>) {
        let summary = self.run.summary();
        self.registry.clear();
        self.expiries.clear();
        self.director.reset();
        self.inputs.clear();
        self.movement = Vec2::ZERO;
        self.phase = RunPhase::Ended(summary);
        info!(
            score = summary.score,
            level = summary.level,
            kills = summary.kills,
            bosses_killed = summary.bosses_killed,
            "run ended"
        );
        events.push(GameEvent::RunEnded(summary));
    }

    /// Write progress through the store. Failure is logged and retried on
    /// the next tick; the in-memory progress stays authoritative.
    fn save_progress(&mut self) {
        match self.store.save(&self.progress) {
            Ok(()) => {
                if self.save_pending {
                    info!("progress saved after earlier failure");
                }
                self.save_pending = false;
            }
            Err(e) => {
                warn!(error = %e, "failed to save progress, will retry");
                self.save_pending = true;
            }
        }
    }
}
