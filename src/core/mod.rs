//! Core simulation: constants, configuration, run state, timers, the
//! encounter director and the game controller.

pub mod config;
pub mod constants;
pub mod director;
pub mod game;
pub mod run_state;
pub mod tick;
pub mod timers;

pub use config::{ConfigError, GameConfig};
pub use director::EncounterDirector;
pub use game::{Game, GameError, PlayerInput, RunPhase};
pub use run_state::{RunState, RunSummary};
pub use tick::{AudioCue, AvoidReason, DamageSource, GameEvent, TickResult};
pub use timers::{Expiry, ExpiryQueue, PeriodicTimer};
