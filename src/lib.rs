//! Satoshi's Dungeon - real-time combat and progression core.
//!
//! The crate is the simulation only: entities, the encounter director,
//! combat rules, and the upgrade/perk/achievement economy. Rendering, audio
//! and menus live outside and talk to [`core::Game`] through events,
//! snapshots and a handful of callbacks.

pub mod achievements;
pub mod combat;
pub mod core;
pub mod entities;
pub mod perks;
pub mod progress;
pub mod upgrades;
pub mod utils;

pub use crate::core::{Game, GameConfig, GameEvent, PlayerInput, RunPhase, TickResult};
