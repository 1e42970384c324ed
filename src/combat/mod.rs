//! Combat resolution: mining, attacks, kills, damage taken, pickups and the
//! per-tick actor behaviour that drives them.

pub mod ai;
pub mod damage;
pub mod logic;
pub mod types;

pub use ai::update_actors;
pub use damage::{apply_expiry, apply_powerup, take_hit};
pub use logic::*;
pub use types::*;
