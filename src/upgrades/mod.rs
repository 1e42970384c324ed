//! Persistent, purchasable stat upgrades carried across runs.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
