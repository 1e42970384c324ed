//! Live actors: player, enemies, boss, projectiles, powerups.

pub mod registry;
pub mod types;

pub use registry::EntityRegistry;
pub use types::*;
