//! Run-scoped perks offered every few levels.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
