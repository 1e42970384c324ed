//! Achievement system module.
//!
//! Achievements are account-wide boolean flags stored in
//! [`PersistentProgress`](crate::progress::PersistentProgress). Conditions are
//! data in [`data::ALL_ACHIEVEMENTS`]; [`logic::evaluate_achievements`] walks
//! them after every mutation that can cross a threshold.

pub mod data;
pub mod logic;
pub mod types;

pub use data::{get_achievement_def, ALL_ACHIEVEMENTS};
pub use logic::{evaluate_achievements, newly_met};
pub use types::{AchievementCondition, AchievementDef, AchievementId};
