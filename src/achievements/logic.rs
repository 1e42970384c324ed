//! Threshold checks against run counters.

use super::data::ALL_ACHIEVEMENTS;
use super::types::{AchievementCondition, AchievementId};
use crate::core::run_state::RunState;
use crate::progress::PersistentProgress;

impl AchievementCondition {
    pub fn is_met(&self, run: &RunState, progress: &PersistentProgress) -> bool {
        match *self {
            AchievementCondition::Kills(n) => run.kills >= n,
            AchievementCondition::BossKills(n) => run.bosses_killed >= n,
            AchievementCondition::Level(n) => run.level >= n,
            AchievementCondition::Mines(n) => run.total_mines >= n,
            AchievementCondition::LevelWithoutUpgrades(n) => {
                run.level >= n && progress.has_no_upgrades()
            }
            AchievementCondition::DamageFreeLevels(n) => run.damage_free_levels >= n,
        }
    }
}

/// Ids whose condition is met but which are not unlocked yet, in display order.
pub fn newly_met(run: &RunState, progress: &PersistentProgress) -> Vec<AchievementId> {
    ALL_ACHIEVEMENTS
        .iter()
        .filter(|def| !progress.is_unlocked(def.id))
        .filter(|def| def.condition.is_met(run, progress))
        .map(|def| def.id)
        .collect()
}

/// Unlock every newly met achievement and return the ids that changed.
/// The caller persists `progress` when the result is non-empty.
pub fn evaluate_achievements(
    run: &RunState,
    progress: &mut PersistentProgress,
) -> Vec<AchievementId> {
    let unlocked: Vec<AchievementId> = newly_met(run, progress)
        .into_iter()
        .filter(|id| progress.unlock(*id))
        .collect();
    for id in &unlocked {
        tracing::info!(achievement = id.key(), "achievement unlocked");
    }
    unlocked
}
