//! Upgrade pricing and purchase.

use thiserror::Error;

use super::types::UpgradeId;
use crate::progress::PersistentProgress;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("{} is already at max level", .id.key())]
    AlreadyMaxed { id: UpgradeId },
    #[error("upgrade costs {cost} but only {score} score is available")]
    InsufficientScore { cost: u64, score: u64 },
}

/// Result of a successful purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub id: UpgradeId,
    pub new_level: u32,
    pub cost: u64,
}

/// Price of the next level: base cost times the current level.
pub fn upgrade_cost(id: UpgradeId, current_level: u32) -> u64 {
    id.def().base_cost * current_level as u64
}

/// Next price for an upgrade, or `None` once it is maxed.
pub fn next_cost(id: UpgradeId, progress: &PersistentProgress) -> Option<u64> {
    let level = progress.upgrade_level(id);
    if level >= id.def().max_level {
        return None;
    }
    Some(upgrade_cost(id, level))
}

/// Check if `score` covers the next level of an upgrade.
pub fn can_afford(id: UpgradeId, progress: &PersistentProgress, score: u64) -> bool {
    match next_cost(id, progress) {
        Some(cost) => score >= cost,
        None => false,
    }
}

/// Attempt to buy one level, spending score. Nothing changes on rejection.
/// The caller persists `progress` and recomputes run stats on success.
pub fn try_purchase(
    id: UpgradeId,
    progress: &mut PersistentProgress,
    score: &mut u64,
) -> Result<PurchaseReceipt, PurchaseError> {
    let cost = next_cost(id, progress).ok_or(PurchaseError::AlreadyMaxed { id })?;
    if *score < cost {
        return Err(PurchaseError::InsufficientScore {
            cost,
            score: *score,
        });
    }
    let new_level = progress
        .increment_upgrade(id)
        .ok_or(PurchaseError::AlreadyMaxed { id })?;
    *score -= cost;
    Ok(PurchaseReceipt {
        id,
        new_level,
        cost,
    })
}
