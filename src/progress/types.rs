//! Durable cross-run progress: upgrade levels and achievement flags.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::achievements::AchievementId;
use crate::upgrades::{UpgradeId, STARTING_LEVEL};

/// Upgrade levels and achievement flags.
///
/// Serializes to `{ "upgrades": { id: level }, "achievements": { id: bool } }`.
/// Achievement flags only ever go from `false` to `true`; there is no API to
/// clear one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersistentProgress {
    upgrades: BTreeMap<UpgradeId, u32>,
    achievements: BTreeMap<AchievementId, bool>,
}

impl Default for PersistentProgress {
    fn default() -> Self {
        Self {
            upgrades: UpgradeId::ALL
                .into_iter()
                .map(|id| (id, STARTING_LEVEL))
                .collect(),
            achievements: AchievementId::ALL
                .into_iter()
                .map(|id| (id, false))
                .collect(),
        }
    }
}

impl PersistentProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upgrade_level(&self, id: UpgradeId) -> u32 {
        self.upgrades.get(&id).copied().unwrap_or(STARTING_LEVEL)
    }

    /// Raise an upgrade by one level. Returns the new level, or `None` if the
    /// upgrade is already at its cap.
    pub(crate) fn increment_upgrade(&mut self, id: UpgradeId) -> Option<u32> {
        let level = self.upgrade_level(id);
        if level >= id.def().max_level {
            return None;
        }
        self.upgrades.insert(id, level + 1);
        Some(level + 1)
    }

    /// True when every upgrade is still at its starting level.
    pub fn has_no_upgrades(&self) -> bool {
        UpgradeId::ALL
            .into_iter()
            .all(|id| self.upgrade_level(id) <= STARTING_LEVEL)
    }

    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.achievements.get(&id).copied().unwrap_or(false)
    }

    /// Set an achievement flag. Returns true if it was newly unlocked.
    pub fn unlock(&mut self, id: AchievementId) -> bool {
        if self.is_unlocked(id) {
            return false;
        }
        self.achievements.insert(id, true);
        true
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.values().filter(|flag| **flag).count()
    }

    pub fn upgrades(&self) -> impl Iterator<Item = (UpgradeId, u32)> + '_ {
        self.upgrades.iter().map(|(id, level)| (*id, *level))
    }

    pub fn achievements(&self) -> impl Iterator<Item = (AchievementId, bool)> + '_ {
        self.achievements.iter().map(|(id, flag)| (*id, *flag))
    }
}

/// Loosely-typed shape of the persisted record. Unknown ids are dropped and
/// missing ids fall back to defaults when converting.
#[derive(Debug, Default, Deserialize)]
struct ProgressRecord {
    #[serde(default)]
    upgrades: BTreeMap<String, u32>,
    #[serde(default)]
    achievements: BTreeMap<String, bool>,
}

impl From<ProgressRecord> for PersistentProgress {
    fn from(record: ProgressRecord) -> Self {
        let mut progress = PersistentProgress::default();
        for (key, level) in record.upgrades {
            if let Some(id) = UpgradeId::from_key(&key) {
                let level = level.clamp(STARTING_LEVEL, id.def().max_level);
                progress.upgrades.insert(id, level);
            }
        }
        for (key, flag) in record.achievements {
            if let Some(id) = AchievementId::from_key(&key) {
                if flag {
                    progress.achievements.insert(id, true);
                }
            }
        }
        progress
    }
}

impl<'de> Deserialize<'de> for PersistentProgress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        ProgressRecord::deserialize(deserializer).map(PersistentProgress::from)
    }
}
