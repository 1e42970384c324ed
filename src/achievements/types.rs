//! Achievement identifiers and definitions.

use serde::{Deserialize, Serialize};

/// Unique identifier for each achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AchievementId {
    FirstKill,
    TenKills,
    FiftyKills,
    HundredKills,
    FirstBoss,
    Level10,
    Level25,
    Miner100,
    Survivor,
    PerfectDodge,
}

impl AchievementId {
    pub const ALL: [AchievementId; 10] = [
        AchievementId::FirstKill,
        AchievementId::TenKills,
        AchievementId::FiftyKills,
        AchievementId::HundredKills,
        AchievementId::FirstBoss,
        AchievementId::Level10,
        AchievementId::Level25,
        AchievementId::Miner100,
        AchievementId::Survivor,
        AchievementId::PerfectDodge,
    ];

    /// Key used in the persisted record.
    pub fn key(&self) -> &'static str {
        match self {
            AchievementId::FirstKill => "firstKill",
            AchievementId::TenKills => "tenKills",
            AchievementId::FiftyKills => "fiftyKills",
            AchievementId::HundredKills => "hundredKills",
            AchievementId::FirstBoss => "firstBoss",
            AchievementId::Level10 => "level10",
            AchievementId::Level25 => "level25",
            AchievementId::Miner100 => "miner100",
            AchievementId::Survivor => "survivor",
            AchievementId::PerfectDodge => "perfectDodge",
        }
    }

    pub fn from_key(key: &str) -> Option<AchievementId> {
        AchievementId::ALL.into_iter().find(|id| id.key() == key)
    }
}

/// What a run has to reach for an achievement to unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementCondition {
    /// Kills in one run.
    Kills(u32),
    /// Bosses killed in one run.
    BossKills(u32),
    /// Level reached.
    Level(u32),
    /// Mining actions in one run.
    Mines(u32),
    /// Level reached while every upgrade is still at its starting level.
    LevelWithoutUpgrades(u32),
    /// Consecutive levels completed without taking damage.
    DamageFreeLevels(u32),
}

/// Static definition of an achievement.
#[derive(Debug, Clone)]
pub struct AchievementDef {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub condition: AchievementCondition,
}
