//! Static achievement definitions.

use super::types::{AchievementCondition, AchievementDef, AchievementId};

/// All achievement definitions in display order.
pub const ALL_ACHIEVEMENTS: &[AchievementDef] = &[
    // ═══════════════════════════════════════════════════════════════
    // COMBAT
    // ═══════════════════════════════════════════════════════════════
    AchievementDef {
        id: AchievementId::FirstKill,
        name: "First Blood",
        description: "Defeat your first enemy",
        condition: AchievementCondition::Kills(1),
    },
    AchievementDef {
        id: AchievementId::TenKills,
        name: "Warrior",
        description: "Defeat 10 enemies in one run",
        condition: AchievementCondition::Kills(10),
    },
    AchievementDef {
        id: AchievementId::FiftyKills,
        name: "Slayer",
        description: "Defeat 50 enemies in one run",
        condition: AchievementCondition::Kills(50),
    },
    AchievementDef {
        id: AchievementId::HundredKills,
        name: "Legend",
        description: "Defeat 100 enemies in one run",
        condition: AchievementCondition::Kills(100),
    },
    AchievementDef {
        id: AchievementId::FirstBoss,
        name: "Boss Hunter",
        description: "Defeat your first boss",
        condition: AchievementCondition::BossKills(1),
    },
    // ═══════════════════════════════════════════════════════════════
    // PROGRESSION
    // ═══════════════════════════════════════════════════════════════
    AchievementDef {
        id: AchievementId::Level10,
        name: "Survivor",
        description: "Reach level 10",
        condition: AchievementCondition::Level(10),
    },
    AchievementDef {
        id: AchievementId::Level25,
        name: "Elite",
        description: "Reach level 25",
        condition: AchievementCondition::Level(25),
    },
    AchievementDef {
        id: AchievementId::Miner100,
        name: "Master Miner",
        description: "Mine 100 times in one run",
        condition: AchievementCondition::Mines(100),
    },
    // ═══════════════════════════════════════════════════════════════
    // CHALLENGE
    // ═══════════════════════════════════════════════════════════════
    AchievementDef {
        id: AchievementId::Survivor,
        name: "Undying",
        description: "Reach level 15 without upgrades",
        condition: AchievementCondition::LevelWithoutUpgrades(15),
    },
    AchievementDef {
        id: AchievementId::PerfectDodge,
        name: "Untouchable",
        description: "Complete 5 levels without taking damage",
        condition: AchievementCondition::DamageFreeLevels(5),
    },
];

/// Look up a definition by id.
pub fn get_achievement_def(id: AchievementId) -> Option<&'static AchievementDef> {
    ALL_ACHIEVEMENTS.iter().find(|def| def.id == id)
}
