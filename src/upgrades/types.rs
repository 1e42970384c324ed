//! Upgrade catalog.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpgradeId {
    MiningPower,
    MaxHealth,
    AttackDamage,
    MoveSpeed,
    Efficiency,
}

impl UpgradeId {
    pub const ALL: [UpgradeId; 5] = [
        UpgradeId::MiningPower,
        UpgradeId::MaxHealth,
        UpgradeId::AttackDamage,
        UpgradeId::MoveSpeed,
        UpgradeId::Efficiency,
    ];

    /// Key used in the persisted record.
    pub fn key(&self) -> &'static str {
        match self {
            UpgradeId::MiningPower => "miningPower",
            UpgradeId::MaxHealth => "maxHealth",
            UpgradeId::AttackDamage => "attackDamage",
            UpgradeId::MoveSpeed => "moveSpeed",
            UpgradeId::Efficiency => "efficiency",
        }
    }

    pub fn from_key(key: &str) -> Option<UpgradeId> {
        UpgradeId::ALL.into_iter().find(|id| id.key() == key)
    }

    pub fn def(&self) -> &'static UpgradeDef {
        match self {
            UpgradeId::MiningPower => &UPGRADES[0],
            UpgradeId::MaxHealth => &UPGRADES[1],
            UpgradeId::AttackDamage => &UPGRADES[2],
            UpgradeId::MoveSpeed => &UPGRADES[3],
            UpgradeId::Efficiency => &UPGRADES[4],
        }
    }
}

/// Static definition of an upgrade.
#[derive(Debug, Clone, Copy)]
pub struct UpgradeDef {
    pub id: UpgradeId,
    pub name: &'static str,
    pub description: &'static str,
    pub base_cost: u64,
    pub max_level: u32,
    effect: fn(u32) -> f64,
}

impl UpgradeDef {
    /// Stat value this upgrade yields at `level`.
    pub fn effect(&self, level: u32) -> f64 {
        (self.effect)(level)
    }
}

/// Level every upgrade starts at.
pub const STARTING_LEVEL: u32 = 1;

pub const UPGRADES: [UpgradeDef; 5] = [
    UpgradeDef {
        id: UpgradeId::MiningPower,
        name: "Mining Power",
        description: "Mine more HashPower per click",
        base_cost: 500,
        max_level: 5,
        effect: |level| 10.0 + level as f64 * 5.0,
    },
    UpgradeDef {
        id: UpgradeId::MaxHealth,
        name: "Max Health",
        description: "Increase maximum health",
        base_cost: 750,
        max_level: 5,
        effect: |level| 100.0 + level as f64 * 25.0,
    },
    UpgradeDef {
        id: UpgradeId::AttackDamage,
        name: "Attack Damage",
        description: "Deal more damage to enemies",
        base_cost: 600,
        max_level: 5,
        effect: |level| 30.0 + level as f64 * 15.0,
    },
    UpgradeDef {
        id: UpgradeId::MoveSpeed,
        name: "Movement Speed",
        description: "Move faster to dodge enemies",
        base_cost: 400,
        max_level: 5,
        effect: |level| 250.0 + level as f64 * 25.0,
    },
    UpgradeDef {
        id: UpgradeId::Efficiency,
        name: "Efficiency",
        description: "Reduce attack HashPower cost",
        base_cost: 800,
        max_level: 5,
        effect: |level| (20.0 - level as f64 * 3.0).max(5.0),
    },
];
