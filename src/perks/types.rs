//! Perk identifiers and the per-run perk set.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerkId {
    Crit,
    Lifesteal,
    Chain,
    /// Heals over time. Keeps the external id `shield`.
    #[serde(rename = "shield")]
    Regeneration,
    Haste,
    Fortune,
    Vampire,
    Dodge,
}

impl PerkId {
    pub const ALL: [PerkId; 8] = [
        PerkId::Crit,
        PerkId::Lifesteal,
        PerkId::Chain,
        PerkId::Regeneration,
        PerkId::Haste,
        PerkId::Fortune,
        PerkId::Vampire,
        PerkId::Dodge,
    ];

    /// External string id used by the UI boundary.
    pub fn id(&self) -> &'static str {
        match self {
            PerkId::Crit => "crit",
            PerkId::Lifesteal => "lifesteal",
            PerkId::Chain => "chain",
            PerkId::Regeneration => "shield",
            PerkId::Haste => "haste",
            PerkId::Fortune => "fortune",
            PerkId::Vampire => "vampire",
            PerkId::Dodge => "dodge",
        }
    }

    pub fn from_id(id: &str) -> Option<PerkId> {
        PerkId::ALL.into_iter().find(|perk| perk.id() == id)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PerkId::Crit => "Critical Strike",
            PerkId::Lifesteal => "Life Steal",
            PerkId::Chain => "Chain Lightning",
            PerkId::Regeneration => "Regeneration",
            PerkId::Haste => "Haste",
            PerkId::Fortune => "Fortune",
            PerkId::Vampire => "Vampiric",
            PerkId::Dodge => "Phase Shift",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PerkId::Crit => "25% chance for 2x damage",
            PerkId::Lifesteal => "Heal 5 HP per enemy kill",
            PerkId::Chain => "Attacks hit nearby enemies",
            PerkId::Regeneration => "Heal 1 HP every 2 seconds",
            PerkId::Haste => "+50% attack speed",
            PerkId::Fortune => "2x score from all sources",
            PerkId::Vampire => "Life steal on mining too",
            PerkId::Dodge => "15% chance to dodge attacks",
        }
    }

    fn bit(&self) -> u16 {
        1 << (*self as u16)
    }
}

/// Perks held during a run. At most one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PerkSet(u16);

impl PerkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a perk. Returns false if it was already held.
    pub fn insert(&mut self, perk: PerkId) -> bool {
        if self.contains(perk) {
            return false;
        }
        self.0 |= perk.bit();
        true
    }

    pub fn contains(&self, perk: PerkId) -> bool {
        self.0 & perk.bit() != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = PerkId> + '_ {
        PerkId::ALL.into_iter().filter(move |perk| self.contains(*perk))
    }

    /// Perks not yet held, in catalog order.
    pub fn missing(&self) -> Vec<PerkId> {
        PerkId::ALL
            .into_iter()
            .filter(|perk| !self.contains(*perk))
            .collect()
    }
}

impl FromIterator<PerkId> for PerkSet {
    fn from_iter<I: IntoIterator<Item = PerkId>>(iter: I) -> Self {
        let mut set = PerkSet::new();
        for perk in iter {
            set.insert(perk);
        }
        set
    }
}
