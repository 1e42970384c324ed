//! Mutable state of a single run.

use serde::{Deserialize, Serialize};

use crate::core::constants::FORTUNE_MULTIPLIER;
use crate::perks::{PerkId, PerkSet};
use crate::progress::PersistentProgress;
use crate::upgrades::UpgradeId;

/// Active double-mining buff. `restore_to` is the mining power captured when
/// the buff started and is written back verbatim when it ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleMiningBuff {
    pub restore_to: f64,
}

/// Everything one play session tracks. Built from persistent upgrades at run
/// start and thrown away when the next run begins.
#[derive(Debug, Clone, PartialEq)]
pub struct RunState {
    pub health: f64,
    pub max_health: f64,
    pub hash_power: f64,
    pub score: u64,
    pub level: u32,
    pub attack_damage: f64,
    pub attack_cost: f64,
    pub mining_power: f64,
    pub move_speed: f64,
    pub kills: u32,
    pub bosses_killed: u32,
    pub total_mines: u32,
    pub damage_taken: f64,
    pub powerups_collected: u32,
    pub perks: PerkSet,
    /// Outstanding shield powerups; shielded while non-zero.
    pub shield_layers: u32,
    pub double_mining: Option<DoubleMiningBuff>,
    /// Consecutive level-ups completed without taking damage.
    pub damage_free_levels: u32,
    pub took_damage_this_level: bool,
}

impl RunState {
    /// Fresh run with derived stats taken from the upgrade levels.
    pub fn new(progress: &PersistentProgress) -> Self {
        let mut run = Self {
            health: 0.0,
            max_health: 0.0,
            hash_power: 0.0,
            score: 0,
            level: 1,
            attack_damage: 0.0,
            attack_cost: 0.0,
            mining_power: 0.0,
            move_speed: 0.0,
            kills: 0,
            bosses_killed: 0,
            total_mines: 0,
            damage_taken: 0.0,
            powerups_collected: 0,
            perks: PerkSet::new(),
            shield_layers: 0,
            double_mining: None,
            damage_free_levels: 0,
            took_damage_this_level: false,
        };
        run.apply_upgrades(progress);
        run
    }

    /// Recompute every upgrade-derived stat. Current health resets to the new
    /// maximum.
    pub fn apply_upgrades(&mut self, progress: &PersistentProgress) {
        let stat = |id: UpgradeId| id.def().effect(progress.upgrade_level(id));
        self.mining_power = stat(UpgradeId::MiningPower);
        self.max_health = stat(UpgradeId::MaxHealth);
        self.health = self.max_health;
        self.attack_damage = stat(UpgradeId::AttackDamage);
        self.move_speed = stat(UpgradeId::MoveSpeed);
        self.attack_cost = stat(UpgradeId::Efficiency);
    }

    pub fn has_perk(&self, perk: PerkId) -> bool {
        self.perks.contains(perk)
    }

    /// Score multiplier from the fortune perk.
    pub fn fortune_multiplier(&self) -> u64 {
        if self.has_perk(PerkId::Fortune) {
            FORTUNE_MULTIPLIER
        } else {
            1
        }
    }

    /// Heal up to max health. Returns the amount actually restored.
    pub fn heal(&mut self, amount: f64) -> f64 {
        let before = self.health;
        self.health = (self.health + amount).min(self.max_health);
        self.health - before
    }

    /// Apply damage, clamping at zero. Returns true if this killed the player.
    pub fn take_damage(&mut self, amount: f64) -> bool {
        if amount <= 0.0 || self.is_dead() {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        self.damage_taken += amount;
        self.took_damage_this_level = true;
        self.is_dead()
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn is_shielded(&self) -> bool {
        self.shield_layers > 0
    }

    pub fn can_afford_attack(&self) -> bool {
        self.hash_power >= self.attack_cost
    }

    /// Advance to the next level and roll the damage-free streak.
    pub fn level_up(&mut self) -> u32 {
        self.level += 1;
        if self.took_damage_this_level {
            self.damage_free_levels = 0;
        } else {
            self.damage_free_levels += 1;
        }
        self.took_damage_this_level = false;
        self.level
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            0.0
        } else {
            (self.health / self.max_health) as f32
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            score: self.score,
            level: self.level,
            kills: self.kills,
            bosses_killed: self.bosses_killed,
            powerups_collected: self.powerups_collected,
        }
    }
}

/// Final statistics handed to the UI and score submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    pub level: u32,
    pub kills: u32,
    pub bosses_killed: u32,
    pub powerups_collected: u32,
}
