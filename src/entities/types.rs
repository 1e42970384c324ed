//! Entity data: geometry, per-kind payloads, and render snapshots.

use serde::{Deserialize, Serialize};

use crate::core::constants::*;

/// Stable handle to a live entity. Ids are never reused within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if len <= f32::EPSILON {
            Vec2::ZERO
        } else {
            Vec2::new(self.x / len, self.y / len)
        }
    }

    pub fn scale(self, factor: f32) -> Vec2 {
        Vec2::new(self.x * factor, self.y * factor)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned arena rectangle anchored at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn clamp(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(0.0, self.width),
            point.y.clamp(0.0, self.height),
        )
    }

    pub fn contains(&self, point: Vec2) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }
}

/// Enemy behaviours in ascending difficulty. The level gates how far into
/// this list spawns may reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Chaser,
    Ghost,
    Slime,
    Fast,
    Tank,
    Shooter,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 6] = [
        EnemyKind::Chaser,
        EnemyKind::Ghost,
        EnemyKind::Slime,
        EnemyKind::Fast,
        EnemyKind::Tank,
        EnemyKind::Shooter,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EnemyKind::Chaser => "Chaser",
            EnemyKind::Ghost => "Ghost",
            EnemyKind::Slime => "Slime",
            EnemyKind::Fast => "Fast",
            EnemyKind::Tank => "Tank",
            EnemyKind::Shooter => "Shooter",
        }
    }

    pub fn speed_multiplier(&self) -> f32 {
        match self {
            EnemyKind::Chaser => 1.0,
            EnemyKind::Ghost => 1.4,
            EnemyKind::Slime => 0.6,
            EnemyKind::Fast => 2.0,
            EnemyKind::Tank => 0.5,
            EnemyKind::Shooter => 0.8,
        }
    }

    pub fn health_multiplier(&self) -> f64 {
        match self {
            EnemyKind::Chaser => 1.0,
            EnemyKind::Ghost => 0.75,
            EnemyKind::Slime => 1.5,
            EnemyKind::Fast => 0.5,
            EnemyKind::Tank => 2.5,
            EnemyKind::Shooter => 0.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    Health,
    Shield,
    Double,
    Score,
    Laser,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 5] = [
        PowerupKind::Health,
        PowerupKind::Shield,
        PowerupKind::Double,
        PowerupKind::Score,
        PowerupKind::Laser,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PowerupKind::Health => "Health",
            PowerupKind::Shield => "Shield",
            PowerupKind::Double => "2x Mining",
            PowerupKind::Score => "Score",
            PowerupKind::Laser => "Laser",
        }
    }
}

/// Regular enemy. Stats are fixed at spawn and never recomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub health: f64,
    pub max_health: f64,
    pub contact_damage: f64,
    pub speed: f32,
}

impl Enemy {
    /// Stats for an enemy of `kind` spawned at `level`.
    pub fn for_level(kind: EnemyKind, level: u32) -> Self {
        let base_speed = ENEMY_BASE_SPEED + ENEMY_SPEED_PER_LEVEL * level as f32;
        let base_health = ENEMY_BASE_HEALTH + ENEMY_HEALTH_PER_LEVEL * level as f64;
        let max_health = base_health * kind.health_multiplier();
        Self {
            kind,
            health: max_health,
            max_health,
            contact_damage: ENEMY_BASE_DAMAGE + level as f64,
            speed: base_speed * kind.speed_multiplier(),
        }
    }
}

/// Boss escalation stage. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BossPhase {
    One,
    Two,
    Three,
}

impl BossPhase {
    pub fn number(&self) -> u8 {
        match self {
            BossPhase::One => 1,
            BossPhase::Two => 2,
            BossPhase::Three => 3,
        }
    }

    /// Phase implied by the remaining health fraction.
    pub fn for_health_fraction(fraction: f64) -> BossPhase {
        if fraction < BOSS_PHASE_THREE_THRESHOLD {
            BossPhase::Three
        } else if fraction < BOSS_PHASE_TWO_THRESHOLD {
            BossPhase::Two
        } else {
            BossPhase::One
        }
    }

    pub fn next(&self) -> Option<BossPhase> {
        match self {
            BossPhase::One => Some(BossPhase::Two),
            BossPhase::Two => Some(BossPhase::Three),
            BossPhase::Three => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Boss {
    pub health: f64,
    pub max_health: f64,
    pub contact_damage: f64,
    pub phase: BossPhase,
    pub contact_cooldown_ms: u64,
}

impl Boss {
    pub fn for_level(level: u32) -> Self {
        let max_health = BOSS_BASE_HEALTH + BOSS_HEALTH_PER_LEVEL * level as f64;
        Self {
            health: max_health,
            max_health,
            contact_damage: BOSS_CONTACT_DAMAGE,
            phase: BossPhase::One,
            contact_cooldown_ms: 0,
        }
    }

    pub fn health_fraction(&self) -> f64 {
        if self.max_health <= 0.0 {
            0.0
        } else {
            self.health / self.max_health
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub velocity: Vec2,
    pub damage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Powerup {
    pub kind: PowerupKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Player,
    Enemy(Enemy),
    Boss(Boss),
    Projectile(Projectile),
    Powerup(Powerup),
}

/// Payload-free discriminant used for filtering and snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityClass {
    Player,
    Enemy,
    Boss,
    Projectile,
    Powerup,
}

impl EntityKind {
    pub fn class(&self) -> EntityClass {
        match self {
            EntityKind::Player => EntityClass::Player,
            EntityKind::Enemy(_) => EntityClass::Enemy,
            EntityKind::Boss(_) => EntityClass::Boss,
            EntityKind::Projectile(_) => EntityClass::Projectile,
            EntityKind::Powerup(_) => EntityClass::Powerup,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub position: Vec2,
    pub kind: EntityKind,
}

impl Entity {
    pub fn class(&self) -> EntityClass {
        self.kind.class()
    }

    /// Remaining health fraction for entities that carry health.
    pub fn health_fraction(&self) -> Option<f32> {
        match &self.kind {
            EntityKind::Enemy(enemy) if enemy.max_health > 0.0 => {
                Some((enemy.health / enemy.max_health) as f32)
            }
            EntityKind::Boss(boss) => Some(boss.health_fraction() as f32),
            _ => None,
        }
    }

    /// Whether `point` lies inside this entity's clickable hit box.
    pub fn hit_region_contains(&self, point: Vec2) -> bool {
        let half = match self.kind {
            EntityKind::Enemy(_) => ENEMY_HALF_EXTENT,
            EntityKind::Boss(_) => BOSS_HALF_EXTENT,
            _ => return false,
        };
        (point.x - self.position.x).abs() <= half && (point.y - self.position.y).abs() <= half
    }
}

/// What the render boundary receives each tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub class: EntityClass,
    pub position: Vec2,
    pub health_fraction: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_stats_scale_with_level_and_kind() {
        let chaser = Enemy::for_level(EnemyKind::Chaser, 1);
        assert_eq!(chaser.max_health, 25.0);
        assert_eq!(chaser.speed, 55.0);
        assert_eq!(chaser.contact_damage, 4.0);

        let tank = Enemy::for_level(EnemyKind::Tank, 4);
        assert_eq!(tank.max_health, 40.0 * 2.5);
        assert_eq!(tank.speed, 70.0 * 0.5);
        assert_eq!(tank.health, tank.max_health);
    }

    #[test]
    fn test_boss_phase_thresholds_are_strict() {
        assert_eq!(BossPhase::for_health_fraction(1.0), BossPhase::One);
        assert_eq!(BossPhase::for_health_fraction(0.5), BossPhase::One);
        assert_eq!(BossPhase::for_health_fraction(0.49), BossPhase::Two);
        assert_eq!(BossPhase::for_health_fraction(0.25), BossPhase::Two);
        assert_eq!(BossPhase::for_health_fraction(0.24), BossPhase::Three);
        assert!(BossPhase::One < BossPhase::Three);
    }

    #[test]
    fn test_hit_region_is_a_box() {
        let entity = Entity {
            id: EntityId::from_raw(1),
            position: Vec2::new(100.0, 100.0),
            kind: EntityKind::Enemy(Enemy::for_level(EnemyKind::Chaser, 1)),
        };
        assert!(entity.hit_region_contains(Vec2::new(112.0, 88.0)));
        assert!(!entity.hit_region_contains(Vec2::new(113.0, 100.0)));
    }

    #[test]
    fn test_bounds_clamp() {
        let bounds = Bounds::new(800.0, 600.0);
        assert_eq!(bounds.clamp(Vec2::new(-5.0, 700.0)), Vec2::new(0.0, 600.0));
        assert_eq!(bounds.center(), Vec2::new(400.0, 300.0));
    }
}
