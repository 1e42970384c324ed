// Simulation step; longer frames are split into steps of at most this size
pub const TICK_STEP_MS: u64 = 100;

// Arena geometry
pub const ARENA_WIDTH: f32 = 800.0;
pub const ARENA_HEIGHT: f32 = 600.0;
pub const SPAWN_EDGE_MARGIN: f32 = 50.0;
pub const BOSS_SPAWN_Y: f32 = 50.0;

// Director cadence (milliseconds)
pub const ENEMY_SPAWN_INTERVAL_MS: u64 = 2_000;
pub const LEVEL_DURATION_MS: u64 = 15_000;
pub const REGEN_INTERVAL_MS: u64 = 2_000;
pub const BOSS_INTERVAL: u32 = 5;
pub const PERK_INTERVAL: u32 = 3;
pub const INITIAL_ENEMIES: u32 = 3;

// Lifetimes and buff durations (milliseconds)
pub const POWERUP_LIFETIME_MS: u64 = 10_000;
pub const PROJECTILE_LIFETIME_MS: u64 = 3_000;
pub const SHIELD_DURATION_MS: u64 = 5_000;
pub const DOUBLE_MINING_DURATION_MS: u64 = 10_000;
pub const BOSS_CONTACT_COOLDOWN_MS: u64 = 1_000;

// Mining
pub const MINE_SCORE_DIVISOR: f64 = 2.0;
pub const VAMPIRE_MINING_MULTIPLIER: f64 = 1.5;
pub const VAMPIRE_HEAL: f64 = 2.0;

// Attacks and kills
pub const CRIT_CHANCE: f64 = 0.25;
pub const CRIT_MULTIPLIER: f64 = 2.0;
pub const KILL_SCORE: u64 = 50;
pub const BOSS_KILL_SCORE: u64 = 500;
pub const FORTUNE_MULTIPLIER: u64 = 2;
pub const LIFESTEAL_HEAL: f64 = 5.0;
pub const CHAIN_RADIUS: f32 = 100.0;
pub const CHAIN_DAMAGE_FACTOR: f64 = 0.5;
pub const POWERUP_DROP_CHANCE: f64 = 0.15;

// Damage taken
pub const DODGE_CHANCE: f64 = 0.15;
pub const PROJECTILE_DAMAGE: f64 = 10.0;
pub const BOSS_CONTACT_DAMAGE: f64 = 15.0;
pub const REGEN_AMOUNT: f64 = 1.0;

// Powerup effects
pub const HEALTH_POWERUP_AMOUNT: f64 = 30.0;
pub const SCORE_POWERUP_BONUS: u64 = 200;
pub const LASER_DAMAGE: f64 = 50.0;
pub const DOUBLE_MINING_MULTIPLIER: f64 = 2.0;

// Enemy scaling: value = base + per_level * level, then * per-type multiplier
pub const ENEMY_BASE_SPEED: f32 = 50.0;
pub const ENEMY_SPEED_PER_LEVEL: f32 = 5.0;
pub const ENEMY_BASE_HEALTH: f64 = 20.0;
pub const ENEMY_HEALTH_PER_LEVEL: f64 = 5.0;
pub const ENEMY_BASE_DAMAGE: f64 = 3.0;
pub const ENEMY_BASE_TYPES: u32 = 2;
pub const LEVELS_PER_ENEMY_TYPE: u32 = 5;

// Boss
pub const BOSS_BASE_HEALTH: f64 = 200.0;
pub const BOSS_HEALTH_PER_LEVEL: f64 = 50.0;
pub const BOSS_SPEED: f32 = 40.0;
pub const BOSS_PHASE_TWO_THRESHOLD: f64 = 0.5;
pub const BOSS_PHASE_THREE_THRESHOLD: f64 = 0.25;
pub const BOSS_PHASE_TWO_REINFORCEMENTS: u32 = 3;
pub const BOSS_FIRE_RATE_PER_SECOND: f64 = 1.2;

// Shooter AI
pub const SHOOTER_APPROACH_DISTANCE: f32 = 200.0;
pub const SHOOTER_RETREAT_DISTANCE: f32 = 150.0;
pub const SHOOTER_FIRE_RATE_PER_SECOND: f64 = 0.6;
pub const PROJECTILE_SPEED: f32 = 200.0;

// Collision geometry (half extents / radii in pixels)
pub const ENEMY_HALF_EXTENT: f32 = 12.0;
pub const BOSS_HALF_EXTENT: f32 = 40.0;
pub const ENEMY_CONTACT_RADIUS: f32 = 30.0;
pub const BOSS_CONTACT_RADIUS: f32 = 40.0;
pub const PICKUP_RADIUS: f32 = 28.0;
pub const PROJECTILE_HIT_RADIUS: f32 = 24.0;

// Perk offers
pub const PERK_OFFER_SIZE: usize = 3;
