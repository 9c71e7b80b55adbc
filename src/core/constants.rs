// Timing
pub const DEFAULT_ATTACK_INTERVAL_SECONDS: f64 = 1.5;
pub const DEFAULT_SPECIAL_INTERVAL_SECONDS: f64 = 1.0;
pub const DEFAULT_SEGMENT_SECONDS: f64 = 5.0;
pub const WAVE_TRANSITION_DELAY_SECONDS: f64 = 2.0;
pub const ENEMY_RESPAWN_SECONDS: f64 = 2.5;
pub const ENEMY_ATTACK_INTERVAL_SECONDS: f64 = 2.0;

/// Float slack used when comparing simulated timestamps.
pub const TIME_EPSILON: f64 = 1e-9;

/// Upper bound on casts resolved at a single decision point.
pub const MAX_CASTS_PER_DECISION: usize = 8;

// Character stats
pub const BASE_HP: u32 = 100;
pub const HP_PER_STAMINA: u32 = 10;
pub const BASE_WEAPON_DAMAGE: f64 = 5.0;
pub const BASIC_ATTACK_AP_COEFFICIENT: f64 = 0.5;
pub const AP_PER_STRENGTH: f64 = 2.0;
pub const AP_PER_AGILITY: f64 = 1.0;
pub const SP_PER_INTELLECT: f64 = 2.0;
pub const BASE_CRIT_CHANCE: f64 = 0.05;
pub const CRIT_CHANCE_PER_AGILITY: f64 = 0.001;
pub const BASE_CRIT_MULTIPLIER: f64 = 2.0;

// Enemy generation (hp, hp_step, damage, damage_step, armor)
pub const ENEMY_BASE_STATS: (u32, u32, u32, u32, f64) = (120, 35, 3, 1, 0.05);
pub const ENEMY_STAT_VARIANCE_MIN: f64 = 0.9;
pub const ENEMY_STAT_VARIANCE_MAX: f64 = 1.1;
pub const ENEMY_MAX_ARMOR: f64 = 0.6;
pub const ENEMIES_PER_PACK: usize = 3;

// Reward conversion
pub const DAMAGE_PER_GOLD: u64 = 50;
pub const DAMAGE_PER_EXP: u64 = 20;
pub const GOLD_PER_KILL: u64 = 5;
pub const EXP_PER_KILL: u64 = 12;

// Offline progression
pub const OFFLINE_PAUSE_THRESHOLD_SECONDS: f64 = 300.0;
pub const MAX_OFFLINE_SECONDS: f64 = 7.0 * 24.0 * 60.0 * 60.0;
pub const OFFLINE_SEGMENT_SECONDS: f64 = 60.0;
pub const OFFLINE_REVIVES: u32 = 3;

// Snapshot blob framing
pub const SNAPSHOT_VERSION_MAGIC: u64 = 0x5155_4553_5442_5402;
