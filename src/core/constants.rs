// Ability scores
pub const NUM_ATTRIBUTES: usize = 6;
pub const BASE_ATTRIBUTE_VALUE: i32 = 10;
pub const STANDARD_ARRAY: [i32; NUM_ATTRIBUTES] = [15, 14, 13, 12, 10, 8];
pub const STANDARD_ARRAY_TOTAL: i32 = 72;
pub const ASI_POINTS: u32 = 2;
pub const PRIMAL_CHAMPION_BONUS: i32 = 4;

// Levels and proficiency
pub const MIN_LEVEL: u32 = 1;
pub const MAX_LEVEL: u32 = 20;
pub const BASE_PROFICIENCY_BONUS: i32 = 2;
pub const LEVELS_PER_PROFICIENCY_STEP: u32 = 4;
/// Party levels are drawn from one of four five-level bands (1-5, 6-10, 11-15, 16-20).
pub const LEVEL_BAND_WIDTH: u32 = 5;
pub const LEVEL_BAND_COUNT: u32 = 4;

// Skills
pub const NUM_SKILLS: usize = 18;

// Armor class
pub const UNARMORED_BASE_AC: i32 = 10;
pub const DRACONIC_RESILIENCE_BASE_AC: i32 = 13;
pub const SHIELD_AC_BONUS: i32 = 2;
pub const DEFENSE_STYLE_AC_BONUS: i32 = 1;

// Speed
pub const BASELINE_SPEED: i32 = 30;
pub const FAST_MOVEMENT_BONUS: i32 = 10;
pub const HOVER_SPEED_VALUE: i32 = 10;

// Dice
pub const D20_FACES: i32 = 20;
pub const SAVE_DC_BASE: i32 = 8;
/// Extra damage per slot tier above a spell's base level.
pub const UPCAST_DAMAGE_PER_TIER: i32 = 2;

// Encounter composition
pub const MAX_PARTY_SIZE: usize = 7;
pub const MAX_MONSTERS: usize = 15;

// Monster search
pub const SEARCH_ATTEMPTS_PER_SIZE: u32 = 1000;
pub const MAX_SEARCH_ROUNDS: u32 = 64;

// Outcome
pub const VARIANCE_PERCENT: i32 = 10;
pub const MIN_SIDE_POWER: f64 = 1.0;

// Resistance weighting in monster base stats
pub const IMMUNITY_BASE_STAT_WEIGHT: f64 = 5.0;
pub const VULNERABILITY_BASE_STAT_WEIGHT: f64 = -2.5;

/// XP thresholds per character level: (easy, medium, hard, deadly).
pub const XP_THRESHOLDS: [(u32, u32, u32, u32); MAX_LEVEL as usize] = [
    (25, 50, 75, 100),
    (50, 100, 150, 200),
    (75, 150, 225, 400),
    (125, 250, 375, 500),
    (250, 500, 750, 1100),
    (300, 600, 900, 1400),
    (350, 750, 1100, 1700),
    (450, 900, 1400, 2100),
    (550, 1100, 1600, 2400),
    (600, 1200, 1900, 2800),
    (800, 1600, 2400, 3600),
    (1000, 2000, 3000, 4500),
    (1100, 2200, 3400, 5100),
    (1250, 2500, 3800, 5700),
    (1400, 2800, 4300, 6400),
    (1600, 3200, 4800, 7200),
    (2000, 3900, 5900, 8800),
    (2100, 4200, 6300, 9500),
    (2400, 4900, 7300, 10900),
    (2800, 5700, 8500, 12700),
];

/// Monster-count buckets and their XP multipliers, ascending by group size.
pub const GROUP_MULTIPLIERS: [(usize, f64); 6] = [
    (1, 1.0),
    (2, 1.5),
    (6, 2.0),
    (10, 2.5),
    (14, 3.0),
    (MAX_MONSTERS, 4.0),
];
