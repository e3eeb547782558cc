//! Pool constants and simulation defaults.
//!
//! Every number that shapes the probability model lives here, in one table per
//! pool. The Markov solver and the simulator both read the same [`PoolRules`]
//! values, so the two paths cannot drift apart when a constant changes.
//!
//! | Pool | Base | Soft pity from pull | Step | Hard pity | Off-guarantee win |
//! |------|------|---------------------|------|-----------|-------------------|
//! | Genshin character | 0.6% | 74 | 6% | 90 | 50% (+ radiance) |
//! | Genshin weapon | 0.7% | 64 | 7% | 80 | 37.5% |
//! | HSR character | 0.6% | 74 | 6% | 90 | 56.25% |
//! | HSR light cone | 0.8% | 66 | 8% | 80 | 75% |

use crate::pool_rules::{LowerRarityRules, PoolRules, RadianceRules};

/// Number of values the radiance ("mingguang") counter can take: 0..=3.
pub const RADIANCE_RANGE: usize = 4;

/// Radiance counter value at which the next off-guarantee hit is forced to win.
pub const RADIANCE_THRESHOLD: usize = 3;

/// Extra chance that an off-guarantee hit is converted into a win by radiance.
pub const RADIANCE_RATE: f64 = 0.00018;

pub const GENSHIN_CHARACTER: PoolRules = PoolRules {
    name: "genshin-character",
    base_rate: 0.006,
    soft_pity_start: 74,
    soft_pity_step: 0.06,
    max_pity: 90,
    win_rate: 0.5,
    radiance: Some(RadianceRules {
        range: RADIANCE_RANGE,
        threshold: RADIANCE_THRESHOLD,
        rate: RADIANCE_RATE,
    }),
    lower_rarity: Some(GENSHIN_FOUR_STAR),
};

pub const GENSHIN_WEAPON: PoolRules = PoolRules {
    name: "genshin-weapon",
    base_rate: 0.007,
    soft_pity_start: 64,
    soft_pity_step: 0.07,
    max_pity: 80,
    win_rate: 0.375,
    radiance: None,
    lower_rarity: None,
};

pub const HSR_CHARACTER: PoolRules = PoolRules {
    name: "hsr-character",
    base_rate: 0.006,
    soft_pity_start: 74,
    soft_pity_step: 0.06,
    max_pity: 90,
    win_rate: 0.5625,
    radiance: None,
    lower_rarity: None,
};

/// Soft-pity step is 0.08; the ramp is clamped to 1.0 before hard pity.
pub const HSR_LIGHT_CONE: PoolRules = PoolRules {
    name: "hsr-lightcone",
    base_rate: 0.008,
    soft_pity_start: 66,
    soft_pity_step: 0.08,
    max_pity: 80,
    win_rate: 0.75,
    radiance: None,
    lower_rarity: None,
};

/// Genshin character-banner 4★ track, used only for reward accounting.
pub const GENSHIN_FOUR_STAR: LowerRarityRules = LowerRarityRules {
    rate: 0.051,
    max_pity: 10,
    rate_up_chance: 0.5,
    standard_characters: 39,
    standard_weapons: 18,
};

// ── Reward ("returns") values ───────────────────────────────────────

/// Target 5★ copies that yield [`FIVE_STAR_RETURN`]; later copies yield
/// [`FIVE_STAR_SATURATED_RETURN`].
pub const FIVE_STAR_COPY_LIMIT: u32 = 7;
pub const FIVE_STAR_RETURN: f64 = 10.0;
pub const FIVE_STAR_SATURATED_RETURN: f64 = 25.0;

pub const FOUR_STAR_UP_RETURN: f64 = 2.0;
/// Rate-up 4★ return once the featured 4★ is already at full constellation.
pub const FOUR_STAR_UP_C6_RETURN: f64 = 5.0;
pub const FOUR_STAR_WEAPON_RETURN: f64 = 2.0;
pub const FOUR_STAR_COPY_LIMIT: u32 = 7;
pub const FOUR_STAR_REPEAT_RETURN: f64 = 2.0;
pub const FOUR_STAR_SATURATED_RETURN: f64 = 5.0;

/// Denominator floor for the conditional 4★ rate on a pull where p5 = 1.
pub const FOUR_STAR_HARD_PITY_DENOMINATOR: f64 = 0.99;

// ── Analytical / simulation defaults ────────────────────────────────

/// Residual probability below which a radiance branch is dropped while
/// composing multi-target expectations.
pub const MASS_EPSILON: f64 = 1e-9;

pub const CHARACTER_SIMULATION_COUNT: usize = 100_000;
pub const DEFAULT_SIMULATION_COUNT: usize = 50_000;

/// Largest `simulationCount` a request may ask for.
pub const MAX_SIMULATION_COUNT: usize = 10_000_000;

/// Largest `targetCount` a request may ask for.
pub const MAX_TARGET_COUNT: u32 = 10_000;

/// Uniform draws generated per buffer refill.
pub const DEFAULT_RNG_BUFFER_SIZE: usize = 65_536;

/// Trials per independent random stream (one rayon work item).
pub const DEFAULT_TRIALS_PER_CHUNK: usize = 4_096;

/// Percentiles reported by distribution mode.
pub const REPORTED_PERCENTILES: [f64; 5] = [25.0, 50.0, 75.0, 90.0, 95.0];
