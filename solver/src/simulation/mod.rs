//! Monte Carlo simulation and statistics.
//!
//! - [`engine`]: per-trial state machine and the parallel batch runner
//! - [`rewards`]: reward-currency ledger for pools that track one
//! - [`statistics`]: mean, percentiles, success rate
//! - [`uniform`] / [`fast_prng`]: buffered uniform draws and seed derivation

pub mod engine;
pub mod fast_prng;
pub mod rewards;
pub mod statistics;
pub mod uniform;

// Re-export commonly used items
pub use engine::{simulate_batch, simulate_trial, TargetOutcome, Trial, TrialResult};
pub use fast_prng::{derive_seeds, SplitMix64};
pub use rewards::RewardLedger;
pub use statistics::{
    aggregate, percentile, success_rate, summarize_pulls, summarize_returns, DistributionReport,
    PullSummary, ReturnSummary,
};
pub use uniform::{BufferedUniform, UniformSource};
