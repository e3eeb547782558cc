//! Monte Carlo engine: plays pulls one at a time until each target lands.
//!
//! A [`Trial`] owns one pool state and (for pools with a reward currency) one
//! [`RewardLedger`]. [`Trial::pull_until_target`] advances it pull by pull:
//!
//! 1. roll the rarity hit against `rarity_hit_probability(pity)`
//! 2. on a hit, roll win/lose and apply [`PoolRules::after_win`] / `after_loss`
//! 3. on a miss, bump pity and resolve the 4★ sub-roll
//!
//! and stops on a target win. Termination is guaranteed by hard pity. The
//! state carries forward between targets of the same trial, which is what the
//! radiance composition in [`crate::expectation`] models.
//!
//! [`simulate_batch`] splits trials into fixed-size chunks, one independent
//! random stream per chunk, and runs chunks on the rayon pool.

use std::time::Instant;

use log::info;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::env_config::SimulationConfig;
use crate::pool_rules::PoolRules;
use crate::types::StateComponents;

use super::fast_prng::derive_seeds;
use super::rewards::RewardLedger;
use super::uniform::{BufferedUniform, UniformSource};

/// Cost of one target. Bounded by two hard-pity runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetOutcome {
    pub pulls: u32,
    pub returns: f64,
}

/// Totals over all targets of one trial.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrialResult {
    pub pulls: u64,
    pub returns: f64,
}

pub struct Trial<'a> {
    rules: &'a PoolRules,
    state: StateComponents,
    ledger: Option<RewardLedger>,
}

impl<'a> Trial<'a> {
    pub fn new(rules: &'a PoolRules, start: StateComponents, up4_c6: bool) -> Self {
        Self {
            rules,
            state: start,
            ledger: rules.lower_rarity.map(|lr| RewardLedger::new(lr, up4_c6)),
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> StateComponents {
        self.state
    }

    pub fn pull_until_target<U: UniformSource>(&mut self, rng: &mut U) -> TargetOutcome {
        let rules = self.rules;
        let mut pulls = 0u32;
        let mut returns = 0.0;
        loop {
            pulls += 1;
            let p5 = rules.rarity_hit_probability(self.state.pity);
            if let Some(ledger) = self.ledger.as_mut() {
                ledger.advance();
            }

            if rng.next_uniform() < p5 {
                let (p_win, _) = rules.win_probability(self.state.guaranteed, self.state.radiance);
                let won = rng.next_uniform() < p_win;
                if let Some(ledger) = self.ledger.as_mut() {
                    returns += ledger.on_five_star(won);
                }
                if won {
                    self.state = rules.after_win(self.state);
                    return TargetOutcome { pulls, returns };
                }
                self.state = rules.after_loss(self.state);
            } else {
                self.state.pity += 1;
                if let Some(ledger) = self.ledger.as_mut() {
                    returns += ledger.on_five_star_miss(p5, rng);
                }
            }
        }
    }
}

/// Run one trial: `target_count` consecutive targets from `start`.
pub fn simulate_trial<U: UniformSource>(
    rules: &PoolRules,
    start: StateComponents,
    target_count: u32,
    up4_c6: bool,
    rng: &mut U,
) -> TrialResult {
    let mut trial = Trial::new(rules, start, up4_c6);
    let mut total = TrialResult::default();
    for _ in 0..target_count {
        let outcome = trial.pull_until_target(rng);
        total.pulls += u64::from(outcome.pulls);
        total.returns += outcome.returns;
    }
    total
}

/// Run `num_trials` independent trials in parallel.
///
/// The output order depends only on the chunk layout and `config.seed`, not
/// on the number of worker threads.
pub fn simulate_batch(
    rules: &PoolRules,
    start: StateComponents,
    target_count: u32,
    up4_c6: bool,
    num_trials: usize,
    config: &SimulationConfig,
) -> Vec<TrialResult> {
    let t0 = Instant::now();
    let chunk = config.trials_per_chunk.max(1);
    let num_chunks = num_trials.div_ceil(chunk);
    let seeds = derive_seeds(config.seed, num_chunks);

    let chunks: Vec<(Vec<TrialResult>, u64)> = seeds
        .par_iter()
        .enumerate()
        .map(|(c, &seed)| {
            let n = chunk.min(num_trials - c * chunk);
            let mut rng = BufferedUniform::new(SmallRng::seed_from_u64(seed), config.buffer_size);
            let results: Vec<TrialResult> = (0..n)
                .map(|_| simulate_trial(rules, start, target_count, up4_c6, &mut rng))
                .collect();
            (results, rng.refills())
        })
        .collect();
    let refills: u64 = chunks.iter().map(|(_, r)| r).sum();
    let mut results = Vec::with_capacity(num_trials);
    for (chunk_results, _) in chunks {
        results.extend(chunk_results);
    }

    let elapsed = t0.elapsed().as_secs_f64();
    info!(
        "simulated {} trials of {} ({} chunks, {} buffer refills, {} threads) in {:.1} ms ({:.0} trials/s)",
        num_trials,
        rules.name,
        num_chunks,
        refills,
        rayon::current_num_threads(),
        elapsed * 1000.0,
        num_trials as f64 / elapsed.max(1e-9)
    );
    results
}
