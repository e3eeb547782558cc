//! Absorbing Markov chain over a pool's pity states.
//!
//! Transient states are every `(pity, guaranteed, radiance)` tuple of the
//! pool's [`StateSpace`]. From state `i` with hit probability `p5`:
//!
//! - miss, weight `1 - p5`: `(pity + 1, guaranteed, radiance)`, into Q
//! - off-target hit, weight `p5 * p_lose`: [`PoolRules::after_loss`], into Q
//! - target hit, weight `p5 * p_win`: absorbed; column `after_win(s).radiance` of R
//!
//! `I - Q` is LU-factorised once and solved against two right-hand sides:
//! the all-ones vector (expected pulls to absorption, `E`) and `R`
//! (distribution of the radiance counter at absorption, `B = (I-Q)^-1 R`).
//! Pools without a persistent counter skip `B`: nothing survives a win.

use std::time::Instant;

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::error::{GachaError, Result};
use crate::pool_rules::PoolRules;
use crate::state_encoder::StateSpace;
use crate::types::StateComponents;

/// One-step structure of the chain: `q` is transient → transient,
/// `r` is transient → absorbed, split by post-win radiance value.
pub struct TransitionSystem {
    pub space: StateSpace,
    pub q: DMatrix<f64>,
    pub r: DMatrix<f64>,
}

impl TransitionSystem {
    /// `(transient_mass, absorbed_mass)` leaving state `i` in one pull.
    pub fn row_mass(&self, i: usize) -> (f64, f64) {
        (self.q.row(i).sum(), self.r.row(i).sum())
    }
}

/// Solved tables for one pool. Immutable after construction.
#[derive(Debug, Clone)]
pub struct PoolTables {
    pub space: StateSpace,
    /// `expected[i]`: expected pulls from state `i` until the next target.
    expected: Vec<f64>,
    /// Row-major `total_states × counter_range`; `None` for counterless pools.
    absorption: Option<Vec<f64>>,
}

impl PoolTables {
    #[inline]
    pub fn expected_steps(&self, index: usize) -> f64 {
        self.expected[index]
    }

    pub fn expected_for(&self, state: StateComponents) -> f64 {
        self.expected[self.space.encode(state)]
    }

    /// Distribution of the radiance counter right after the next target win,
    /// starting from state `index`.
    pub fn absorption_row(&self, index: usize) -> Option<&[f64]> {
        let k = self.space.counter_range;
        self.absorption
            .as_ref()
            .map(|b| &b[index * k..(index + 1) * k])
    }

    pub fn has_absorption(&self) -> bool {
        self.absorption.is_some()
    }
}

pub fn build_transition_system(rules: &PoolRules) -> TransitionSystem {
    let space = StateSpace::for_rules(rules);
    let n = space.total_states();
    let mut q = DMatrix::<f64>::zeros(n, n);
    let mut r = DMatrix::<f64>::zeros(n, space.counter_range);

    for i in 0..n {
        let s = space.decode(i);
        let p5 = rules.rarity_hit_probability(s.pity);

        if p5 < 1.0 {
            let next = StateComponents {
                pity: s.pity + 1,
                ..s
            };
            q[(i, space.encode(next))] += 1.0 - p5;
        }
        if p5 > 0.0 {
            let (p_win, p_lose) = rules.win_probability(s.guaranteed, s.radiance);
            if p_lose > 0.0 {
                q[(i, space.encode(rules.after_loss(s)))] += p5 * p_lose;
            }
            if p_win > 0.0 {
                r[(i, rules.after_win(s).radiance)] += p5 * p_win;
            }
        }
    }

    TransitionSystem { space, q, r }
}

/// Build and solve the chain for `rules`.
///
/// Fails only with [`GachaError::Numerical`], which means the constants do not
/// describe a strictly sub-stochastic transient block.
pub fn solve_pool_tables(rules: &PoolRules) -> Result<PoolTables> {
    let t0 = Instant::now();
    let system = build_transition_system(rules);
    let space = system.space;
    let n = space.total_states();

    let a = DMatrix::<f64>::identity(n, n) - &system.q;
    let lu = a.lu();
    let singular = || GachaError::Numerical(format!("I - Q is singular for {}", rules.name));

    let ones = DVector::<f64>::from_element(n, 1.0);
    let e = lu.solve(&ones).ok_or_else(singular)?;
    if e.iter().any(|v| !v.is_finite()) {
        return Err(singular());
    }
    let expected: Vec<f64> = e.iter().copied().collect();

    let absorption = if rules.has_persistent_counter() {
        let b = lu.solve(&system.r).ok_or_else(singular)?;
        let k = space.counter_range;
        let mut rows = Vec::with_capacity(n * k);
        for i in 0..n {
            for c in 0..k {
                rows.push(b[(i, c)]);
            }
        }
        Some(rows)
    } else {
        None
    };

    debug!(
        "solved {} chain: {} states, E[zero]={:.4}, {:.2} ms",
        rules.name,
        n,
        expected[space.zero_state(0)],
        t0.elapsed().as_secs_f64() * 1000.0
    );

    Ok(PoolTables {
        space,
        expected,
        absorption,
    })
}
