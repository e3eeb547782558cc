//! Analytical expected pulls for N targets.
//!
//! Target 1 costs `E[start]`. For a counterless pool every later target starts
//! from the zero state, so it costs `E[zero]`. With a radiance counter the next
//! search starts at `(0, false, k)` where `k` is random: we carry the
//! distribution of `k`, begun at `B[start]`, and per target add
//! `Σ_k P(k) · E[zero(k)]` and advance to `Σ_k P(k) · B[zero(k)]`.

use crate::constants::MASS_EPSILON;
use crate::error::{GachaError, Result};
use crate::markov::PoolTables;
use crate::pool_rules::PoolRules;
use crate::types::StateComponents;

pub fn expected_pulls(
    rules: &PoolRules,
    tables: &PoolTables,
    start: StateComponents,
    target_count: u32,
) -> Result<f64> {
    if target_count == 0 {
        return Err(GachaError::InputRange("targetCount must be at least 1".into()));
    }
    let space = tables.space;
    if !space.contains(start) {
        return Err(GachaError::InputRange(format!(
            "state {start:?} outside the {} state space",
            rules.name
        )));
    }

    let start_index = space.encode(start);
    let mut total = tables.expected_steps(start_index);
    if target_count == 1 {
        return Ok(total);
    }

    let remaining = (target_count - 1) as f64;
    let Some(first_row) = tables.absorption_row(start_index) else {
        return Ok(total + remaining * tables.expected_steps(space.zero_state(0)));
    };

    let k = space.counter_range;
    let mut dist = first_row.to_vec();
    let mut next = vec![0.0; k];
    for _ in 1..target_count {
        normalize(&mut dist);
        next.iter_mut().for_each(|p| *p = 0.0);
        let mut cost = 0.0;
        for (radiance, &p) in dist.iter().enumerate() {
            if p <= MASS_EPSILON {
                continue;
            }
            let idx = space.zero_state(radiance);
            cost += p * tables.expected_steps(idx);
            let row = tables
                .absorption_row(idx)
                .ok_or_else(|| GachaError::Numerical("absorption table missing a row".into()))?;
            for (acc, &b) in next.iter_mut().zip(row) {
                *acc += p * b;
            }
        }
        total += cost;
        std::mem::swap(&mut dist, &mut next);
    }
    Ok(total)
}

/// Rescale to unit mass, absorbing round-off from the LU solve.
fn normalize(dist: &mut [f64]) {
    let sum: f64 = dist.iter().sum();
    if sum > 0.0 {
        dist.iter_mut().for_each(|p| *p /= sum);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::markov::solve_pool_tables;

    #[test]
    fn test_zero_targets_rejected() {
        let tables = solve_pool_tables(&HSR_CHARACTER).unwrap();
        let r = expected_pulls(&HSR_CHARACTER, &tables, StateComponents::default(), 0);
        assert!(matches!(r, Err(GachaError::InputRange(_))));
    }

    #[test]
    fn test_counterless_targets_add_linearly() {
        let tables = solve_pool_tables(&HSR_LIGHT_CONE).unwrap();
        let start = StateComponents { pity: 30, guaranteed: true, radiance: 0 };
        let one = expected_pulls(&HSR_LIGHT_CONE, &tables, start, 1).unwrap();
        let three = expected_pulls(&HSR_LIGHT_CONE, &tables, start, 3).unwrap();
        let zero = tables.expected_for(StateComponents::default());
        assert!((three - (one + 2.0 * zero)).abs() < 1e-9);
    }

    #[test]
    fn test_radiance_composition_single_target() {
        let tables = solve_pool_tables(&GENSHIN_CHARACTER).unwrap();
        let start = StateComponents { pity: 0, guaranteed: false, radiance: 1 };
        let e = expected_pulls(&GENSHIN_CHARACTER, &tables, start, 1).unwrap();
        assert_eq!(e, tables.expected_for(start));
    }

    #[test]
    fn test_radiance_two_targets_by_hand() {
        // From (0, false, 0): win outright (counter -> 0) or lose then win on
        // guarantee (counter -> 1). The second target starts from that counter.
        let rules = GENSHIN_CHARACTER;
        let tables = solve_pool_tables(&rules).unwrap();
        let (p_win, p_lose) = rules.win_probability(false, 0);
        let expect = tables.expected_for(StateComponents::fresh(0))
            + p_win * tables.expected_for(StateComponents::fresh(0))
            + p_lose * tables.expected_for(StateComponents::fresh(1));
        let got = expected_pulls(&rules, &tables, StateComponents::fresh(0), 2).unwrap();
        assert!((got - expect).abs() < 1e-9, "{got} vs {expect}");
    }

    #[test]
    fn test_high_radiance_makes_next_target_cheaper() {
        let rules = GENSHIN_CHARACTER;
        let tables = solve_pool_tables(&rules).unwrap();
        let low = tables.expected_for(StateComponents::fresh(0));
        let high = tables.expected_for(StateComponents::fresh(3));
        assert!(high < low);
        // Counter at threshold: the first hit is a certain win.
        assert!((high - rules.expected_pulls_per_hit()).abs() < 1e-9);
    }
}
