//! Analytical expectations against brute-force value iteration and known
//! reference values for every pool.

use std::collections::HashMap;

use gacha::cache::SolverCache;
use gacha::constants::*;
use gacha::expectation::expected_pulls;
use gacha::markov::solve_pool_tables;
use gacha::pool_rules::{PoolRules, RadianceRules};
use gacha::state_encoder::StateSpace;
use gacha::types::{InitialState, PityState, PoolId, StateComponents};

/// Small pool with a radiance counter: hard pity on pull 4, counter forces a
/// win after two consecutive losses.
const TOY_RADIANCE: PoolRules = PoolRules {
    name: "toy-radiance",
    base_rate: 0.1,
    soft_pity_start: 3,
    soft_pity_step: 0.4,
    max_pity: 4,
    win_rate: 0.5,
    radiance: Some(RadianceRules {
        range: 3,
        threshold: 2,
        rate: 0.05,
    }),
    lower_rarity: None,
};

/// `F_n(s)`: expected pulls for `n` targets from `s`, by value iteration of
/// `F_n(s) = 1 + Σ P(s → s') F_n(s') + P(win) F_{n-1}(after_win(s))`.
fn brute_force(rules: &PoolRules, targets: u32) -> Vec<HashMap<StateComponents, f64>> {
    let space = StateSpace::for_rules(rules);
    let states: Vec<StateComponents> = (0..space.total_states()).map(|i| space.decode(i)).collect();
    let mut levels = vec![states.iter().map(|&s| (s, 0.0)).collect::<HashMap<_, _>>()];

    for n in 1..=targets as usize {
        let mut f: HashMap<StateComponents, f64> = states.iter().map(|&s| (s, 0.0)).collect();
        for _ in 0..20_000 {
            let mut next = HashMap::with_capacity(states.len());
            let mut diff: f64 = 0.0;
            for &s in &states {
                let p = rules.rarity_hit_probability(s.pity);
                let (p_win, p_lose) = rules.win_probability(s.guaranteed, s.radiance);
                let mut v = 1.0;
                if p < 1.0 {
                    v += (1.0 - p) * f[&StateComponents { pity: s.pity + 1, ..s }];
                }
                v += p * p_lose * f[&rules.after_loss(s)];
                v += p * p_win * levels[n - 1][&rules.after_win(s)];
                diff = diff.max((v - f[&s]).abs());
                next.insert(s, v);
            }
            f = next;
            if diff < 1e-12 {
                break;
            }
        }
        levels.push(f);
    }
    levels
}

#[test]
fn toy_pool_matches_value_iteration() {
    let rules = TOY_RADIANCE;
    let tables = solve_pool_tables(&rules).unwrap();
    let exact = brute_force(&rules, 4);
    let space = tables.space;
    for i in 0..space.total_states() {
        let s = space.decode(i);
        for n in 1..=4u32 {
            let got = expected_pulls(&rules, &tables, s, n).unwrap();
            let want = exact[n as usize][&s];
            assert!((got - want).abs() < 1e-8, "{s:?} n={n}: {got} vs {want}");
        }
    }
}

#[test]
fn genshin_character_matches_value_iteration() {
    let rules = GENSHIN_CHARACTER;
    let tables = solve_pool_tables(&rules).unwrap();
    let exact = brute_force(&rules, 3);
    let starts = [
        StateComponents::fresh(0),
        StateComponents::fresh(1),
        StateComponents::fresh(2),
        StateComponents { pity: 40, guaranteed: true, radiance: 2 },
        StateComponents { pity: 80, guaranteed: false, radiance: 3 },
    ];
    for s in starts {
        for n in 1..=3u32 {
            let got = expected_pulls(&rules, &tables, s, n).unwrap();
            let want = exact[n as usize][&s];
            assert!((got - want).abs() < 1e-7, "{s:?} n={n}: {got} vs {want}");
        }
    }
}

#[test]
fn reference_values_from_zero_state() {
    let cache = SolverCache::new();
    let cases = [
        (PoolId::GenshinCharacter, 93.4404),
        (PoolId::GenshinWeapon, 87.5512),
        (PoolId::HsrCharacter, 89.5524),
        (PoolId::HsrLightCone, 66.5476),
    ];
    for (pool, want) in cases {
        let tables = cache.tables(pool).unwrap();
        let got = expected_pulls(pool.rules(), &tables, StateComponents::default(), 1).unwrap();
        assert!((got - want).abs() < 1e-3, "{}: {got} vs {want}", pool.name());
    }
}

#[test]
fn guaranteed_state_costs_one_cycle() {
    let cache = SolverCache::new();
    let tables = cache.tables(PoolId::HsrCharacter).unwrap();
    let start = PityState::HsrCharacter { pity: 0, guaranteed: true }.components();
    let got = expected_pulls(&HSR_CHARACTER, &tables, start, 1).unwrap();
    assert!((got - 62.2973).abs() < 1e-3, "got {got}");
}

#[test]
fn radiance_lowers_later_targets() {
    let cache = SolverCache::new();
    let tables = cache.tables(PoolId::GenshinCharacter).unwrap();
    let rules = &GENSHIN_CHARACTER;
    let e = |radiance, n| expected_pulls(rules, &tables, StateComponents::fresh(radiance), n).unwrap();
    // Below the threshold the counter does not change a single search.
    assert!((e(0, 1) - e(1, 1)).abs() < 1e-9);
    assert!((e(0, 2) - 186.8808).abs() < 1e-3);
    assert!((e(1, 3) - 272.5382).abs() < 1e-3);
    assert!(e(1, 3) < e(0, 3));
}

#[test]
fn weapon_fate_point_is_a_guarantee() {
    let cache = SolverCache::new();
    let tables = cache.tables(PoolId::GenshinWeapon).unwrap();
    let state = |fate_point| {
        let initial = InitialState { pity: 20, fate_point, ..Default::default() };
        PityState::from_initial(PoolId::GenshinWeapon, &initial).unwrap().components()
    };
    let empty = expected_pulls(&GENSHIN_WEAPON, &tables, state(0), 1).unwrap();
    let full = expected_pulls(&GENSHIN_WEAPON, &tables, state(1), 1).unwrap();
    assert!(full < empty);
    // A full fate point costs exactly the remaining hit.
    let remaining = tables.expected_for(StateComponents { pity: 20, guaranteed: true, radiance: 0 });
    assert_eq!(full, remaining);
}

#[test]
fn near_hard_pity_costs_one_pull_when_guaranteed() {
    let cache = SolverCache::new();
    for pool in PoolId::ALL {
        let rules = pool.rules();
        let tables = cache.tables(pool).unwrap();
        let last = StateComponents { pity: rules.max_pity - 1, guaranteed: true, radiance: 0 };
        let got = expected_pulls(rules, &tables, last, 1).unwrap();
        assert!((got - 1.0).abs() < 1e-9, "{}: {got}", pool.name());
    }
}
