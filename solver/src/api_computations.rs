//! Request validation and dispatch, shared by `gacha-calc` and the HTTP server.
//!
//! [`compute`] takes a parsed [`Request`] through validation, picks the pool,
//! then either evaluates the analytical mean from the cached tables or runs a
//! simulation batch and aggregates it.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::cache::SolverCache;
use crate::constants::{MAX_SIMULATION_COUNT, MAX_TARGET_COUNT};
use crate::env_config::SimulationConfig;
use crate::error::{GachaError, Result};
use crate::expectation::expected_pulls;
use crate::simulation::engine::simulate_batch;
use crate::simulation::statistics::{aggregate, DistributionReport};
use crate::types::{Game, InitialState, Mode, PityState, PoolId, PoolKind};

fn default_target_count() -> i64 {
    1
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub game: Game,
    pub pool: PoolKind,
    #[serde(default)]
    pub mode: Mode,
    pub initial_state: InitialState,
    #[serde(default = "default_target_count")]
    pub target_count: i64,
    #[serde(default)]
    pub budget: Option<i64>,
    #[serde(default, rename = "up4C6")]
    pub up4_c6: bool,
    #[serde(default)]
    pub simulation_count: Option<i64>,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ExpectationReport {
    pub mean: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Response {
    Expectation(ExpectationReport),
    Distribution(DistributionReport),
}

pub fn parse_request(raw: &str) -> Result<Request> {
    Ok(serde_json::from_str(raw)?)
}

/// Validated request, converted to the solver's types.
struct Plan {
    pool: PoolId,
    state: PityState,
    target_count: u32,
    budget: Option<u64>,
}

fn plan(req: &Request) -> Result<Plan> {
    let pool = PoolId::from_keys(req.game, req.pool)?;
    let state = PityState::from_initial(pool, &req.initial_state)?;
    let target_count = u32::try_from(req.target_count)
        .ok()
        .filter(|n| (1..=MAX_TARGET_COUNT).contains(n))
        .ok_or_else(|| {
            GachaError::InputRange(format!(
                "targetCount {} outside [1, {MAX_TARGET_COUNT}]",
                req.target_count
            ))
        })?;
    let budget = req
        .budget
        .map(|b| {
            u64::try_from(b)
                .map_err(|_| GachaError::InputRange(format!("budget {b} must be non-negative")))
        })
        .transpose()?;
    Ok(Plan {
        pool,
        state,
        target_count,
        budget,
    })
}

fn trial_count(req: &Request, config: &SimulationConfig, pool: PoolId) -> Result<usize> {
    match req.simulation_count {
        Some(n) => usize::try_from(n)
            .ok()
            .filter(|n| (1..=MAX_SIMULATION_COUNT).contains(n))
            .ok_or_else(|| {
                GachaError::InputRange(format!(
                    "simulationCount {n} outside [1, {MAX_SIMULATION_COUNT}]"
                ))
            }),
        None => Ok(config
            .simulation_count
            .unwrap_or_else(|| pool.default_simulation_count())),
    }
}

pub fn compute(cache: &SolverCache, config: &SimulationConfig, req: &Request) -> Result<Response> {
    let plan = plan(req)?;
    let rules = plan.pool.rules();
    let start = plan.state.components();
    debug!(
        "{:?} request: {} from {:?}, {} target(s)",
        req.mode,
        plan.pool.name(),
        start,
        plan.target_count
    );

    match req.mode {
        Mode::Expectation => {
            let tables = cache.tables(plan.pool)?;
            let mean = expected_pulls(rules, &tables, start, plan.target_count)?;
            Ok(Response::Expectation(ExpectationReport { mean }))
        }
        Mode::Distribution => {
            let num_trials = trial_count(req, config, plan.pool)?;
            let config = SimulationConfig {
                seed: req.seed.unwrap_or(config.seed),
                ..config.clone()
            };
            let results = simulate_batch(rules, start, plan.target_count, req.up4_c6, num_trials, &config);
            Ok(Response::Distribution(aggregate(
                &results,
                plan.budget,
                plan.pool.has_returns(),
            )))
        }
    }
}
