//! Per-pool memoization of solved Markov tables.
//!
//! A [`SolverCache`] owns one slot per [`PoolId`]. The first query against a
//! pool builds its tables; concurrent first queries block on the same
//! initialisation, so each pool is solved at most once per cache. Tables are
//! handed out as `Arc` and never mutated afterwards.

use std::sync::Arc;

use log::debug;
use once_cell::sync::OnceCell;

use crate::error::Result;
use crate::markov::{solve_pool_tables, PoolTables};
use crate::types::PoolId;

#[derive(Default)]
pub struct SolverCache {
    slots: [OnceCell<Arc<PoolTables>>; PoolId::ALL.len()],
}

impl SolverCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Solved tables for `pool`, building them on first use.
    pub fn tables(&self, pool: PoolId) -> Result<Arc<PoolTables>> {
        self.slots[pool.index()]
            .get_or_try_init(|| {
                debug!("building tables for {}", pool.name());
                solve_pool_tables(pool.rules()).map(Arc::new)
            })
            .cloned()
    }

    /// Whether `pool` has already been solved.
    pub fn is_built(&self, pool: PoolId) -> bool {
        self.slots[pool.index()].get().is_some()
    }

    /// Solve every pool up front, e.g. at service start.
    pub fn warm_all(&self) -> Result<()> {
        for pool in PoolId::ALL {
            self.tables(pool)?;
        }
        Ok(())
    }
}
