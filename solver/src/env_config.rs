//! Shared environment configuration for the gacha binaries.
//!
//! Consolidates `RAYON_NUM_THREADS`, the `GACHA_*` simulation knobs and
//! `GACHA_PORT`.

use log::{info, warn};

use crate::constants::{DEFAULT_RNG_BUFFER_SIZE, DEFAULT_TRIALS_PER_CHUNK};

/// Knobs for a simulation batch. Requests may override `seed` and the count.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Master seed; per-chunk seeds are derived from it.
    pub seed: u64,
    /// Uniform draws generated per buffer refill.
    pub buffer_size: usize,
    /// Trials sharing one random stream.
    pub trials_per_chunk: usize,
    /// Overrides the per-pool default trial count.
    pub simulation_count: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: rand::random::<u64>(),
            buffer_size: DEFAULT_RNG_BUFFER_SIZE,
            trials_per_chunk: DEFAULT_TRIALS_PER_CHUNK,
            simulation_count: None,
        }
    }
}

impl SimulationConfig {
    /// Read `GACHA_SEED`, `GACHA_RNG_BUFFER`, `GACHA_TRIALS_PER_WORKER` and
    /// `GACHA_SIMULATION_COUNT`, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let config = Self {
            seed: env_parse("GACHA_SEED").unwrap_or(defaults.seed),
            buffer_size: env_parse("GACHA_RNG_BUFFER")
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.buffer_size),
            trials_per_chunk: env_parse("GACHA_TRIALS_PER_WORKER")
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.trials_per_chunk),
            simulation_count: env_parse("GACHA_SIMULATION_COUNT").filter(|&n: &usize| n > 0),
        };
        info!(
            "simulation config: buffer={} trials/chunk={} count={:?}",
            config.buffer_size, config.trials_per_chunk, config.simulation_count
        );
        config
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("ignoring unparsable {}={:?}", key, raw);
            None
        }
    }
}

/// Install the stderr logger. `RUST_LOG` overrides the default `warn` filter.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .try_init()
        .ok();
}

/// Read `RAYON_NUM_THREADS` (fallback `OMP_NUM_THREADS`) and size the global
/// pool; tolerates an already-initialized pool. Returns thread count.
pub fn init_rayon_threads_lenient() -> usize {
    let requested: Option<usize> = env_parse("RAYON_NUM_THREADS").or_else(|| env_parse("OMP_NUM_THREADS"));
    if let Some(n) = requested.filter(|&n| n > 0) {
        if rayon::ThreadPoolBuilder::new().num_threads(n).build_global().is_err() {
            warn!("rayon pool already initialized; keeping it");
        }
    }
    let threads = rayon::current_num_threads();
    info!("rayon threads: {}", threads);
    threads
}

/// Read `GACHA_PORT` (default 9000).
pub fn server_port() -> u16 {
    env_parse("GACHA_PORT").unwrap_or(9000)
}
