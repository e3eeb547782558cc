//! One-shot calculator: a JSON request in, one line of JSON out.
//!
//! The request is `argv[1]`, or stdin when no argument is given. Errors print
//! `FATAL: ...` to stderr and exit with status 1; stdout then stays empty.

use std::io::Read;
use std::process::ExitCode;

use gacha::api_computations::{compute, parse_request};
use gacha::cache::SolverCache;
use gacha::env_config::{init_logging, init_rayon_threads_lenient, SimulationConfig};
use gacha::error::GachaError;

fn read_request() -> Result<String, GachaError> {
    if let Some(arg) = std::env::args().nth(1) {
        return Ok(arg);
    }
    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .map_err(|e| GachaError::Configuration(format!("failed to read stdin: {e}")))?;
    if raw.trim().is_empty() {
        return Err(GachaError::Configuration(
            "no request given (pass JSON as the first argument or on stdin)".into(),
        ));
    }
    Ok(raw)
}

fn run() -> Result<String, GachaError> {
    let raw = read_request()?;
    let req = parse_request(&raw)?;
    init_rayon_threads_lenient();
    let config = SimulationConfig::from_env();
    let cache = SolverCache::new();
    let response = compute(&cache, &config, &req)?;
    serde_json::to_string(&response)
        .map_err(|e| GachaError::Numerical(format!("failed to encode response: {e}")))
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(line) => {
            println!("{}", line);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("FATAL: {}", e);
            ExitCode::FAILURE
        }
    }
}
