//! # Gacha: pull-cost estimates for pity-based gacha pools
//!
//! Answers "how many pulls until I get N copies of the featured item?" for
//! four pools (Genshin character and weapon, HSR character and light cone),
//! either exactly or as a simulated distribution.
//!
//! ## Algorithm overview
//!
//! | Step | Rust module | Description |
//! |------|-------------|-------------|
//! | 1 | [`pool_rules`], [`constants`] | Per-pool hit probability ramp, win/loss rules, successor states |
//! | 2 | [`state_encoder`] | Mixed-radix index over `(pity, guaranteed, radiance)` |
//! | 3 | [`markov`] | Build Q and R of the absorbing chain, LU-factorise `I - Q` once, solve for `E` and `B` |
//! | 4 | [`expectation`] | Compose N targets, carrying the radiance distribution through `B` |
//! | 5 | [`simulation`] | Parallel Monte Carlo with buffered draws, reward tracking, percentiles |
//!
//! Tables are solved lazily, once per pool, and shared through
//! [`cache::SolverCache`]. [`api_computations::compute`] is the single entry
//! point used by both `gacha-calc` and [`server`].
//!
//! ## State representation
//!
//! `index = pity + guaranteed · P + radiance · 2P` with `P = max_pity`, giving
//! 720 states for Genshin character, 160 for the weapon pool, 180 for HSR
//! character and 160 for the light cone pool. The weapon fate point occupies
//! the `guaranteed` digit.

#![allow(clippy::needless_range_loop)]

pub mod api_computations;
pub mod cache;
pub mod constants;
pub mod env_config;
pub mod error;
pub mod expectation;
pub mod markov;
pub mod pool_rules;
pub mod server;
pub mod simulation;
pub mod state_encoder;
pub mod types;
