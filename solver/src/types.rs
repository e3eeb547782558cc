//! Core data types: pool identity, the tagged per-pool pity state, and the
//! flat component tuple that the solver and simulator operate on.
//!
//! [`PityState`] is what callers hand in: one variant per pool, carrying only
//! the fields that pool has. [`StateComponents`] is the uniform
//! `(pity, guaranteed, radiance)` view used for encoding and transitions.
//! Pools without a radiance counter always hold `radiance == 0`; the weapon
//! pool stores its fate point in the `guaranteed` slot.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{GachaError, Result};
use crate::pool_rules::PoolRules;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    Genshin,
    Hsr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolKind {
    Character,
    Weapon,
    Lightcone,
}

/// What a request asks for: the analytical mean, or a simulated distribution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Expectation,
    Distribution,
}

/// One of the four supported (game, pool) combinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PoolId {
    GenshinCharacter,
    GenshinWeapon,
    HsrCharacter,
    HsrLightCone,
}

impl PoolId {
    pub const ALL: [PoolId; 4] = [
        PoolId::GenshinCharacter,
        PoolId::GenshinWeapon,
        PoolId::HsrCharacter,
        PoolId::HsrLightCone,
    ];

    pub fn from_keys(game: Game, pool: PoolKind) -> Result<Self> {
        match (game, pool) {
            (Game::Genshin, PoolKind::Character) => Ok(PoolId::GenshinCharacter),
            (Game::Genshin, PoolKind::Weapon) => Ok(PoolId::GenshinWeapon),
            (Game::Hsr, PoolKind::Character) => Ok(PoolId::HsrCharacter),
            (Game::Hsr, PoolKind::Lightcone) => Ok(PoolId::HsrLightCone),
            (game, pool) => Err(GachaError::Configuration(format!(
                "pool {pool:?} does not exist in game {game:?}"
            ))),
        }
    }

    pub fn rules(self) -> &'static PoolRules {
        match self {
            PoolId::GenshinCharacter => &GENSHIN_CHARACTER,
            PoolId::GenshinWeapon => &GENSHIN_WEAPON,
            PoolId::HsrCharacter => &HSR_CHARACTER,
            PoolId::HsrLightCone => &HSR_LIGHT_CONE,
        }
    }

    /// Dense index, used to key per-pool caches.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        self.rules().name
    }

    /// Whether the pool tracks a reward currency ("returns").
    pub fn has_returns(self) -> bool {
        self.rules().lower_rarity.is_some()
    }

    pub fn default_simulation_count(self) -> usize {
        match self {
            PoolId::GenshinCharacter | PoolId::HsrCharacter => CHARACTER_SIMULATION_COUNT,
            PoolId::GenshinWeapon | PoolId::HsrLightCone => DEFAULT_SIMULATION_COUNT,
        }
    }
}

/// Uniform sub-state view shared by every pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StateComponents {
    /// Pulls since the last rarity hit.
    pub pity: usize,
    /// Next hit is the target (weapon pool: fate point is full).
    pub guaranteed: bool,
    /// Radiance counter; always 0 for pools without one.
    pub radiance: usize,
}

impl StateComponents {
    /// Fresh search (no pity, no guarantee) carrying a radiance value.
    pub fn fresh(radiance: usize) -> Self {
        StateComponents {
            pity: 0,
            guaranteed: false,
            radiance,
        }
    }
}

/// Caller-supplied starting state, one variant per pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PityState {
    GenshinCharacter {
        pity: usize,
        guaranteed: bool,
        radiance: usize,
    },
    GenshinWeapon {
        pity: usize,
        fate_point: usize,
    },
    HsrCharacter {
        pity: usize,
        guaranteed: bool,
    },
    HsrLightCone {
        pity: usize,
        guaranteed: bool,
    },
}

/// Request-side initial state: the union of all pool fields, as a host sends it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialState {
    pub pity: i64,
    #[serde(default)]
    pub is_guaranteed: bool,
    #[serde(default)]
    pub mingguang_counter: i64,
    #[serde(default)]
    pub fate_point: i64,
}

impl PityState {
    /// Zero state of the given pool.
    #[cfg(test)]
    pub(crate) fn zero(pool: PoolId) -> Self {
        Self::from_components(pool, StateComponents::default())
    }

    /// Validate the request fields relevant to `pool` and build its state.
    pub fn from_initial(pool: PoolId, initial: &InitialState) -> Result<Self> {
        let rules = pool.rules();
        if initial.pity < 0 || initial.pity as usize >= rules.max_pity {
            return Err(GachaError::InputRange(format!(
                "pity {} outside [0, {}) for {}",
                initial.pity,
                rules.max_pity,
                pool.name()
            )));
        }
        let pity = initial.pity as usize;
        let state = match pool {
            PoolId::GenshinCharacter => {
                let range = rules.counter_range() as i64;
                if initial.mingguang_counter < 0 || initial.mingguang_counter >= range {
                    return Err(GachaError::InputRange(format!(
                        "mingguangCounter {} outside [0, {range})",
                        initial.mingguang_counter
                    )));
                }
                PityState::GenshinCharacter {
                    pity,
                    guaranteed: initial.is_guaranteed,
                    radiance: initial.mingguang_counter as usize,
                }
            }
            PoolId::GenshinWeapon => {
                if !(0..=1).contains(&initial.fate_point) {
                    return Err(GachaError::InputRange(format!(
                        "fatePoint {} outside [0, 1]",
                        initial.fate_point
                    )));
                }
                PityState::GenshinWeapon {
                    pity,
                    fate_point: initial.fate_point as usize,
                }
            }
            PoolId::HsrCharacter => PityState::HsrCharacter {
                pity,
                guaranteed: initial.is_guaranteed,
            },
            PoolId::HsrLightCone => PityState::HsrLightCone {
                pity,
                guaranteed: initial.is_guaranteed,
            },
        };
        Ok(state)
    }

    pub fn pool(&self) -> PoolId {
        match self {
            PityState::GenshinCharacter { .. } => PoolId::GenshinCharacter,
            PityState::GenshinWeapon { .. } => PoolId::GenshinWeapon,
            PityState::HsrCharacter { .. } => PoolId::HsrCharacter,
            PityState::HsrLightCone { .. } => PoolId::HsrLightCone,
        }
    }

    pub fn components(&self) -> StateComponents {
        match *self {
            PityState::GenshinCharacter {
                pity,
                guaranteed,
                radiance,
            } => StateComponents {
                pity,
                guaranteed,
                radiance,
            },
            PityState::GenshinWeapon { pity, fate_point } => StateComponents {
                pity,
                guaranteed: fate_point >= 1,
                radiance: 0,
            },
            PityState::HsrCharacter { pity, guaranteed }
            | PityState::HsrLightCone { pity, guaranteed } => StateComponents {
                pity,
                guaranteed,
                radiance: 0,
            },
        }
    }

    pub fn from_components(pool: PoolId, c: StateComponents) -> Self {
        match pool {
            PoolId::GenshinCharacter => PityState::GenshinCharacter {
                pity: c.pity,
                guaranteed: c.guaranteed,
                radiance: c.radiance,
            },
            PoolId::GenshinWeapon => PityState::GenshinWeapon {
                pity: c.pity,
                fate_point: c.guaranteed as usize,
            },
            PoolId::HsrCharacter => PityState::HsrCharacter {
                pity: c.pity,
                guaranteed: c.guaranteed,
            },
            PoolId::HsrLightCone => PityState::HsrLightCone {
                pity: c.pity,
                guaranteed: c.guaranteed,
            },
        }
    }
}
