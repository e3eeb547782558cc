//! Pool rule descriptors: hit probability, win/lose split, and the successor
//! rules applied after a rarity hit.
//!
//! A pool is plain data ([`PoolRules`]). The Markov solver and the simulator
//! both call [`PoolRules::after_win`] and [`PoolRules::after_loss`], so the
//! reset/increment asymmetry of the radiance counter is written exactly once.

use crate::types::StateComponents;

/// Radiance ("mingguang") counter: consecutive off-guarantee losses, with a
/// small extra win chance and a forced win once it reaches `threshold`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadianceRules {
    /// Number of counter values; the counter saturates at `range - 1`.
    pub range: usize,
    pub threshold: usize,
    pub rate: f64,
}

/// Lower-rarity (4★) track used by the simulator for reward accounting.
/// It never changes the 5★ process.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LowerRarityRules {
    /// Unconditional per-pull 4★ rate.
    pub rate: f64,
    /// A 4★ is forced on the pull where `pity4` reaches this value.
    pub max_pity: u32,
    pub rate_up_chance: f64,
    pub standard_characters: u32,
    pub standard_weapons: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoolRules {
    pub name: &'static str,
    pub base_rate: f64,
    /// First pull number (1-based) that gets the soft-pity ramp.
    pub soft_pity_start: usize,
    pub soft_pity_step: f64,
    /// Pull number (1-based) at which a hit is certain.
    pub max_pity: usize,
    /// Probability that an off-guarantee hit is the target.
    pub win_rate: f64,
    pub radiance: Option<RadianceRules>,
    pub lower_rarity: Option<LowerRarityRules>,
}

impl PoolRules {
    /// Probability that the next pull is a rarity hit, given `pity`
    /// consecutive non-hits so far.
    #[inline]
    pub fn rarity_hit_probability(&self, pity: usize) -> f64 {
        let pull = pity + 1;
        if pull >= self.max_pity {
            1.0
        } else if pull < self.soft_pity_start {
            self.base_rate
        } else {
            let ramp = (pull - self.soft_pity_start + 1) as f64 * self.soft_pity_step;
            (self.base_rate + ramp).min(1.0)
        }
    }

    /// `(p_win, p_lose)` for a hit made in the given guarantee/radiance state.
    pub fn win_probability(&self, guaranteed: bool, radiance: usize) -> (f64, f64) {
        if guaranteed {
            return (1.0, 0.0);
        }
        match self.radiance {
            Some(r) if radiance >= r.threshold => (1.0, 0.0),
            Some(r) => (
                r.rate + (1.0 - r.rate) * self.win_rate,
                (1.0 - r.rate) * (1.0 - self.win_rate),
            ),
            None => (self.win_rate, 1.0 - self.win_rate),
        }
    }

    /// Number of distinct secondary-counter values (1 when the pool has none).
    #[inline]
    pub fn counter_range(&self) -> usize {
        self.radiance.map_or(1, |r| r.range)
    }

    /// True when a counter value survives a target win and therefore shapes
    /// the cost of later targets.
    #[inline]
    pub fn has_persistent_counter(&self) -> bool {
        self.radiance.is_some()
    }

    /// State after an off-target hit made from `state`.
    pub fn after_loss(&self, state: StateComponents) -> StateComponents {
        let radiance = if state.guaranteed {
            state.radiance
        } else {
            (state.radiance + 1).min(self.counter_range() - 1)
        };
        StateComponents {
            pity: 0,
            guaranteed: true,
            radiance,
        }
    }

    /// State after a target hit made from `state`. The counter resets only
    /// when the win was not already guaranteed.
    pub fn after_win(&self, state: StateComponents) -> StateComponents {
        let radiance = if state.guaranteed { state.radiance } else { 0 };
        StateComponents {
            pity: 0,
            guaranteed: false,
            radiance,
        }
    }

    /// Expected pulls for a single rarity hit from pity 0, by direct
    /// summation of the survival function. Used as a sanity reference.
    pub fn expected_pulls_per_hit(&self) -> f64 {
        let mut survival = 1.0;
        let mut expected = 0.0;
        for pity in 0..self.max_pity {
            expected += survival;
            survival *= 1.0 - self.rarity_hit_probability(pity);
        }
        expected
    }
}
