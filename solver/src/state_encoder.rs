//! Mixed-radix state indexing.
//!
//! `index = pity + guaranteed * P + radiance * P * 2` with `P = max_pity`,
//! a bijection onto `[0, total_states)`. Radices come from the pool's rules,
//! so a counterless pool has radiance radix 1 and `2 * P` states.

use crate::pool_rules::PoolRules;
use crate::types::StateComponents;

/// Guarantee flag takes two values.
const GUARANTEE_RANGE: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateSpace {
    pub pity_range: usize,
    pub counter_range: usize,
}

impl StateSpace {
    pub fn for_rules(rules: &PoolRules) -> Self {
        StateSpace {
            pity_range: rules.max_pity,
            counter_range: rules.counter_range(),
        }
    }

    #[inline]
    pub fn total_states(&self) -> usize {
        self.pity_range * GUARANTEE_RANGE * self.counter_range
    }

    /// Whether every component is inside its radix.
    #[inline]
    pub fn contains(&self, s: StateComponents) -> bool {
        s.pity < self.pity_range && s.radiance < self.counter_range
    }

    #[inline(always)]
    pub fn encode(&self, s: StateComponents) -> usize {
        debug_assert!(self.contains(s), "state {s:?} outside {self:?}");
        s.pity
            + (s.guaranteed as usize) * self.pity_range
            + s.radiance * self.pity_range * GUARANTEE_RANGE
    }

    #[inline(always)]
    pub fn decode(&self, index: usize) -> StateComponents {
        debug_assert!(index < self.total_states());
        let stride = self.pity_range * GUARANTEE_RANGE;
        StateComponents {
            pity: index % self.pity_range,
            guaranteed: (index % stride) / self.pity_range == 1,
            radiance: index / stride,
        }
    }

    /// Index of a fresh search carrying `radiance`.
    #[inline]
    pub fn zero_state(&self, radiance: usize) -> usize {
        self.encode(StateComponents::fresh(radiance))
    }
}
