//! Reward-currency ("returns") accounting for pools that have one.
//!
//! A [`RewardLedger`] lives for one trial and is carried across all of the
//! trial's targets. It owns the 4★ track (`pity4`, 4★ guarantee) and the
//! copy counters that decide how much each duplicate is worth. Nothing here
//! feeds back into the 5★ process.

use crate::constants::*;
use crate::pool_rules::LowerRarityRules;

use super::uniform::UniformSource;

pub struct RewardLedger {
    rules: LowerRarityRules,
    up4_c6: bool,
    pity4: u32,
    guaranteed4: bool,
    target_copies: u32,
    standard_copies: Vec<u32>,
}

impl RewardLedger {
    pub fn new(rules: LowerRarityRules, up4_c6: bool) -> Self {
        Self {
            rules,
            up4_c6,
            pity4: 0,
            guaranteed4: false,
            target_copies: 0,
            standard_copies: vec![0; rules.standard_characters as usize],
        }
    }

    #[cfg(test)]
    pub(crate) fn pity4(&self) -> u32 {
        self.pity4
    }

    #[cfg(test)]
    pub(crate) fn target_copies(&self) -> u32 {
        self.target_copies
    }

    /// Called on every pull, before the 5★ roll.
    #[inline]
    pub fn advance(&mut self) {
        self.pity4 += 1;
    }

    /// Return for a 5★ hit; resets the 4★ track.
    pub fn on_five_star(&mut self, is_target: bool) -> f64 {
        self.pity4 = 0;
        if !is_target {
            return FIVE_STAR_RETURN;
        }
        self.target_copies += 1;
        if self.target_copies <= FIVE_STAR_COPY_LIMIT {
            FIVE_STAR_RETURN
        } else {
            FIVE_STAR_SATURATED_RETURN
        }
    }

    /// Resolve the 4★ sub-roll on a pull that missed the 5★ with probability
    /// `p5`. Returns the reward earned (0 when no 4★ drops).
    pub fn on_five_star_miss<U: UniformSource>(&mut self, p5: f64, rng: &mut U) -> f64 {
        let forced = self.pity4 >= self.rules.max_pity;
        if !forced {
            let denominator = if p5 < 1.0 { 1.0 - p5 } else { FOUR_STAR_HARD_PITY_DENOMINATOR };
            if rng.next_uniform() >= self.rules.rate / denominator {
                return 0.0;
            }
        }
        self.resolve_four_star(rng)
    }

    fn resolve_four_star<U: UniformSource>(&mut self, rng: &mut U) -> f64 {
        self.pity4 = 0;
        if self.guaranteed4 || rng.next_uniform() < self.rules.rate_up_chance {
            self.guaranteed4 = false;
            return if self.up4_c6 { FOUR_STAR_UP_C6_RETURN } else { FOUR_STAR_UP_RETURN };
        }

        self.guaranteed4 = true;
        let characters = self.rules.standard_characters;
        let pool_size = characters + self.rules.standard_weapons;
        if rng.next_uniform() >= characters as f64 / pool_size as f64 {
            return FOUR_STAR_WEAPON_RETURN;
        }
        let which = ((rng.next_uniform() * characters as f64) as usize).min(characters as usize - 1);
        let copies = &mut self.standard_copies[which];
        *copies += 1;
        match *copies {
            1 => 0.0,
            c if c <= FOUR_STAR_COPY_LIMIT => FOUR_STAR_REPEAT_RETURN,
            _ => FOUR_STAR_SATURATED_RETURN,
        }
    }
}
