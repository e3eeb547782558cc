//! SplitMix64: single-word PRNG used to fan one master seed out into
//! independent per-worker seeds, and as a cheap unbuffered uniform source.

use super::uniform::UniformSource;

#[derive(Clone)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    #[inline(always)]
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline(always)]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }

    /// Uniform in [0, 1) from the top 53 bits.
    #[inline(always)]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

impl UniformSource for SplitMix64 {
    #[inline(always)]
    fn next_uniform(&mut self) -> f64 {
        self.next_f64()
    }
}

/// `count` stream seeds derived from `master`. Stream `i` depends only on
/// `master` and `i`, never on how work is scheduled.
pub fn derive_seeds(master: u64, count: usize) -> Vec<u64> {
    let mut sm = SplitMix64::new(master);
    (0..count).map(|_| sm.next_u64()).collect()
}
