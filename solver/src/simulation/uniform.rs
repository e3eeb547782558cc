//! Uniform [0, 1) draws for the simulator.
//!
//! The simulator only sees [`UniformSource`]. [`BufferedUniform`] fills a
//! fixed-size buffer from any `rand` generator and serves draws from it,
//! refilling the whole buffer when it runs dry. The buffer size is a
//! caller-chosen parameter (see `SimulationConfig::buffer_size`).

use rand::Rng;

pub trait UniformSource {
    fn next_uniform(&mut self) -> f64;
}

pub struct BufferedUniform<R: Rng> {
    rng: R,
    buffer: Vec<f64>,
    cursor: usize,
    refills: u64,
}

impl<R: Rng> BufferedUniform<R> {
    pub fn new(rng: R, buffer_size: usize) -> Self {
        let size = buffer_size.max(1);
        Self {
            rng,
            buffer: vec![0.0; size],
            cursor: size,
            refills: 0,
        }
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    /// Number of times the buffer has been regenerated.
    pub fn refills(&self) -> u64 {
        self.refills
    }

    fn refill(&mut self) {
        for slot in self.buffer.iter_mut() {
            *slot = self.rng.random::<f64>();
        }
        self.cursor = 0;
        self.refills += 1;
    }
}

impl<R: Rng> UniformSource for BufferedUniform<R> {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        if self.cursor == self.buffer.len() {
            self.refill();
        }
        let u = self.buffer[self.cursor];
        self.cursor += 1;
        u
    }
}
