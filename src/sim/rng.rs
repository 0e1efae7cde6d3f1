//! Injectable random source
//!
//! Every procedural draw (spawn rolls, shooter jitter, particle spread) goes
//! through one generator owned by the run, so a seed plus an input sequence
//! reproduces a run exactly.

use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform draws used by the simulation
pub trait RandomSource {
    /// Uniform value in [0, 1)
    fn unit(&mut self) -> f32;

    /// Uniform value in [min, max)
    fn range(&mut self, min: f32, max: f32) -> f32 {
        self.unit() * (max - min) + min
    }
}

impl<R: RngCore> RandomSource for R {
    fn unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Build the per-run generator for a seed
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Replays a fixed list of unit draws, cycling when exhausted
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    values: Vec<f32>,
    cursor: usize,
}

#[cfg(test)]
impl ScriptedRng {
    pub fn new(values: &[f32]) -> Self {
        Self {
            values: values.to_vec(),
            cursor: 0,
        }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRng {
    fn unit(&mut self) -> f32 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
