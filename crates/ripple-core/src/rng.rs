use crate::{F, NodeId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::{Distribution, Uniform};

/// Derive an independent stream seed from a global seed and a stream id.
///
/// Splitmix-style finalizer: plain `seed + id * phi` would make nested
/// streams collide (trial t of stream s equals trial t-1 of stream s+1).
pub fn stream_seed(global_seed: u64, stream_id: u64) -> u64 {
    let mut z = global_seed.wrapping_add(stream_id.wrapping_mul(0x9e3779b97f4a7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Seedable uniform-draw source threaded through every stochastic
/// operation. Each trial owns its own generator so results are
/// reproducible regardless of scheduling.
pub struct TrialRng {
    rng: ChaCha20Rng,
    unit: Uniform<F>,
}

impl TrialRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            unit: Uniform::new(0.0, 1.0),
        }
    }

    /// Generator for trial `trial_id` of a run with `global_seed`.
    pub fn for_trial(global_seed: u64, trial_id: u64) -> Self {
        Self::new(stream_seed(global_seed, trial_id))
    }

    /// One uniform draw in [0, 1).
    pub fn draw(&mut self) -> F {
        self.unit.sample(&mut self.rng)
    }

    /// Fresh seed for a nested stochastic stage.
    pub fn derive_seed(&mut self) -> u64 {
        self.rng.gen()
    }

    /// Sample `k` distinct ids uniformly without replacement from
    /// `0..population`.
    pub fn sample_distinct(&mut self, population: usize, k: usize) -> Vec<NodeId> {
        rand::seq::index::sample(&mut self.rng, population, k).into_vec()
    }
}
