use crate::run::{simulate, RunConfig};
use rayon::prelude::*;
use ripple_core::{ConfigError, SocialGraph, TrialRng, F};
use serde::{Deserialize, Serialize};

/// Configuration for a Monte Carlo sequence of independent runs.
#[derive(Clone, Debug)]
pub struct SequenceConfig {
    pub run: RunConfig,
    /// Number of independent trials; must be at least 1.
    pub trials: usize,
}

impl SequenceConfig {
    pub fn new(steps: usize, trials: usize) -> Self {
        Self {
            run: RunConfig::new(steps),
            trials,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.run.validate()?;
        if self.trials == 0 {
            return Err(ConfigError::EmptySequence);
        }
        Ok(())
    }
}

/// Per-trial increments and their mean, the de-noised diffusion score.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SequenceOutcome {
    pub trial_increments: Vec<F>,
    pub mean_increment: F,
}

/// Run `cfg.trials` independent trials and average their diffusion
/// rates. Every trial mutates its own private copy of `graph`, taken
/// before any randomness is drawn; the caller's graph is never touched.
///
/// Trials run in parallel, each with a generator derived from
/// `(seed, trial_id)`, so the outcome is identical for any rayon thread
/// count.
pub fn simulate_sequence(
    graph: &SocialGraph,
    cfg: &SequenceConfig,
    seed: u64,
) -> Result<SequenceOutcome, ConfigError> {
    cfg.validate()?;

    let trial_increments: Vec<F> = (0..cfg.trials)
        .into_par_iter()
        .map(|trial| {
            let mut local = graph.clone();
            let mut rng = TrialRng::for_trial(seed, trial as u64);
            simulate(&mut local, &cfg.run, &mut rng).map(|out| out.avg_increment)
        })
        .collect::<Result<_, _>>()?;

    let mean_increment = trial_increments.iter().sum::<F>() / trial_increments.len() as F;

    Ok(SequenceOutcome {
        trial_increments,
        mean_increment,
    })
}
