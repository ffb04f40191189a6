use ripple_core::{sweep, ConfigError, SocialGraph, StepConfig, StepSnapshot, TrialRng, F};
use serde::{Deserialize, Serialize};

/// Configuration for one multi-step run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Simulation horizon in sweeps; must be at least 1.
    pub steps: usize,
    pub step: StepConfig,
}

impl RunConfig {
    pub fn new(steps: usize) -> Self {
        Self {
            steps,
            step: StepConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps == 0 {
            return Err(ConfigError::ZeroHorizon);
        }
        Ok(())
    }
}

/// Snapshot trail plus the scalar diffusion-rate metric of one run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunOutcome {
    /// `steps + 1` snapshots: one before any sweep, one after each.
    pub snapshots: Vec<StepSnapshot>,
    /// (aware(last) - aware(first)) / steps.
    pub avg_increment: F,
}

impl RunOutcome {
    pub fn initial_aware(&self) -> usize {
        self.snapshots.first().map_or(0, StepSnapshot::aware_count)
    }

    pub fn final_aware(&self) -> usize {
        self.snapshots.last().map_or(0, StepSnapshot::aware_count)
    }
}

/// Apply the sweep `cfg.steps` times, recording a snapshot before any
/// sweep and after each one. Mutates `graph` in place; sequence-level
/// callers hand in a private copy.
pub fn simulate(
    graph: &mut SocialGraph,
    cfg: &RunConfig,
    rng: &mut TrialRng,
) -> Result<RunOutcome, ConfigError> {
    simulate_observed(graph, cfg, rng, |_, _| {})
}

/// Like [`simulate`], invoking `observe(step_index, graph)` after every
/// sweep. The hook is a visualization/instrumentation seam and has no
/// effect on the algorithm.
pub fn simulate_observed(
    graph: &mut SocialGraph,
    cfg: &RunConfig,
    rng: &mut TrialRng,
    mut observe: impl FnMut(usize, &SocialGraph),
) -> Result<RunOutcome, ConfigError> {
    cfg.validate()?;

    let mut snapshots = Vec::with_capacity(cfg.steps + 1);
    snapshots.push(StepSnapshot::capture(graph));

    for step in 0..cfg.steps {
        sweep(graph, &cfg.step, rng);
        snapshots.push(StepSnapshot::capture(graph));
        observe(step, graph);
    }

    let first = snapshots[0].aware_count() as F;
    let last = snapshots[cfg.steps].aware_count() as F;
    let avg_increment = (last - first) / cfg.steps as F;

    Ok(RunOutcome {
        snapshots,
        avg_increment,
    })
}
