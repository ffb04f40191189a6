use thiserror::Error;

/// Configuration errors, surfaced before any randomized work starts.
///
/// There is no transient-failure notion in this engine, so nothing is
/// retried and nothing is silently recovered. The one soft policy is
/// kernel probabilities above 1.0, which the Bernoulli draw treats as
/// certainty (see [`crate::Kernel`]).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("custom kernel selected but no kernel function supplied")]
    MissingCustomKernel,

    #[error("simulation horizon must be at least one step")]
    ZeroHorizon,

    #[error("sequence length must be at least one trial")]
    EmptySequence,

    #[error("random search needs at least one iteration")]
    NoIterations,

    #[error("seed set must contain at least one node")]
    EmptySeedSet,

    #[error("seed set of {requested} nodes exceeds population of {population}")]
    SeedSetTooLarge { requested: usize, population: usize },

    #[error("graph has no nodes")]
    EmptyGraph,
}
