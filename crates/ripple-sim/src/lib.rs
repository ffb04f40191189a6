pub mod run;
pub mod scores;
pub mod sequence;

pub use run::{simulate, simulate_observed, RunConfig, RunOutcome};
pub use scores::node_scores;
pub use sequence::{simulate_sequence, SequenceConfig, SequenceOutcome};
