pub mod error;
pub mod graph;
pub mod kernel;
pub mod rng;
pub mod snapshot;
pub mod step;

// Core types
pub type F = f64;
pub type NodeId = usize;

pub use error::ConfigError;
pub use graph::{Edge, Node, NodeState, SocialGraph};
pub use kernel::{CustomKernel, Kernel, KernelKind};
pub use rng::{stream_seed, TrialRng};
pub use snapshot::{NodeRecord, StepSnapshot};
pub use step::{sweep, StepConfig, SweepSemantics};
