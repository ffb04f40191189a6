use crate::error::ConfigError;
use crate::graph::SocialGraph;
use crate::{F, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Caller-supplied transmission-probability function of
/// (graph, sender, receiver).
pub type CustomKernel = Arc<dyn Fn(&SocialGraph, NodeId, NodeId) -> F + Send + Sync>;

/// Kernel selector as it appears on configuration surfaces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KernelKind {
    Weights,
    Were,
    Custom,
}

/// Transmission-probability kernel for one directed edge traversal
/// (sender Aware, receiver Unaware). Resolved once per simulation
/// configuration, not re-branched by name on every edge visit.
#[derive(Clone)]
pub enum Kernel {
    /// p = weight(sender, receiver)
    Weights,
    /// p = weight * receptiveness(receiver) * engagement(receiver)
    ///       * extraversion(sender) * multiplier
    ///
    /// No clamping: a product above 1.0 is treated as certainty by the
    /// Bernoulli draw. Callers own the sanity of their multipliers.
    Were { multiplier: F },
    Custom(CustomKernel),
}

impl Kernel {
    /// Default scaling for the WERE kernel.
    pub const DEFAULT_WERE_MULTIPLIER: F = 10.0;

    /// Resolve a kernel kind into a kernel. `Custom` without a function
    /// is a configuration error.
    pub fn from_kind(
        kind: KernelKind,
        multiplier: F,
        custom: Option<CustomKernel>,
    ) -> Result<Self, ConfigError> {
        match kind {
            KernelKind::Weights => Ok(Kernel::Weights),
            KernelKind::Were => Ok(Kernel::Were { multiplier }),
            KernelKind::Custom => custom
                .map(Kernel::Custom)
                .ok_or(ConfigError::MissingCustomKernel),
        }
    }

    /// Probability that `receiver` internalizes the information passed
    /// by `sender` over an edge of the given weight.
    pub fn probability(
        &self,
        graph: &SocialGraph,
        sender: NodeId,
        receiver: NodeId,
        weight: F,
    ) -> F {
        match self {
            Kernel::Weights => weight,
            Kernel::Were { multiplier } => {
                weight
                    * graph.node(receiver).receptiveness()
                    * graph.node(receiver).engagement()
                    * graph.node(sender).extraversion()
                    * multiplier
            }
            Kernel::Custom(f) => f(graph, sender, receiver),
        }
    }

    pub fn kind(&self) -> KernelKind {
        match self {
            Kernel::Weights => KernelKind::Weights,
            Kernel::Were { .. } => KernelKind::Were,
            Kernel::Custom(_) => KernelKind::Custom,
        }
    }
}

impl fmt::Debug for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kernel::Weights => write!(f, "Weights"),
            Kernel::Were { multiplier } => {
                f.debug_struct("Were").field("multiplier", multiplier).finish()
            }
            Kernel::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Kernel::Weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Node, SocialGraph};
    use approx::assert_relative_eq;

    fn two_node_graph() -> SocialGraph {
        let nodes = vec![Node::new(0.3, 0.8, 0.5), Node::new(0.4, 0.2, 0.6)];
        let edges = vec![Edge::new(0, 1, 0.7)];
        SocialGraph::new(nodes, edges)
    }

    #[test]
    fn weights_kernel_is_edge_weight() {
        let g = two_node_graph();
        let k = Kernel::Weights;
        assert_relative_eq!(k.probability(&g, 0, 1, 0.7), 0.7);
    }

    #[test]
    fn were_kernel_multiplies_traits() {
        let g = two_node_graph();
        let k = Kernel::Were { multiplier: 10.0 };
        // weight * recept(1) * engage(1) * extra(0) * mult
        let expected = 0.7 * 0.4 * 0.6 * 0.8 * 10.0;
        assert_relative_eq!(k.probability(&g, 0, 1, 0.7), expected);
        // Products above 1.0 are returned as-is (certainty for the draw).
        assert!(expected > 1.0);
    }

    #[test]
    fn custom_kernel_delegates() {
        let g = two_node_graph();
        let k = Kernel::from_kind(
            KernelKind::Custom,
            1.0,
            Some(Arc::new(|_g: &SocialGraph, s, r| (s + r) as F * 0.1)),
        )
        .unwrap();
        assert_relative_eq!(k.probability(&g, 0, 1, 0.7), 0.1);
    }

    #[test]
    fn custom_without_function_is_config_error() {
        let err = Kernel::from_kind(KernelKind::Custom, 1.0, None).unwrap_err();
        assert_eq!(err, ConfigError::MissingCustomKernel);
    }
}
