use crate::graph::{NodeState, SocialGraph};
use crate::F;
use serde::{Deserialize, Serialize};

/// Per-node record inside a snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub state: NodeState,
    pub receptiveness: F,
    pub extraversion: F,
    pub engagement: F,
}

/// Immutable capture of all node states and traits at one simulation
/// instant. Used for before/after aware-count comparison and external
/// inspection; never mutated after capture.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepSnapshot {
    nodes: Vec<NodeRecord>,
}

impl StepSnapshot {
    pub fn capture(graph: &SocialGraph) -> Self {
        let nodes = graph
            .nodes()
            .iter()
            .map(|n| NodeRecord {
                state: n.state,
                receptiveness: n.receptiveness(),
                extraversion: n.extraversion(),
                engagement: n.engagement(),
            })
            .collect();
        Self { nodes }
    }

    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn aware_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.state == NodeState::Aware)
            .count()
    }
}
