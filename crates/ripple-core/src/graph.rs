use crate::{F, NodeId};
use serde::{Deserialize, Serialize};

/// Traits and weights live in (0, 1]; exact zeros are clamped to this
/// epsilon so they stay usable as multiplicative probability factors.
pub const TRAIT_EPS: F = 1e-6;

fn clamp_unit(x: F) -> F {
    if x.is_nan() || x <= 0.0 {
        TRAIT_EPS
    } else if x > 1.0 {
        1.0
    } else {
        x
    }
}

/// Engagement updates are rounded to a fixed precision to keep values
/// numerically stable across many reinforcement steps.
pub(crate) fn round_trait(x: F) -> F {
    (x * 1e6).round() / 1e6
}

/// Binary awareness state of an actor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeState {
    Unaware,
    Aware,
}

/// One actor: awareness state plus three scalar traits in (0, 1].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub state: NodeState,
    receptiveness: F,
    extraversion: F,
    engagement: F,
}

impl Node {
    pub fn new(receptiveness: F, extraversion: F, engagement: F) -> Self {
        Self {
            state: NodeState::Unaware,
            receptiveness: clamp_unit(receptiveness),
            extraversion: clamp_unit(extraversion),
            engagement: clamp_unit(engagement),
        }
    }

    pub fn receptiveness(&self) -> F {
        self.receptiveness
    }

    pub fn extraversion(&self) -> F {
        self.extraversion
    }

    pub fn engagement(&self) -> F {
        self.engagement
    }

    pub fn set_receptiveness(&mut self, v: F) {
        self.receptiveness = clamp_unit(v);
    }

    pub fn set_extraversion(&mut self, v: F) {
        self.extraversion = clamp_unit(v);
    }

    pub fn set_engagement(&mut self, v: F) {
        self.engagement = clamp_unit(v);
    }

    /// Multiplicative engagement update used by the sweep. The
    /// oblivion-recovery path caps at 1.0; the reinforcement path for
    /// already-aware actors deliberately does not.
    pub(crate) fn reinforce_engagement(&mut self, factor: F, cap: bool) {
        let mut e = self.engagement * factor;
        if cap {
            e = e.min(1.0);
        }
        self.engagement = round_trait(e);
    }

    pub fn is_aware(&self) -> bool {
        self.state == NodeState::Aware
    }
}

/// Undirected weighted edge between actors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub u: NodeId,
    pub v: NodeId,
    pub weight: F,
}

impl Edge {
    pub fn new(u: NodeId, v: NodeId, weight: F) -> Self {
        Self {
            u,
            v,
            weight: clamp_unit(weight),
        }
    }
}

/// Weighted undirected social graph with cached adjacency lists.
///
/// The graph is simple: self-loops and edges with out-of-range endpoints
/// are dropped at construction. `Clone` is the deep copy used by the
/// copy-per-trial rule; one trial's mutations never reach another trial
/// or the caller's original graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SocialGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    adjacency: Vec<Vec<(NodeId, F)>>,
}

impl SocialGraph {
    pub fn new(nodes: Vec<Node>, mut edges: Vec<Edge>) -> Self {
        // Keep the stored edge list in agreement with the effective
        // topology: self-loops and out-of-range endpoints are dropped
        // here, not just skipped when building adjacency.
        let n = nodes.len();
        edges.retain(|e| e.u < n && e.v < n && e.u != e.v);
        let mut g = Self {
            nodes,
            edges,
            adjacency: Vec::new(),
        };
        g.build_adjacency();
        g
    }

    /// Ring of `n` actors with uniform traits and edge weights. Handy for
    /// demos and tests; real graphs come from an external initializer.
    pub fn ring(n: usize, weight: F) -> Self {
        let nodes = (0..n).map(|_| Node::new(0.5, 0.5, 0.5)).collect();
        let edges = (0..n).map(|i| Edge::new(i, (i + 1) % n, weight)).collect();
        Self::new(nodes, edges)
    }

    fn build_adjacency(&mut self) {
        let mut adj = vec![Vec::new(); self.nodes.len()];
        for edge in &self.edges {
            adj[edge.u].push((edge.v, edge.weight));
            adj[edge.v].push((edge.u, edge.weight));
        }
        self.adjacency = adj;
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_ids(&self) -> std::ops::Range<NodeId> {
        0..self.nodes.len()
    }

    /// Neighbors of `u` with edge weights.
    pub fn neighbors(&self, u: NodeId) -> &[(NodeId, F)] {
        self.adjacency
            .get(u)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn edge_weight(&self, u: NodeId, v: NodeId) -> Option<F> {
        self.neighbors(u)
            .iter()
            .find(|&&(m, _)| m == v)
            .map(|&(_, w)| w)
    }

    pub fn aware_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_aware()).count()
    }

    /// Revert every actor to Unaware. Traits are left as-is.
    pub fn reset_states(&mut self) {
        for node in &mut self.nodes {
            node.state = NodeState::Unaware;
        }
    }

    /// Mark the given ids as the initial Aware population.
    pub fn seed_aware(&mut self, ids: &[NodeId]) {
        for &id in ids {
            if id < self.nodes.len() {
                self.nodes[id].state = NodeState::Aware;
            }
        }
    }
}
