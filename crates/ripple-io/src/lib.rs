use ripple_core::{Edge, Node, NodeState, SocialGraph, F};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

pub mod cli;
pub use cli::*;

/// JSON schema for graphs produced by an external initializer.
///
/// ```json
/// {
///   "nodes": [{"receptiveness": 0.4, "extraversion": 0.7, "engagement": 0.5, "aware": false}],
///   "edges": [{"u": 0, "v": 1, "weight": 0.8}]
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphFile {
    pub nodes: Vec<NodeSpec>,
    pub edges: Vec<EdgeSpec>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeSpec {
    pub receptiveness: F,
    pub extraversion: F,
    pub engagement: F,
    #[serde(default)]
    pub aware: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub u: usize,
    pub v: usize,
    pub weight: F,
}

impl GraphFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn into_graph(self) -> SocialGraph {
        let aware: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.aware)
            .map(|(i, _)| i)
            .collect();
        let nodes = self
            .nodes
            .into_iter()
            .map(|n| Node::new(n.receptiveness, n.extraversion, n.engagement))
            .collect();
        let edges = self
            .edges
            .into_iter()
            .map(|e| Edge::new(e.u, e.v, e.weight))
            .collect();
        let mut graph = SocialGraph::new(nodes, edges);
        graph.seed_aware(&aware);
        graph
    }

    pub fn from_graph(graph: &SocialGraph) -> Self {
        let nodes = graph
            .nodes()
            .iter()
            .map(|n| NodeSpec {
                receptiveness: n.receptiveness(),
                extraversion: n.extraversion(),
                engagement: n.engagement(),
                aware: n.state == NodeState::Aware,
            })
            .collect();
        let edges = graph
            .node_ids()
            .flat_map(|u| {
                graph
                    .neighbors(u)
                    .iter()
                    .filter(move |&&(v, _)| u < v)
                    .map(move |&(v, weight)| EdgeSpec { u, v, weight })
            })
            .collect();
        Self { nodes, edges }
    }
}

/// Load a graph file and apply its `aware` flags as the initial seeds.
pub fn load_graph(path: &Path) -> anyhow::Result<SocialGraph> {
    Ok(GraphFile::load(path)?.into_graph())
}

/// Run manifest written next to results for reproducibility.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: String,
    pub timestamp: String,
    pub command: String,
    pub seed: u64,
    pub kernel: String,
    pub were_multiplier: F,
    pub oblivion: bool,
    pub engagement_enforcement: F,
    pub steps: usize,
    pub trials: usize,
    pub iterations: Option<usize>,
    pub seed_count: Option<usize>,
    pub n_nodes: usize,
    pub n_edges: usize,
}

impl RunManifest {
    /// Manifest with identity and graph shape filled in; the command
    /// handlers fill the parameter echo before writing.
    pub fn new(command: &str, seed: u64, kernel: &str, graph: &SocialGraph) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            command: command.to_string(),
            seed,
            kernel: kernel.to_string(),
            were_multiplier: 0.0,
            oblivion: false,
            engagement_enforcement: 1.0,
            steps: 0,
            trials: 0,
            iterations: None,
            seed_count: None,
            n_nodes: graph.num_nodes(),
            n_edges: graph.num_edges(),
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
