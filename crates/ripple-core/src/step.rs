use crate::graph::{NodeState, SocialGraph};
use crate::kernel::Kernel;
use crate::rng::TrialRng;
use crate::F;

/// Smoothing added to neighbor-class counts so the oblivion factor is
/// defined for nodes with no neighbors of one class.
const OBLIVION_EPS: F = 1e-4;

/// Which awareness states the propagation phase reads.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SweepSemantics {
    /// Propagation reads live mutated state: a node awakened earlier in
    /// the same sweep transmits in that sweep. Order dependent by
    /// design; this matches the historical behavior.
    Live,
    /// The sender set is frozen after the oblivion phase; nodes
    /// awakened during propagation wait until the next sweep.
    Frozen,
}

/// Configuration for one simulation sweep.
#[derive(Clone, Debug)]
pub struct StepConfig {
    pub kernel: Kernel,
    /// Enable probabilistic reversion of Aware nodes back to Unaware.
    pub oblivion: bool,
    /// Multiplicative engagement reinforcement; 1.0 disables it.
    pub engagement_enforcement: F,
    pub semantics: SweepSemantics,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            kernel: Kernel::Weights,
            oblivion: false,
            engagement_enforcement: 1.0,
            semantics: SweepSemantics::Live,
        }
    }
}

/// One synchronous round of oblivion + propagation + engagement
/// reinforcement over all nodes, mutating the graph in place.
///
/// Draw order is part of the determinism contract: the oblivion phase
/// takes two uniforms per Aware node in index order, then the
/// propagation phase takes one uniform per Unaware neighbor visited, in
/// index x adjacency order.
pub fn sweep(graph: &mut SocialGraph, cfg: &StepConfig, rng: &mut TrialRng) {
    if cfg.oblivion {
        oblivion_phase(graph, cfg, rng);
    }

    // In frozen mode the sender set is fixed after oblivion, so a node
    // awakened below cannot transmit until the next sweep.
    let frozen: Option<Vec<bool>> = match cfg.semantics {
        SweepSemantics::Live => None,
        SweepSemantics::Frozen => {
            Some(graph.nodes().iter().map(|n| n.is_aware()).collect())
        }
    };

    for n in graph.node_ids() {
        let sending = match &frozen {
            Some(aware) => aware[n],
            None => graph.node(n).is_aware(),
        };
        if !sending {
            continue;
        }

        let neighbors: Vec<(usize, F)> = graph.neighbors(n).to_vec();
        for (m, weight) in neighbors {
            if graph.node(m).state == NodeState::Unaware {
                let p = cfg.kernel.probability(graph, n, m, weight);
                if rng.draw() < p {
                    graph.node_mut(m).state = NodeState::Aware;
                }
            } else {
                // Reinforcement while already aware; distinct from the
                // capped oblivion-recovery update.
                graph
                    .node_mut(m)
                    .reinforce_engagement(cfg.engagement_enforcement, false);
            }
        }
    }
}

/// An Aware node forgets with probability proportional to the unaware
/// share of its neighborhood, scaled by a fresh uniform draw.
fn oblivion_phase(graph: &mut SocialGraph, cfg: &StepConfig, rng: &mut TrialRng) {
    for n in graph.node_ids() {
        if !graph.node(n).is_aware() {
            continue;
        }

        let aware = graph
            .neighbors(n)
            .iter()
            .filter(|&&(m, _)| graph.node(m).is_aware())
            .count() as F;
        let unaware = graph.neighbors(n).len() as F - aware;

        let oblivion_factor =
            (unaware + OBLIVION_EPS) / ((aware + OBLIVION_EPS) + (unaware + OBLIVION_EPS));
        let oblivion_prob = oblivion_factor * rng.draw();

        if rng.draw() < oblivion_prob {
            let node = graph.node_mut(n);
            node.state = NodeState::Unaware;
            node.reinforce_engagement(cfg.engagement_enforcement, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Node, SocialGraph};
    use crate::snapshot::StepSnapshot;

    fn line(weights: F) -> SocialGraph {
        let nodes = (0..3).map(|_| Node::new(0.5, 0.5, 0.5)).collect();
        let edges = vec![Edge::new(0, 1, weights), Edge::new(1, 2, weights)];
        SocialGraph::new(nodes, edges)
    }

    #[test]
    fn certain_weight_propagates() {
        let mut g = line(1.0);
        g.seed_aware(&[0]);
        let mut rng = TrialRng::new(1);
        sweep(&mut g, &StepConfig::default(), &mut rng);
        assert!(g.node(1).is_aware());
    }

    #[test]
    fn live_semantics_chain_within_one_sweep() {
        // Node 1 wakes when the sweep visits node 0, then transmits to
        // node 2 in the same sweep because live state is read.
        let mut g = line(1.0);
        g.seed_aware(&[0]);
        let mut rng = TrialRng::new(1);
        sweep(&mut g, &StepConfig::default(), &mut rng);
        assert_eq!(g.aware_count(), 3);
    }

    #[test]
    fn frozen_semantics_stop_the_chain() {
        let mut g = line(1.0);
        g.seed_aware(&[0]);
        let cfg = StepConfig {
            semantics: SweepSemantics::Frozen,
            ..StepConfig::default()
        };
        let mut rng = TrialRng::new(1);
        sweep(&mut g, &cfg, &mut rng);
        assert!(g.node(1).is_aware());
        assert!(!g.node(2).is_aware());
    }

    #[test]
    fn epsilon_weight_never_propagates() {
        let mut g = line(0.0); // clamped to epsilon
        g.seed_aware(&[0]);
        let mut rng = TrialRng::new(9);
        for _ in 0..50 {
            sweep(&mut g, &StepConfig::default(), &mut rng);
        }
        assert_eq!(g.aware_count(), 1);
    }

    #[test]
    fn aware_is_sticky_without_oblivion() {
        let mut g = SocialGraph::ring(8, 0.5);
        g.seed_aware(&[0, 3]);
        let mut rng = TrialRng::new(5);
        let mut previous = g.aware_count();
        for _ in 0..20 {
            sweep(&mut g, &StepConfig::default(), &mut rng);
            let current = g.aware_count();
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn oblivion_keeps_engagement_in_unit_interval() {
        let mut g = SocialGraph::ring(10, 0.8);
        g.seed_aware(&[0, 1, 2, 3, 4]);
        let cfg = StepConfig {
            oblivion: true,
            engagement_enforcement: 1.5,
            ..StepConfig::default()
        };
        let mut rng = TrialRng::new(11);
        for _ in 0..40 {
            sweep(&mut g, &cfg, &mut rng);
            for id in g.node_ids() {
                // Recovery updates are capped; reinforcement of aware
                // nodes is not, but oblivion recoveries must never
                // leave engagement above 1.0 on the flipped node.
                if !g.node(id).is_aware() {
                    assert!(g.node(id).engagement() <= 1.0);
                }
                assert!(g.node(id).engagement() > 0.0);
            }
        }
    }

    #[test]
    fn reinforcement_raises_engagement_of_aware_neighbor() {
        // Both endpoints aware: each visit multiplies the other's
        // engagement by the enforcement factor.
        let nodes = vec![Node::new(0.5, 0.5, 0.5), Node::new(0.5, 0.5, 0.5)];
        let edges = vec![Edge::new(0, 1, 0.5)];
        let mut g = SocialGraph::new(nodes, edges);
        g.seed_aware(&[0, 1]);
        let cfg = StepConfig {
            engagement_enforcement: 1.01,
            ..StepConfig::default()
        };
        let mut rng = TrialRng::new(2);
        sweep(&mut g, &cfg, &mut rng);
        assert!(g.node(0).engagement() > 0.5);
        assert!(g.node(1).engagement() > 0.5);
    }

    #[test]
    fn identical_seed_identical_sweep() {
        let mut a = SocialGraph::ring(16, 0.4);
        a.seed_aware(&[0, 5]);
        let mut b = a.clone();
        let cfg = StepConfig {
            oblivion: true,
            engagement_enforcement: 1.01,
            ..StepConfig::default()
        };

        let mut rng_a = TrialRng::new(77);
        let mut rng_b = TrialRng::new(77);
        for _ in 0..10 {
            sweep(&mut a, &cfg, &mut rng_a);
            sweep(&mut b, &cfg, &mut rng_b);
        }
        assert_eq!(StepSnapshot::capture(&a), StepSnapshot::capture(&b));
    }
}
