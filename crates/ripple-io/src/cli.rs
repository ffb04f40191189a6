use crate::{load_graph, RunManifest};
use clap::{Args, Parser, Subcommand, ValueEnum};
use ripple_core::{Kernel, KernelKind, StepConfig, SweepSemantics};
use ripple_search::{random_search, SearchConfig};
use ripple_sim::{node_scores, simulate_sequence, SequenceConfig};
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "ripple")]
#[command(about = "RIPPLE - Randomized Information Propagation Engine")]
#[command(long_about = "Stochastic information-diffusion simulation on weighted social graphs, \
                        with random-search seed optimization")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score one seed configuration with a Monte Carlo sequence
    Simulate {
        #[command(flatten)]
        opts: SimOpts,

        /// Extra node ids to seed Aware, on top of the graph file's flags
        #[arg(long, value_delimiter = ',')]
        seeds: Vec<usize>,
    },

    /// Random-search for the best seed set of size k
    Search {
        #[command(flatten)]
        opts: SimOpts,

        /// Seed-set cardinality
        #[arg(short, long)]
        k: usize,

        /// Random-search iteration budget
        #[arg(long, default_value = "50")]
        iterations: usize,

        /// Log progress every N iterations
        #[arg(long)]
        log_every: Option<usize>,
    },

    /// Per-node diffusion scores (target variable for feature importance)
    Score {
        #[command(flatten)]
        opts: SimOpts,
    },
}

/// Simulation parameters shared by every subcommand.
#[derive(Args, Clone)]
pub struct SimOpts {
    /// Graph JSON file (external initializer output)
    #[arg(long)]
    pub graph: PathBuf,

    /// Propagation kernel
    #[arg(long, value_enum, default_value = "weights")]
    pub kernel: KernelArg,

    /// Scaling multiplier for the WERE kernel
    #[arg(long, default_value_t = Kernel::DEFAULT_WERE_MULTIPLIER)]
    pub were_multiplier: f64,

    /// Enable information oblivion
    #[arg(long)]
    pub oblivion: bool,

    /// Multiplicative engagement reinforcement (1.0 = off)
    #[arg(long, default_value = "1.0")]
    pub engagement_enforcement: f64,

    /// Freeze the sender set at sweep start instead of reading live state
    #[arg(long)]
    pub frozen: bool,

    /// Steps per simulation run
    #[arg(long, default_value = "5")]
    pub steps: usize,

    /// Simulations per Monte Carlo sequence
    #[arg(long, default_value = "10")]
    pub trials: usize,

    /// Random seed
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Write a JSON report (and a .manifest.json next to it)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum KernelArg {
    #[value(name = "weights")]
    Weights,
    #[value(name = "were")]
    Were,
}

impl KernelArg {
    fn name(&self) -> &'static str {
        match self {
            KernelArg::Weights => "weights",
            KernelArg::Were => "were",
        }
    }
}

impl From<KernelArg> for KernelKind {
    fn from(arg: KernelArg) -> Self {
        match arg {
            KernelArg::Weights => KernelKind::Weights,
            KernelArg::Were => KernelKind::Were,
        }
    }
}

impl SimOpts {
    fn sequence_config(&self) -> anyhow::Result<SequenceConfig> {
        // Custom kernels are a library-level feature; the CLI only
        // exposes the named ones, so resolution cannot miss a function.
        let kernel = Kernel::from_kind(self.kernel.clone().into(), self.were_multiplier, None)?;
        let mut cfg = SequenceConfig::new(self.steps, self.trials);
        cfg.run.step = StepConfig {
            kernel,
            oblivion: self.oblivion,
            engagement_enforcement: self.engagement_enforcement,
            semantics: if self.frozen {
                SweepSemantics::Frozen
            } else {
                SweepSemantics::Live
            },
        };
        Ok(cfg)
    }

    fn manifest(&self, command: &str, graph: &ripple_core::SocialGraph) -> RunManifest {
        let mut manifest = RunManifest::new(command, self.seed, self.kernel.name(), graph);
        manifest.were_multiplier = self.were_multiplier;
        manifest.oblivion = self.oblivion;
        manifest.engagement_enforcement = self.engagement_enforcement;
        manifest.steps = self.steps;
        manifest.trials = self.trials;
        manifest
    }

    fn write_report(&self, report: &serde_json::Value, manifest: &RunManifest) -> anyhow::Result<()> {
        if let Some(out) = &self.out {
            std::fs::write(out, serde_json::to_string_pretty(report)?)?;
            let manifest_path = out.with_extension("manifest.json");
            manifest.save_to_file(&manifest_path)?;
            info!(run_id = %manifest.run_id, report = ?out, "report written");
            println!("Wrote report to {:?}", out);
            println!("Wrote manifest to {:?}", manifest_path);
        }
        Ok(())
    }
}

pub fn run_simulate_command(opts: SimOpts, seeds: Vec<usize>) -> anyhow::Result<()> {
    let mut graph = load_graph(&opts.graph)?;
    graph.seed_aware(&seeds);

    println!("RIPPLE Simulate");
    println!("===============");
    println!("Graph: {:?} ({} nodes, {} edges)", opts.graph, graph.num_nodes(), graph.num_edges());
    println!("Kernel: {}", opts.kernel.name());
    println!("Steps: {}  Trials: {}  Seed: {}", opts.steps, opts.trials, opts.seed);
    println!("Initial aware: {}", graph.aware_count());

    let cfg = opts.sequence_config()?;
    let outcome = simulate_sequence(&graph, &cfg, opts.seed)?;

    println!();
    println!("Mean aware increment per step: {:.6}", outcome.mean_increment);

    let manifest = opts.manifest("simulate", &graph);
    let report = json!({
        "run_id": manifest.run_id,
        "mean_increment": outcome.mean_increment,
        "trial_increments": outcome.trial_increments,
    });
    opts.write_report(&report, &manifest)
}

pub fn run_search_command(
    opts: SimOpts,
    k: usize,
    iterations: usize,
    log_every: Option<usize>,
) -> anyhow::Result<()> {
    let graph = load_graph(&opts.graph)?;

    println!("RIPPLE Seed Search");
    println!("==================");
    println!("Graph: {:?} ({} nodes, {} edges)", opts.graph, graph.num_nodes(), graph.num_edges());
    println!("k: {}  Iterations: {}  Seed: {}", k, iterations, opts.seed);

    let mut cfg = SearchConfig::new(k, iterations, opts.sequence_config()?);
    cfg.log_every = log_every;
    let best = random_search(&graph, &cfg, opts.seed)?;

    println!();
    println!("Best aware increment per step: {:.6}", best.score);
    println!("Best seed set: {:?}", best.seeds);

    let mut manifest = opts.manifest("search", &graph);
    manifest.iterations = Some(iterations);
    manifest.seed_count = Some(k);
    let report = json!({
        "run_id": manifest.run_id,
        "best_score": best.score,
        "best_seeds": best.seeds,
    });
    opts.write_report(&report, &manifest)
}

pub fn run_score_command(opts: SimOpts) -> anyhow::Result<()> {
    let graph = load_graph(&opts.graph)?;

    println!("RIPPLE Node Scores");
    println!("==================");
    println!("Graph: {:?} ({} nodes, {} edges)", opts.graph, graph.num_nodes(), graph.num_edges());
    println!("Steps: {}  Trials: {}  Seed: {}", opts.steps, opts.trials, opts.seed);

    let cfg = opts.sequence_config()?;
    let scores = node_scores(&graph, &cfg, opts.seed)?;

    println!();
    for &(id, score) in &scores {
        println!("node {:>4}: {:.6}", id, score);
    }

    let manifest = opts.manifest("score", &graph);
    let report = json!({
        "run_id": manifest.run_id,
        "scores": scores.iter().map(|&(id, s)| json!({"node": id, "score": s})).collect::<Vec<_>>(),
    });
    opts.write_report(&report, &manifest)
}
