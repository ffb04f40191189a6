use clap::Parser;
use ripple_io::cli::{run_score_command, run_search_command, run_simulate_command, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { opts, seeds } => run_simulate_command(opts, seeds)?,
        Commands::Search {
            opts,
            k,
            iterations,
            log_every,
        } => run_search_command(opts, k, iterations, log_every)?,
        Commands::Score { opts } => run_score_command(opts)?,
    }

    Ok(())
}
