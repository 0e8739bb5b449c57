use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing::{info, Level};

mod experiment;
mod workers;

use experiment::ExperimentArgs;

/// Linea linearizability checker
/// Records histories on real concurrent containers and checks them
#[derive(Parser)]
#[command(name = "linea", version)]
#[command(about = "Linearizability checking for concurrent data structures", long_about = None)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a concurrent history and check it for linearizability
    Experiment(ExperimentArgs),
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    info!(version = linea_core::VERSION, "linea");

    match cli.command {
        Commands::Experiment(args) => experiment::run(args).await?.into_result(),
    }
}
