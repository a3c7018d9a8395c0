use clap::{Parser, Subcommand};

mod commands;

use commands::{CalculateReturnsArgs, FetchCandlesArgs};

#[derive(Parser)]
#[command(name = "qmoney")]
#[command(about = "Annualized returns for a stock portfolio", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate annualized returns for a portfolio file
    Returns(CalculateReturnsArgs),
    /// Fetch daily candles for one symbol
    Candles(FetchCandlesArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Results go to stdout, logs to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Returns(args) => commands::run_calculate_returns(args).await?,
        Commands::Candles(args) => commands::run_fetch_candles(args).await?,
    }

    Ok(())
}
