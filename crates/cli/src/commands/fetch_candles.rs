//! Fetch candles CLI command.

use super::{parse_date, ProviderArgs};
use anyhow::{anyhow, Result};
use chrono::Local;
use clap::Args;
use qmoney_core::pricing::normalize_range;
use qmoney_core::Candle;
use qmoney_quotes::create_provider;

/// Arguments for the candles command.
#[derive(Args, Debug, Clone)]
pub struct FetchCandlesArgs {
    /// Ticker symbol (e.g., "AAPL")
    #[arg(long)]
    pub symbol: String,

    /// Start date, YYYY-MM-DD
    #[arg(long)]
    pub from: String,

    /// End date, YYYY-MM-DD (an end before the start means today)
    #[arg(long)]
    pub to: String,

    #[command(flatten)]
    pub provider: ProviderArgs,
}

/// Fetches the candles the arguments describe.
///
/// An end date before the start date is replaced with today, as the return
/// pipelines do.
///
/// # Errors
/// Returns an error if arguments are invalid or the provider call fails.
pub async fn fetch_candles(args: &FetchCandlesArgs) -> Result<Vec<Candle>> {
    let config = args.provider.load_config()?;
    let (from, to) = normalize_range(
        parse_date(&args.from)?,
        parse_date(&args.to)?,
        Local::now().date_naive(),
    );

    let provider = create_provider(&config.quotes)?;

    tracing::info!(
        "Fetching {} candles from {} to {} via {}",
        args.symbol,
        from,
        to,
        provider.name()
    );

    let candles = provider
        .fetch_candles(&args.symbol, from, to)
        .await
        .map_err(|e| anyhow!("Failed to fetch candles for {}: {:#}", args.symbol, e))?;

    tracing::info!("Fetched {} candles", candles.len());
    Ok(candles)
}

/// Runs the candles command, printing the history as JSON.
///
/// # Errors
/// Returns an error if the candles cannot be fetched.
pub async fn run_fetch_candles(args: FetchCandlesArgs) -> Result<()> {
    let candles = fetch_candles(&args).await?;

    println!("{}", serde_json::to_string_pretty(&candles)?);

    Ok(())
}
