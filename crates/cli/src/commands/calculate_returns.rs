//! Calculate returns CLI command.
//!
//! Loads a portfolio file, computes each trade's annualized return up to the
//! end date, and prints the results as JSON, best performer first.

use super::{parse_date, ProviderArgs};
use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use clap::Args;
use qmoney_core::{AnnualizedReturn, PortfolioManager, Trade};
use qmoney_quotes::create_provider;
use std::path::Path;

/// Arguments for the returns command.
#[derive(Args, Debug, Clone)]
pub struct CalculateReturnsArgs {
    /// Portfolio trades JSON file
    #[arg(short, long)]
    pub trades: String,

    /// Evaluation date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub end_date: Option<String>,

    /// Run on the worker pool
    #[arg(long)]
    pub parallel: bool,

    /// Worker count for the parallel pipeline (implies --parallel;
    /// defaults to portfolio.worker_count from config)
    #[arg(short, long)]
    pub workers: Option<usize>,

    #[command(flatten)]
    pub provider: ProviderArgs,
}

/// Reads trades from a JSON array file.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a trade array.
pub fn load_trades(path: impl AsRef<Path>) -> Result<Vec<Trade>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read trades file {}", path.display()))?;

    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse trades file {}", path.display()))
}

fn resolve_end_date(end_date: Option<&str>) -> Result<NaiveDate> {
    match end_date {
        Some(value) => parse_date(value),
        None => Ok(Local::now().date_naive()),
    }
}

/// Loads config and trades, then runs the pipeline the arguments select.
///
/// The parallel pipeline runs when `--parallel` or `--workers` is given; the
/// worker count falls back to `portfolio.worker_count`.
///
/// # Errors
/// Returns an error if config, trades or provider setup fail, or if any
/// trade's return cannot be calculated.
pub async fn calculate_returns(args: &CalculateReturnsArgs) -> Result<Vec<AnnualizedReturn>> {
    let config = args.provider.load_config()?;
    let trades = load_trades(&args.trades)?;
    let end_date = resolve_end_date(args.end_date.as_deref())?;

    tracing::info!("Loaded {} trades from {}", trades.len(), args.trades);

    let provider = create_provider(&config.quotes)?;
    let manager = PortfolioManager::new(provider, config.portfolio);

    if args.parallel || args.workers.is_some() {
        let workers = args.workers.unwrap_or(manager.config().worker_count);
        manager
            .calculate_annualized_returns_parallel(&trades, end_date, workers)
            .await
    } else {
        manager.calculate_annualized_returns(&trades, end_date).await
    }
    .map_err(|e| anyhow!("Failed to calculate returns: {}", e))
}

/// Runs the returns command, printing the results as JSON.
///
/// # Errors
/// Returns an error if the returns cannot be calculated.
pub async fn run_calculate_returns(args: CalculateReturnsArgs) -> Result<()> {
    let returns = calculate_returns(&args).await?;

    println!("{}", serde_json::to_string_pretty(&returns)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{mount_tiingo_prices, write_tiingo_config};
    use super::*;
    use std::io::Write;
    use wiremock::MockServer;

    fn returns_args(
        dir: &tempfile::TempDir,
        config: String,
        parallel: bool,
        workers: Option<usize>,
    ) -> CalculateReturnsArgs {
        let trades = dir.path().join("trades.json");
        std::fs::write(
            &trades,
            r#"[
                {"symbol": "AAPL", "quantity": 100, "tradeType": "BUY", "purchaseDate": "2019-01-02"},
                {"symbol": "MSFT", "quantity": 10, "tradeType": "BUY", "purchaseDate": "2019-01-02"}
            ]"#,
        )
        .unwrap();

        CalculateReturnsArgs {
            trades: trades.display().to_string(),
            end_date: Some("2020-01-02".to_string()),
            parallel,
            workers,
            provider: ProviderArgs {
                config,
                provider: None,
            },
        }
    }

    async fn server() -> MockServer {
        let server = MockServer::start().await;
        mount_tiingo_prices(&server, "AAPL", 100.0, 110.0).await;
        mount_tiingo_prices(&server, "MSFT", 200.0, 180.0).await;
        server
    }

    #[test]
    fn test_load_trades() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"symbol": "AAPL", "quantity": 100, "tradeType": "BUY", "purchaseDate": "2019-01-02"}},
                {{"symbol": "MSFT", "quantity": 10, "tradeType": "BUY", "purchaseDate": "2019-01-02"}}
            ]"#
        )
        .unwrap();

        let trades = load_trades(file.path()).unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[1].symbol, "MSFT");
    }

    #[test]
    fn test_load_trades_missing_file() {
        let err = load_trades("does/not/exist.json").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.json"));
    }

    #[test]
    fn test_load_trades_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"symbol": "AAPL"}}"#).unwrap();

        assert!(load_trades(file.path()).is_err());
    }

    #[test]
    fn test_resolve_end_date() {
        assert_eq!(
            resolve_end_date(Some("2019-12-12")).unwrap(),
            NaiveDate::from_ymd_opt(2019, 12, 12).unwrap()
        );
        assert_eq!(resolve_end_date(None).unwrap(), Local::now().date_naive());
    }

    #[tokio::test]
    async fn test_sequential_by_default() {
        let server = server().await;
        let dir = tempfile::tempdir().unwrap();
        // A zero worker count would fail the parallel pipeline
        let config = write_tiingo_config(&dir, &server.uri(), 0);

        let returns = calculate_returns(&returns_args(&dir, config, false, None))
            .await
            .unwrap();

        let symbols: Vec<_> = returns.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "MSFT"]);
        assert!((returns[0].annualized_return - 0.10).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_parallel_flag_uses_configured_worker_count() {
        let server = server().await;
        let dir = tempfile::tempdir().unwrap();

        let config = write_tiingo_config(&dir, &server.uri(), 0);
        let err = calculate_returns(&returns_args(&dir, config, true, None))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid worker count: 0"));

        let config = write_tiingo_config(&dir, &server.uri(), 3);
        let returns = calculate_returns(&returns_args(&dir, config, true, None))
            .await
            .unwrap();
        assert_eq!(returns.len(), 2);
    }

    #[tokio::test]
    async fn test_workers_select_parallel_and_override_config() {
        let server = server().await;
        let dir = tempfile::tempdir().unwrap();
        let config = write_tiingo_config(&dir, &server.uri(), 0);

        let err = calculate_returns(&returns_args(&dir, config.clone(), false, Some(0)))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid worker count: 0"));

        let parallel = calculate_returns(&returns_args(&dir, config.clone(), false, Some(2)))
            .await
            .unwrap();
        let sequential = calculate_returns(&returns_args(&dir, config, false, None))
            .await
            .unwrap();
        assert_eq!(parallel, sequential);
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("Config.toml");
        std::fs::write(&config, "[quotes]\nprovider = \"tiingo\"\n").unwrap();

        let args = returns_args(&dir, config.display().to_string(), false, None);
        assert!(calculate_returns(&args).await.is_err());
    }
}
