//! CLI commands for portfolio return calculation.

pub mod calculate_returns;
pub mod fetch_candles;

pub use calculate_returns::{run_calculate_returns, CalculateReturnsArgs};
pub use fetch_candles::{run_fetch_candles, FetchCandlesArgs};

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::Args;
use qmoney_core::{AppConfig, ConfigLoader, QuoteProviderKind};
use std::str::FromStr;

/// Options shared by every command that talks to a quote provider.
#[derive(Args, Debug, Clone)]
pub struct ProviderArgs {
    /// Config file path
    #[arg(short, long, default_value = qmoney_core::config_loader::DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Quote provider override (tiingo, alphavantage)
    #[arg(long, env = "QMONEY_PROVIDER")]
    pub provider: Option<String>,
}

impl ProviderArgs {
    /// Loads configuration and applies the provider override.
    ///
    /// # Errors
    /// Returns an error if the config cannot be parsed or the provider name
    /// is unknown.
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = ConfigLoader::load_from(&self.config)
            .with_context(|| format!("Failed to load config from {}", self.config))?;

        if let Some(provider) = &self.provider {
            config.quotes.provider = QuoteProviderKind::from_str(provider)?;
        }

        Ok(config)
    }
}

/// Parses a `YYYY-MM-DD` date argument.
///
/// # Errors
/// Returns an error if `value` is not a valid `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid date '{}'. Use YYYY-MM-DD format", value))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2019-12-12").unwrap(),
            NaiveDate::from_ymd_opt(2019, 12, 12).unwrap()
        );
        assert!(parse_date("12/12/2019").is_err());
    }

    #[test]
    fn test_provider_override() {
        let args = ProviderArgs {
            config: "does/not/exist.toml".to_string(),
            provider: Some("alphavantage".to_string()),
        };

        let config = args.load_config().unwrap();
        assert_eq!(config.quotes.provider, QuoteProviderKind::Alphavantage);
    }

    #[test]
    fn test_invalid_provider_override() {
        let args = ProviderArgs {
            config: "does/not/exist.toml".to_string(),
            provider: Some("yahoo".to_string()),
        };

        assert!(args.load_config().is_err());
    }
}
