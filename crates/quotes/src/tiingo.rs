//! Tiingo end-of-day prices client.
//!
//! Tiingo filters by date server-side and returns candles oldest first.
//!
//! ```ignore
//! use qmoney_quotes::{TiingoClient, TiingoClientConfig};
//!
//! let client = TiingoClient::new(TiingoClientConfig::new("my-token"))?;
//! let candles = client.get_daily_prices("AAPL", from, to).await?;
//! ```

use crate::error::{QuoteError, Result};
use crate::http::{build_http_client, handle_response, validate_symbol};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use qmoney_core::config::QuotesConfig;
use qmoney_core::{Candle, QuoteProvider};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

/// Tiingo production API base URL.
pub const TIINGO_URL: &str = "https://api.tiingo.com";

/// Configuration for the Tiingo client.
#[derive(Clone)]
pub struct TiingoClientConfig {
    /// Base URL for the API.
    pub base_url: String,

    /// API token sent as the `token` query parameter.
    pub api_token: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for TiingoClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiingoClientConfig")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl TiingoClientConfig {
    /// Creates a production configuration with the given token.
    #[must_use]
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            base_url: TIINGO_URL.to_string(),
            api_token: api_token.into(),
            timeout_secs: 30,
        }
    }

    /// Builds a configuration from application settings.
    ///
    /// # Errors
    /// Returns `Configuration` if no API token is set.
    pub fn from_settings(config: &QuotesConfig) -> Result<Self> {
        let api_token = config
            .tiingo
            .api_token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| QuoteError::Configuration("missing Tiingo API token".to_string()))?;

        Ok(Self {
            base_url: config.tiingo.base_url.clone(),
            api_token,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Raw candle as returned by `/tiingo/daily/{symbol}/prices`.
#[derive(Debug, Clone, Deserialize)]
struct RawTiingoCandle {
    date: String,
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
}

/// Parses Tiingo dates, which arrive as RFC 3339 timestamps or plain dates.
fn parse_date(raw: &str) -> Result<NaiveDate> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map_err(|e| QuoteError::Serialization(format!("invalid date '{raw}': {e}")))
}

impl TryFrom<RawTiingoCandle> for Candle {
    type Error = QuoteError;

    fn try_from(raw: RawTiingoCandle) -> Result<Self> {
        Ok(Self {
            date: parse_date(&raw.date)?,
            open: raw.open,
            high: raw.high,
            low: raw.low,
            close: raw.close,
        })
    }
}

pub struct TiingoClient {
    config: TiingoClientConfig,
    http: Client,
}

impl std::fmt::Debug for TiingoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiingoClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl TiingoClient {
    /// Creates a new client.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: TiingoClientConfig) -> Result<Self> {
        let http = build_http_client(config.timeout_secs)?;
        Ok(Self { config, http })
    }

    /// Fetches daily candles for `symbol` between `from` and `to`, inclusive,
    /// in the order Tiingo returns them.
    ///
    /// # Errors
    /// Returns error on invalid symbol, transport failure, non-2xx status or
    /// an undecodable body.
    pub async fn get_daily_prices(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Candle>> {
        let symbol = validate_symbol(symbol)?;
        let url = format!("{}/tiingo/daily/{}/prices", self.config.base_url, symbol);

        debug!("GET {} startDate={} endDate={}", url, from, to);

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .query(&[
                ("startDate", from.to_string()),
                ("endDate", to.to_string()),
                ("token", self.config.api_token.clone()),
            ])
            .send()
            .await?;

        let raw: Vec<RawTiingoCandle> = handle_response(response).await?;

        raw.into_iter().map(Candle::try_from).collect()
    }
}

#[async_trait]
impl QuoteProvider for TiingoClient {
    async fn fetch_candles(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> anyhow::Result<Vec<Candle>> {
        Ok(self.get_daily_prices(symbol, from, to).await?)
    }

    fn name(&self) -> &str {
        "tiingo"
    }
}
