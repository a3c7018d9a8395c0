//! Alpha Vantage daily time series client.
//!
//! `TIME_SERIES_DAILY` has no date-range parameters, so the full history is
//! fetched and filtered locally. Candles are returned oldest first.

use crate::error::{QuoteError, Result};
use crate::http::{build_http_client, handle_response, validate_symbol};
use async_trait::async_trait;
use chrono::NaiveDate;
use qmoney_core::config::QuotesConfig;
use qmoney_core::{Candle, QuoteProvider};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Alpha Vantage production API base URL.
pub const ALPHAVANTAGE_URL: &str = "https://www.alphavantage.co";

/// Configuration for the Alpha Vantage client.
#[derive(Clone)]
pub struct AlphavantageClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for AlphavantageClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlphavantageClientConfig")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl AlphavantageClientConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: ALPHAVANTAGE_URL.to_string(),
            api_key: api_key.into(),
            timeout_secs: 30,
        }
    }

    /// Builds a configuration from application settings.
    ///
    /// # Errors
    /// Returns `Configuration` if no API key is set.
    pub fn from_settings(config: &QuotesConfig) -> Result<Self> {
        let api_key = config
            .alphavantage
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                QuoteError::Configuration("missing Alpha Vantage API key".to_string())
            })?;

        Ok(Self {
            base_url: config.alphavantage.base_url.clone(),
            api_key,
            timeout_secs: config.timeout_secs,
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Top-level `TIME_SERIES_DAILY` response. Error bodies arrive with HTTP 200.
#[derive(Debug, Deserialize)]
struct RawDailyResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<BTreeMap<NaiveDate, RawDailyCandle>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawDailyCandle {
    #[serde(rename = "1. open")]
    open: Decimal,
    #[serde(rename = "2. high")]
    high: Decimal,
    #[serde(rename = "3. low")]
    low: Decimal,
    #[serde(rename = "4. close")]
    close: Decimal,
}

impl RawDailyResponse {
    /// Candles within `[from, to]`, oldest first.
    fn into_candles(self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Candle>> {
        if let Some(message) = self.error_message.or(self.note).or(self.information) {
            return Err(QuoteError::Provider(message));
        }

        let series = self
            .time_series
            .ok_or_else(|| QuoteError::Provider("response has no daily time series".to_string()))?;

        if from > to {
            return Ok(Vec::new());
        }

        Ok(series
            .range(from..=to)
            .map(|(date, raw)| Candle {
                date: *date,
                open: raw.open,
                high: raw.high,
                low: raw.low,
                close: raw.close,
            })
            .collect())
    }
}

pub struct AlphavantageClient {
    config: AlphavantageClientConfig,
    http: Client,
}

impl std::fmt::Debug for AlphavantageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlphavantageClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl AlphavantageClient {
    /// Creates a new client.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: AlphavantageClientConfig) -> Result<Self> {
        let http = build_http_client(config.timeout_secs)?;
        Ok(Self { config, http })
    }

    /// Fetches the full daily series for `symbol` and keeps `[from, to]`.
    ///
    /// # Errors
    /// Returns error on invalid symbol, transport failure, non-2xx status,
    /// an error message in the body, or an undecodable body.
    pub async fn get_daily_prices(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Candle>> {
        let symbol = validate_symbol(symbol)?;
        let url = format!("{}/query", self.config.base_url);

        debug!("GET {} function=TIME_SERIES_DAILY symbol={}", url, symbol);

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("outputsize", "full"),
                ("symbol", symbol),
                ("apikey", self.config.api_key.as_str()),
            ])
            .send()
            .await?;

        let raw: RawDailyResponse = handle_response(response).await?;
        raw.into_candles(from, to)
    }
}

#[async_trait]
impl QuoteProvider for AlphavantageClient {
    async fn fetch_candles(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> anyhow::Result<Vec<Candle>> {
        Ok(self.get_daily_prices(symbol, from, to).await?)
    }

    fn name(&self) -> &str {
        "alphavantage"
    }
}
