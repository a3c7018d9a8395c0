use crate::models::Candle;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Source of daily price history.
///
/// Shared across pipeline workers, so implementations must tolerate
/// concurrent calls. Errors are opaque to callers.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Fetches daily candles for `symbol` between `from` and `to`, inclusive.
    async fn fetch_candles(&self, symbol: &str, from: NaiveDate, to: NaiveDate)
        -> Result<Vec<Candle>>;

    fn name(&self) -> &str;
}
