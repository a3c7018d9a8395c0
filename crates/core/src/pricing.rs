//! Per-trade price extraction shared by the sequential and parallel pipelines.
//!
//! Every failure on the data path (provider error, empty history, missing
//! purchase-date candle, unconvertible price) maps to
//! [`PortfolioError::QuoteService`].

use crate::calculator::calculate_annualized_return;
use crate::error::{PortfolioError, Result};
use crate::models::{AnnualizedReturn, Candle, Trade};
use crate::traits::QuoteProvider;
use chrono::{Local, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

/// Replaces `to` with `today` when it precedes `from`.
#[must_use]
pub fn normalize_range(from: NaiveDate, to: NaiveDate, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    if to < from {
        (from, today)
    } else {
        (from, to)
    }
}

/// Opening price on the purchase date. Requires an exact date match.
///
/// # Errors
/// Returns `QuoteService` if no candle is dated on `purchase_date`.
pub fn buy_price(symbol: &str, candles: &[Candle], purchase_date: NaiveDate) -> Result<Decimal> {
    candles
        .iter()
        .find(|c| c.date == purchase_date)
        .map(|c| c.open)
        .ok_or_else(|| {
            PortfolioError::quote_service(symbol, format!("no candle on purchase date {purchase_date}"))
        })
}

/// Closing price of the chronologically last candle.
///
/// Among candles sharing the latest date the positionally last one wins, so
/// for date-sorted input this is simply the last element.
///
/// # Errors
/// Returns `QuoteService` if `candles` is empty.
pub fn sell_price(symbol: &str, candles: &[Candle]) -> Result<Decimal> {
    candles
        .iter()
        .max_by_key(|c| c.date)
        .map(|c| c.close)
        .ok_or_else(|| PortfolioError::quote_service(symbol, "empty price history"))
}

fn to_f64(symbol: &str, price: Decimal) -> Result<f64> {
    price
        .to_f64()
        .ok_or_else(|| PortfolioError::quote_service(symbol, format!("price {price} out of range")))
}

/// Fetches history for one trade and computes its annualized return.
///
/// # Errors
/// Returns `ZeroHoldingPeriod` if the trade was bought on `end_date`, and
/// `QuoteService` for any provider or data failure.
pub async fn evaluate_trade(
    provider: &dyn QuoteProvider,
    trade: &Trade,
    end_date: NaiveDate,
) -> Result<AnnualizedReturn> {
    if trade.purchase_date == end_date {
        return Err(PortfolioError::ZeroHoldingPeriod {
            symbol: trade.symbol.clone(),
            date: end_date,
        });
    }

    let (from, to) = normalize_range(trade.purchase_date, end_date, Local::now().date_naive());

    let candles = provider
        .fetch_candles(&trade.symbol, from, to)
        .await
        .map_err(|e| PortfolioError::quote_service(&trade.symbol, format!("{e:#}")))?;

    if candles.is_empty() {
        return Err(PortfolioError::quote_service(
            &trade.symbol,
            "provider returned no candles",
        ));
    }

    let buy = to_f64(&trade.symbol, buy_price(&trade.symbol, &candles, trade.purchase_date)?)?;
    let sell = to_f64(&trade.symbol, sell_price(&trade.symbol, &candles)?)?;

    debug!(
        "{}: {} candles from {}, buy={} sell={}",
        trade.symbol,
        candles.len(),
        provider.name(),
        buy,
        sell
    );

    Ok(calculate_annualized_return(
        &trade.symbol,
        trade.purchase_date,
        end_date,
        buy,
        sell,
    ))
}
