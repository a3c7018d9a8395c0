//! Annualized return calculation.
//!
//! Pure arithmetic over calendar days. A zero-length holding period produces
//! a non-finite or meaningless result; callers reject such trades up front.

use crate::models::AnnualizedReturn;
use chrono::NaiveDate;

pub const DAYS_PER_YEAR: f64 = 365.0;

/// Computes total and annualized return for a holding from `purchase_date` to `end_date`.
///
/// `annualized = (1 + total) ^ (365 / days) - 1`, with `total = (sell - buy) / buy`.
#[must_use]
pub fn calculate_annualized_return(
    symbol: &str,
    purchase_date: NaiveDate,
    end_date: NaiveDate,
    buy_price: f64,
    sell_price: f64,
) -> AnnualizedReturn {
    let total_return = (sell_price - buy_price) / buy_price;

    #[allow(clippy::cast_precision_loss)]
    let years = (end_date - purchase_date).num_days() as f64 / DAYS_PER_YEAR;

    let annualized_return = (1.0 + total_return).powf(1.0 / years) - 1.0;

    AnnualizedReturn {
        symbol: symbol.to_string(),
        annualized_return,
        total_return,
    }
}
