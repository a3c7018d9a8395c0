use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single stock purchase whose performance is evaluated.
///
/// Deserializes from the portfolio file format; fields other than the symbol
/// and purchase date (quantity, trade type) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub symbol: String,
    pub purchase_date: NaiveDate,
}

impl Trade {
    #[must_use]
    pub fn new(symbol: impl Into<String>, purchase_date: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            purchase_date,
        }
    }
}

/// Daily price record for one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}

impl Candle {
    /// Creates a candle where only open and close are known.
    ///
    /// High and low are set to the envelope of open and close.
    #[must_use]
    pub fn from_open_close(date: NaiveDate, open: Decimal, close: Decimal) -> Self {
        Self {
            date,
            open,
            high: open.max(close),
            low: open.min(close),
            close,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualizedReturn {
    pub symbol: String,
    pub annualized_return: f64,
    pub total_return: f64,
}
