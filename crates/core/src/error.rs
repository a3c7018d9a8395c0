//! Error types for portfolio return calculation.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors surfaced by the return pipelines.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PortfolioError {
    /// The quote provider failed, returned nothing usable, or its data could
    /// not be interpreted for this trade.
    #[error("quote service failure for {symbol}: {reason}")]
    QuoteService {
        /// Symbol of the failing trade.
        symbol: String,
        /// Underlying cause.
        reason: String,
    },

    /// Trade was purchased on the evaluation date, so no return can be annualized.
    #[error("zero holding period for {symbol}: purchased on evaluation date {date}")]
    ZeroHoldingPeriod {
        /// Symbol of the rejected trade.
        symbol: String,
        /// Purchase and evaluation date.
        date: NaiveDate,
    },

    /// Worker pool requested with no workers.
    #[error("invalid worker count: {0} (must be at least 1)")]
    InvalidWorkerCount(usize),

    /// A worker dropped a job without producing an outcome.
    #[error("worker interrupted before completing its task")]
    WorkerInterrupted,
}

impl PortfolioError {
    /// Creates a quote service failure.
    pub fn quote_service(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::QuoteService {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this error came from the data path rather than a caller precondition.
    #[must_use]
    pub fn is_quote_service(&self) -> bool {
        matches!(self, Self::QuoteService { .. })
    }
}

/// Result type alias for portfolio operations.
pub type Result<T> = std::result::Result<T, PortfolioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_service_display() {
        let err = PortfolioError::quote_service("AAPL", "connection refused");
        assert!(err.is_quote_service());
        assert!(err.to_string().contains("AAPL"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_zero_holding_period_display() {
        let err = PortfolioError::ZeroHoldingPeriod {
            symbol: "GOOG".to_string(),
            date: NaiveDate::from_ymd_opt(2019, 1, 2).unwrap(),
        };
        assert!(!err.is_quote_service());
        assert!(err.to_string().contains("2019-01-02"));
    }

    #[test]
    fn test_invalid_worker_count_display() {
        let err = PortfolioError::InvalidWorkerCount(0);
        assert!(err.to_string().contains("at least 1"));
    }
}
