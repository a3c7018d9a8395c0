//! Portfolio return pipelines.
//!
//! Both pipelines evaluate each trade independently, fail as a whole on the
//! first failing trade, and return results sorted by annualized return,
//! highest first. For the same inputs and a deterministic provider they
//! produce identical output.

use crate::config::PortfolioConfig;
use crate::error::{PortfolioError, Result};
use crate::models::{AnnualizedReturn, Trade};
use crate::pricing::evaluate_trade;
use crate::traits::QuoteProvider;
use crate::worker_pool::WorkerPool;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Stable descending sort on annualized return. Ties keep input order.
pub fn sort_by_annualized_return(returns: &mut [AnnualizedReturn]) {
    returns.sort_by(|a, b| b.annualized_return.total_cmp(&a.annualized_return));
}

pub struct PortfolioManager {
    provider: Arc<dyn QuoteProvider>,
    config: PortfolioConfig,
}

impl PortfolioManager {
    #[must_use]
    pub fn new(provider: Arc<dyn QuoteProvider>, config: PortfolioConfig) -> Self {
        Self { provider, config }
    }

    #[must_use]
    pub fn config(&self) -> &PortfolioConfig {
        &self.config
    }

    /// Evaluates trades one at a time, in input order.
    ///
    /// # Errors
    /// Returns the first failing trade's error; no partial results.
    pub async fn calculate_annualized_returns(
        &self,
        trades: &[Trade],
        end_date: NaiveDate,
    ) -> Result<Vec<AnnualizedReturn>> {
        let started = Instant::now();
        info!(
            "Calculating returns for {} trades up to {} via {}",
            trades.len(),
            end_date,
            self.provider.name()
        );

        let mut returns = Vec::with_capacity(trades.len());
        for trade in trades {
            match evaluate_trade(self.provider.as_ref(), trade, end_date).await {
                Ok(result) => returns.push(result),
                Err(e) => {
                    warn!(error = %e, "Aborting return calculation");
                    return Err(e);
                }
            }
        }

        sort_by_annualized_return(&mut returns);

        info!(
            "Calculated {} returns in {:.2}s",
            returns.len(),
            started.elapsed().as_secs_f64()
        );
        Ok(returns)
    }

    /// Evaluates trades concurrently on a pool of `worker_count` workers.
    ///
    /// Every dispatched trade is awaited before returning, even once a
    /// failure is known. The pool is torn down within the configured grace
    /// period on every path.
    ///
    /// # Errors
    /// Returns `InvalidWorkerCount` for zero workers, otherwise the error of
    /// the earliest failing trade in input order.
    pub async fn calculate_annualized_returns_parallel(
        &self,
        trades: &[Trade],
        end_date: NaiveDate,
        worker_count: usize,
    ) -> Result<Vec<AnnualizedReturn>> {
        let started = Instant::now();
        let pool = WorkerPool::new(worker_count)?;

        info!(
            "Calculating returns for {} trades up to {} via {} on {} workers",
            trades.len(),
            end_date,
            self.provider.name(),
            pool.size()
        );

        let mut handles = Vec::with_capacity(trades.len());
        for trade in trades {
            let provider = Arc::clone(&self.provider);
            let trade = trade.clone();
            handles.push(pool.submit(async move {
                evaluate_trade(provider.as_ref(), &trade, end_date).await
            }));
        }

        // One slot per trade, filled in submission order
        let mut outcomes = Vec::with_capacity(handles.len());
        for (handle, trade) in handles.into_iter().zip(trades) {
            let outcome = handle.join().await.unwrap_or_else(|e| {
                Err(PortfolioError::quote_service(&trade.symbol, e.to_string()))
            });
            outcomes.push(outcome);
        }

        pool.shutdown(self.config.shutdown_grace()).await;

        let mut returns = match outcomes.into_iter().collect::<Result<Vec<_>>>() {
            Ok(returns) => returns,
            Err(e) => {
                warn!(error = %e, "Aborting parallel return calculation");
                return Err(e);
            }
        };

        sort_by_annualized_return(&mut returns);

        info!(
            "Calculated {} returns in {:.2}s",
            returns.len(),
            started.elapsed().as_secs_f64()
        );
        Ok(returns)
    }
}
