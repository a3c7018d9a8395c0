//! Daily stock quote providers.
//!
//! This crate provides:
//! - Tiingo end-of-day prices client
//! - Alpha Vantage `TIME_SERIES_DAILY` client
//! - A factory that picks one from configuration
//!
//! Both clients implement [`qmoney_core::QuoteProvider`] and can be shared
//! across pipeline workers. Neither retries, caches nor rate-limits.
//!
//! # Example
//!
//! ```ignore
//! use qmoney_core::ConfigLoader;
//! use qmoney_quotes::create_provider;
//!
//! let config = ConfigLoader::load()?;
//! let provider = create_provider(&config.quotes)?;
//! let candles = provider.fetch_candles("AAPL", from, to).await?;
//! ```

pub mod alphavantage;
pub mod error;
pub mod factory;
mod http;
pub mod tiingo;

pub use alphavantage::{AlphavantageClient, AlphavantageClientConfig, ALPHAVANTAGE_URL};
pub use error::{QuoteError, Result};
pub use factory::create_provider;
pub use tiingo::{TiingoClient, TiingoClientConfig, TIINGO_URL};
