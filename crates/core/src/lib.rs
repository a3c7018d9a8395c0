pub mod calculator;
pub mod config;
pub mod config_loader;
pub mod error;
pub mod manager;
pub mod models;
pub mod pricing;
pub mod traits;
pub mod worker_pool;

pub use calculator::calculate_annualized_return;
pub use config::{
    AlphavantageSettings, AppConfig, PortfolioConfig, QuoteProviderKind, QuotesConfig,
    TiingoSettings,
};
pub use config_loader::ConfigLoader;
pub use error::{PortfolioError, Result};
pub use manager::{sort_by_annualized_return, PortfolioManager};
pub use models::{AnnualizedReturn, Candle, Trade};
pub use traits::QuoteProvider;
pub use worker_pool::{TaskHandle, WorkerPool};
