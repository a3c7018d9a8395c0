use crate::alphavantage::{AlphavantageClient, AlphavantageClientConfig};
use crate::error::Result;
use crate::tiingo::{TiingoClient, TiingoClientConfig};
use qmoney_core::config::{QuoteProviderKind, QuotesConfig};
use qmoney_core::QuoteProvider;
use std::sync::Arc;
use tracing::info;

/// Builds the provider selected by `config.provider`.
///
/// # Errors
/// Returns `Configuration` if the selected provider has no credentials.
pub fn create_provider(config: &QuotesConfig) -> Result<Arc<dyn QuoteProvider>> {
    info!("Using {} quote provider", config.provider);

    let provider: Arc<dyn QuoteProvider> = match config.provider {
        QuoteProviderKind::Tiingo => {
            Arc::new(TiingoClient::new(TiingoClientConfig::from_settings(config)?)?)
        }
        QuoteProviderKind::Alphavantage => Arc::new(AlphavantageClient::new(
            AlphavantageClientConfig::from_settings(config)?,
        )?),
    };

    Ok(provider)
}
