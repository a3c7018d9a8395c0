//! Shared HTTP plumbing for provider clients.

use crate::error::{QuoteError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

const MAX_SYMBOL_LEN: usize = 16;

/// Builds an HTTP client with the given request timeout.
pub(crate) fn build_http_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| QuoteError::Network(format!("failed to build HTTP client: {e}")))
}

/// Validates a ticker symbol before it is placed in a URL.
///
/// Accepts ASCII alphanumerics plus `.` and `-` (e.g. "BRK.B", "RDS-A").
pub(crate) fn validate_symbol(symbol: &str) -> Result<&str> {
    if symbol.is_empty() {
        return Err(QuoteError::InvalidSymbol("symbol cannot be empty".to_string()));
    }

    if symbol.contains("..") {
        return Err(QuoteError::InvalidSymbol(format!(
            "contains forbidden sequence: {symbol}"
        )));
    }

    if !symbol
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(QuoteError::InvalidSymbol(format!(
            "must contain only alphanumeric, dot, or hyphen: {symbol}"
        )));
    }

    if symbol.len() > MAX_SYMBOL_LEN {
        return Err(QuoteError::InvalidSymbol(format!(
            "exceeds maximum length of {MAX_SYMBOL_LEN}: {}",
            symbol.len()
        )));
    }

    Ok(symbol)
}

/// Checks the status and decodes a JSON body.
pub(crate) async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(QuoteError::api(status.as_u16(), text));
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
