use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub quotes: QuotesConfig,
    pub portfolio: PortfolioConfig,
}

/// Which quote provider backs the pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteProviderKind {
    #[default]
    Tiingo,
    Alphavantage,
}

impl FromStr for QuoteProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "tiingo" => Ok(Self::Tiingo),
            "alphavantage" | "alpha-vantage" | "alpha_vantage" => Ok(Self::Alphavantage),
            _ => Err(anyhow::anyhow!(
                "Invalid quote provider: '{}'. Valid values: tiingo, alphavantage",
                s
            )),
        }
    }
}

impl fmt::Display for QuoteProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tiingo => write!(f, "tiingo"),
            Self::Alphavantage => write!(f, "alphavantage"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotesConfig {
    pub provider: QuoteProviderKind,
    pub timeout_secs: u64,
    pub tiingo: TiingoSettings,
    pub alphavantage: AlphavantageSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TiingoSettings {
    pub base_url: String,
    pub api_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlphavantageSettings {
    pub base_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    /// Workers used when the parallel pipeline is requested without a count.
    pub worker_count: usize,
    /// How long pool teardown waits before aborting workers.
    pub shutdown_grace_ms: u64,
}

impl PortfolioConfig {
    #[must_use]
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self {
            provider: QuoteProviderKind::Tiingo,
            timeout_secs: 30,
            tiingo: TiingoSettings::default(),
            alphavantage: AlphavantageSettings::default(),
        }
    }
}

impl Default for TiingoSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.tiingo.com".to_string(),
            api_token: None,
        }
    }
}

impl Default for AlphavantageSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.alphavantage.co".to_string(),
            api_key: None,
        }
    }
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            worker_count: 4,
            shutdown_grace_ms: 800,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_from_str() {
        assert_eq!("tiingo".parse::<QuoteProviderKind>().unwrap(), QuoteProviderKind::Tiingo);
        assert_eq!(
            "AlphaVantage".parse::<QuoteProviderKind>().unwrap(),
            QuoteProviderKind::Alphavantage
        );
        assert!("yahoo".parse::<QuoteProviderKind>().is_err());
    }

    #[test]
    fn test_provider_kind_display_round_trips() {
        for kind in [QuoteProviderKind::Tiingo, QuoteProviderKind::Alphavantage] {
            assert_eq!(kind.to_string().parse::<QuoteProviderKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.quotes.provider, QuoteProviderKind::Tiingo);
        assert_eq!(config.portfolio.worker_count, 4);
        assert_eq!(config.portfolio.shutdown_grace(), Duration::from_millis(800));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"quotes": {"provider": "alphavantage"}}"#).unwrap();

        assert_eq!(config.quotes.provider, QuoteProviderKind::Alphavantage);
        assert_eq!(config.quotes.timeout_secs, 30);
        assert_eq!(config.portfolio.shutdown_grace_ms, 800);
    }
}
