use crate::error::ConfigError;
use serde::Deserialize;
use std::time::Duration;

/// The root configuration structure for the entire application.
///
/// Every section has compiled-in defaults matching the public providers and
/// the refresh cadence the dashboard was designed around, so the application
/// runs without a config file at all.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub refresh: RefreshConfig,
    pub analytics: AnalyticsConfig,
}

/// Provider endpoints and listing parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the CoinGecko-shaped market API.
    pub market_base_url: String,
    /// Base URL of the DefiLlama-shaped protocol API.
    pub defi_base_url: String,
    /// Quote currency for prices and market caps.
    pub vs_currency: String,
    /// Number of coins requested from the market listing.
    pub per_page: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            market_base_url: "https://api.coingecko.com/api/v3".to_string(),
            defi_base_url: "https://api.llama.fi".to_string(),
            vs_currency: "usd".to_string(),
            per_page: 20,
        }
    }
}

/// Per-feed refresh intervals, in seconds.
///
/// Each cache key refreshes independently; these only set the cadence. The
/// listing moves fastest, aggregates slower, and the heavyweight history and
/// protocol feeds slowest.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub market_secs: u64,
    pub global_secs: u64,
    pub historical_secs: u64,
    pub protocols_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            market_secs: 30,
            global_secs: 60,
            historical_secs: 300,
            protocols_secs: 300,
        }
    }
}

impl RefreshConfig {
    pub fn market(&self) -> Duration {
        Duration::from_secs(self.market_secs)
    }

    pub fn global(&self) -> Duration {
        Duration::from_secs(self.global_secs)
    }

    pub fn historical(&self) -> Duration {
        Duration::from_secs(self.historical_secs)
    }

    pub fn protocols(&self) -> Duration {
        Duration::from_secs(self.protocols_secs)
    }
}

/// Parameters of the derived-data layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// How many top-ranked assets enter the correlation matrix.
    pub top_n: usize,
    /// Fast moving-average window for the crossover read.
    pub sma_fast: usize,
    /// Slow moving-average window for the crossover read.
    pub sma_slow: usize,
    /// Default forecast horizon, in daily steps.
    pub forecast_days: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            sma_fast: 20,
            sma_slow: 50,
            forecast_days: 7,
        }
    }
}

impl Config {
    /// Rejects configurations that would make the pipeline degenerate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analytics.top_n == 0 {
            return Err(ConfigError::Validation(
                "analytics.top_n must be at least 1".to_string(),
            ));
        }
        if self.analytics.sma_fast == 0 || self.analytics.sma_fast >= self.analytics.sma_slow {
            return Err(ConfigError::Validation(
                "analytics.sma_fast must be nonzero and less than analytics.sma_slow".to_string(),
            ));
        }
        let intervals = [
            ("refresh.market_secs", self.refresh.market_secs),
            ("refresh.global_secs", self.refresh.global_secs),
            ("refresh.historical_secs", self.refresh.historical_secs),
            ("refresh.protocols_secs", self.refresh.protocols_secs),
        ];
        for (name, secs) in intervals {
            if secs == 0 {
                return Err(ConfigError::Validation(format!(
                    "{name} must be nonzero"
                )));
            }
        }
        Ok(())
    }
}
