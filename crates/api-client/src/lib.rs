//! # Pulseboard API Client
//!
//! Read-only REST access to the two upstream providers: a CoinGecko-shaped
//! market API (listing, global aggregate, per-coin history) and a
//! DefiLlama-shaped protocol API. All requests are unauthenticated GETs.
//!
//! Each endpoint doubles as a [`data_sync::Fetch`] implementation via
//! [`EndpointFetcher`], so the synchronization layer can drive it on a timer
//! without knowing anything about HTTP.

use async_trait::async_trait;
use configuration::ApiConfig;
use data_sync::{Fetch, FetchError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

pub mod error;
pub mod responses;

// --- Public API ---
pub use error::ApiError;
pub use responses::{GlobalData, GlobalOverview, MarketChart, MarketCoin, Protocol, Sparkline};

/// Identifies one remote endpoint with its bound parameters.
///
/// The cache key is derived from the variant and its parameters, so a
/// different coin or time range is a different key with its own refresh
/// timer, never a repointed one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Market listing, ordered by market cap descending, with 7-day
    /// sparklines.
    Markets,
    /// Global aggregate market statistics.
    Global,
    /// Daily-or-finer price history for one coin.
    MarketChart { coin_id: String, days: u32 },
    /// DeFi protocol listing with TVL.
    Protocols,
}

impl Endpoint {
    /// The key this endpoint occupies in the synchronization layer.
    pub fn cache_key(&self) -> String {
        match self {
            Endpoint::Markets => "markets".to_string(),
            Endpoint::Global => "global".to_string(),
            Endpoint::MarketChart { coin_id, days } => {
                format!("market_chart:{coin_id}:{days}")
            }
            Endpoint::Protocols => "protocols".to_string(),
        }
    }
}

/// A concrete client for the public market-data providers.
#[derive(Clone)]
pub struct MarketDataClient {
    client: reqwest::Client,
    market_base_url: String,
    defi_base_url: String,
    vs_currency: String,
    per_page: u32,
}

impl MarketDataClient {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            market_base_url: config.market_base_url.clone(),
            defi_base_url: config.defi_base_url.clone(),
            vs_currency: config.vs_currency.clone(),
            per_page: config.per_page,
        }
    }

    /// Fetches the market listing: the top coins by market cap with their
    /// 7-day price sparklines attached.
    pub async fn markets(&self) -> Result<Vec<MarketCoin>, ApiError> {
        self.get_json(&self.url(&Endpoint::Markets)).await
    }

    /// Fetches the global aggregate statistics.
    pub async fn global(&self) -> Result<GlobalOverview, ApiError> {
        self.get_json(&self.url(&Endpoint::Global)).await
    }

    /// Fetches the historical price series for one coin over `days` days.
    pub async fn market_chart(&self, coin_id: &str, days: u32) -> Result<MarketChart, ApiError> {
        let endpoint = Endpoint::MarketChart {
            coin_id: coin_id.to_string(),
            days,
        };
        self.get_json(&self.url(&endpoint)).await
    }

    /// Fetches the DeFi protocol listing.
    pub async fn protocols(&self) -> Result<Vec<Protocol>, ApiError> {
        self.get_json(&self.url(&Endpoint::Protocols)).await
    }

    /// Wraps an endpoint as a `Fetch` implementation for the
    /// synchronization layer.
    pub fn fetcher(&self, endpoint: Endpoint) -> Arc<EndpointFetcher> {
        Arc::new(EndpointFetcher {
            client: self.clone(),
            endpoint,
        })
    }

    /// The full request URL for an endpoint against the configured bases.
    fn url(&self, endpoint: &Endpoint) -> String {
        match endpoint {
            Endpoint::Markets => format!(
                "{}/coins/markets?vs_currency={}&order=market_cap_desc&per_page={}&sparkline=true&price_change_percentage=1h,24h,7d,30d",
                self.market_base_url, self.vs_currency, self.per_page
            ),
            Endpoint::Global => format!("{}/global", self.market_base_url),
            Endpoint::MarketChart { coin_id, days } => format!(
                "{}/coins/{}/market_chart?vs_currency={}&days={}",
                self.market_base_url, coin_id, self.vs_currency, days
            ),
            Endpoint::Protocols => format!("{}/protocols", self.defi_base_url),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        tracing::debug!(url, "issuing GET request");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str::<T>(&text).map_err(|e| ApiError::Deserialization(e.to_string()))
        } else {
            Err(ApiError::Status(status.as_u16(), url.to_string()))
        }
    }
}

/// A `Fetch` adapter binding one endpoint to the shared HTTP client.
///
/// It fetches the raw JSON value; typed decoding happens in the consumer
/// against the cached snapshot, keeping the cache payload-agnostic.
pub struct EndpointFetcher {
    client: MarketDataClient,
    endpoint: Endpoint,
}

#[async_trait]
impl Fetch for EndpointFetcher {
    async fn fetch(&self) -> Result<Value, FetchError> {
        let url = self.client.url(&self.endpoint);
        self.client
            .get_json::<Value>(&url)
            .await
            .map_err(FetchError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> MarketDataClient {
        MarketDataClient::new(&ApiConfig::default())
    }

    #[test]
    fn market_listing_deserializes_the_required_shape() {
        let body = r#"[
            {
                "id": "bitcoin",
                "symbol": "btc",
                "name": "Bitcoin",
                "current_price": 43250.12,
                "market_cap": 845000000000.0,
                "total_volume": 18200000000.0,
                "price_change_percentage_24h": -1.2,
                "sparkline_in_7d": { "price": [42000.0, 42500.5, 43100.0] }
            },
            {
                "id": "newcoin",
                "symbol": "new",
                "name": "New Coin",
                "current_price": null,
                "market_cap": null,
                "total_volume": null,
                "price_change_percentage_24h": null,
                "sparkline_in_7d": null
            }
        ]"#;

        let coins: Vec<MarketCoin> = serde_json::from_str(body).unwrap();
        assert_eq!(coins.len(), 2);

        let asset = coins[0].clone().into_asset();
        assert_eq!(asset.id, "bitcoin");
        assert_eq!(asset.recent_prices, vec![42000.0, 42500.5, 43100.0]);

        // Missing sparkline degrades to an empty rolling window.
        assert!(coins[1].clone().into_asset().recent_prices.is_empty());
    }

    #[test]
    fn global_aggregate_deserializes_the_required_shape() {
        let body = r#"{
            "data": {
                "total_market_cap": { "usd": 1700000000000.0, "eur": 1560000000000.0 },
                "markets": 912,
                "market_cap_percentage": { "btc": 49.7, "eth": 17.2 },
                "market_cap_change_percentage_24h_usd": 2.31
            }
        }"#;

        let overview: GlobalOverview = serde_json::from_str(body).unwrap();
        assert_eq!(overview.data.total_market_cap_usd(), Some(1_700_000_000_000.0));
        assert_eq!(overview.data.btc_dominance(), Some(49.7));
        assert_eq!(overview.data.markets, 912);
    }

    #[test]
    fn market_chart_deserializes_timestamped_pairs() {
        let body = r#"{ "prices": [[1700000000000, 43000.5], [1700086400000, 43210.0]] }"#;

        let chart: MarketChart = serde_json::from_str(body).unwrap();
        let series = chart.series();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].timestamp, 1_700_000_000_000);
        assert_eq!(series[1].value, 43210.0);
    }

    #[test]
    fn protocol_listing_tolerates_null_daily_change() {
        let body = r#"[
            { "name": "Lido", "chain": "Ethereum", "tvl": 19000000000.0, "change_1d": 0.42 },
            { "name": "Fresh", "chain": "Multi-Chain", "tvl": 1200000.0, "change_1d": null }
        ]"#;

        let protocols: Vec<Protocol> = serde_json::from_str(body).unwrap();
        assert_eq!(protocols[0].change_1d, Some(0.42));
        assert_eq!(protocols[1].change_1d, None);
    }

    #[test]
    fn parameterized_endpoints_get_distinct_cache_keys() {
        let a = Endpoint::MarketChart {
            coin_id: "bitcoin".to_string(),
            days: 7,
        };
        let b = Endpoint::MarketChart {
            coin_id: "bitcoin".to_string(),
            days: 30,
        };
        let c = Endpoint::MarketChart {
            coin_id: "ethereum".to_string(),
            days: 7,
        };

        assert_ne!(a.cache_key(), b.cache_key());
        assert_ne!(a.cache_key(), c.cache_key());
        assert_ne!(a.cache_key(), Endpoint::Markets.cache_key());
    }

    #[test]
    fn request_urls_follow_the_provider_path_patterns() {
        let client = test_client();

        assert!(client.url(&Endpoint::Markets).contains("/coins/markets?vs_currency=usd"));
        assert!(client.url(&Endpoint::Markets).contains("sparkline=true"));
        assert!(client.url(&Endpoint::Global).ends_with("/global"));
        assert!(client.url(&Endpoint::Protocols).ends_with("/protocols"));

        let chart = Endpoint::MarketChart {
            coin_id: "solana".to_string(),
            days: 30,
        };
        assert!(client.url(&chart).contains("/coins/solana/market_chart?vs_currency=usd&days=30"));
    }

    #[test]
    fn api_errors_flatten_into_the_sync_taxonomy() {
        let err = FetchError::from(ApiError::Status(429, "url".to_string()));
        assert!(matches!(err, FetchError::Status(429)));

        let err = FetchError::from(ApiError::Deserialization("bad json".to_string()));
        assert!(matches!(err, FetchError::Malformed(_)));
    }
}
