use core_types::{Asset, TimeSeriesPoint};
use serde::Deserialize;
use std::collections::HashMap;

/// One coin from the market-listing endpoint. Fields beyond the required
/// shape are the ones the dashboard actually renders; everything else in the
/// provider's (large) response is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketCoin {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub total_volume: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub sparkline_in_7d: Option<Sparkline>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sparkline {
    pub price: Vec<f64>,
}

impl MarketCoin {
    /// Converts the listing row into the analytics-layer asset model. A coin
    /// the provider listed without sparkline data yields an asset with an
    /// empty rolling window, which the correlation builder will skip.
    pub fn into_asset(self) -> Asset {
        Asset {
            id: self.id,
            symbol: self.symbol,
            name: self.name,
            recent_prices: self.sparkline_in_7d.map(|s| s.price).unwrap_or_default(),
        }
    }
}

/// The global-aggregate endpoint wraps its body in a `data` object.
#[derive(Debug, Clone, Deserialize)]
pub struct GlobalOverview {
    pub data: GlobalData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GlobalData {
    /// Total market cap keyed by quote currency (e.g. "usd").
    pub total_market_cap: HashMap<String, f64>,
    /// Number of markets tracked by the provider.
    pub markets: u64,
    /// Market-cap dominance percentages keyed by coin symbol (e.g. "btc").
    pub market_cap_percentage: HashMap<String, f64>,
    pub market_cap_change_percentage_24h_usd: f64,
}

impl GlobalData {
    pub fn total_market_cap_usd(&self) -> Option<f64> {
        self.total_market_cap.get("usd").copied()
    }

    pub fn btc_dominance(&self) -> Option<f64> {
        self.market_cap_percentage.get("btc").copied()
    }
}

/// The historical-series endpoint: `prices` is an array of
/// `[timestampMs, price]` pairs in ascending timestamp order.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketChart {
    pub prices: Vec<(i64, f64)>,
}

impl MarketChart {
    /// The price history as the analytics-layer series type.
    pub fn series(&self) -> Vec<TimeSeriesPoint> {
        self.prices
            .iter()
            .map(|&(timestamp, value)| TimeSeriesPoint::new(timestamp, value))
            .collect()
    }
}

/// One DeFi protocol from the protocol-listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Protocol {
    pub name: String,
    #[serde(default)]
    pub chain: String,
    #[serde(default)]
    pub tvl: f64,
    /// One-day TVL change percentage; the provider reports null for new
    /// listings.
    pub change_1d: Option<f64>,
}
