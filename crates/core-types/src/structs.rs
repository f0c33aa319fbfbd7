use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A single observation in a price time series.
///
/// Series are ordered by ascending `timestamp`. Duplicate timestamps are not
/// expected from the upstream providers, but they are not enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// The observation time as a timezone-aware `DateTime`.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }
}

/// A tradable asset as reported by a market-listing provider.
///
/// Identity is carried by `id`; symbols are not guaranteed to be unique
/// across providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub symbol: String,
    pub name: String,
    /// A fixed-length rolling window of sampled prices (e.g. 7-day sparkline).
    /// May be empty when the provider omitted sparkline data for the asset.
    pub recent_prices: Vec<f64>,
}

/// One projected price emitted by the predictive projector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    /// Milliseconds since the Unix epoch, strictly increasing across a forecast.
    pub timestamp: i64,
    pub predicted_price: f64,
}

impl PredictionPoint {
    /// The projected time as a timezone-aware `DateTime`.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }
}

/// One cell of the pairwise asset correlation matrix.
///
/// The matrix is sparse: pairs where either asset lacks sampled prices are
/// omitted entirely rather than reported as zero, so consumers can tell
/// "no data" apart from "no correlation".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationCell {
    /// Row index into the ranked asset list the matrix was built from.
    pub row: usize,
    /// Column index into the ranked asset list the matrix was built from.
    pub col: usize,
    pub row_symbol: String,
    pub col_symbol: String,
    /// Pearson coefficient in [-1, 1]; exactly 0.0 for degenerate inputs.
    pub coefficient: f64,
}
