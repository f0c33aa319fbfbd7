//! # Pulseboard Analytics
//!
//! Derived-data layer of the dashboard: turns raw price series into the
//! correlation matrix and the trend forecast the views render.
//!
//! ## Architectural Principles
//!
//! - **Pure logic crate:** no I/O and no knowledge of where the series came
//!   from. It depends only on `core-types` and `statistics`.
//! - **Recompute, never mutate:** outputs are recomputed in full on every
//!   change to their source data. Nothing in this crate holds identity or
//!   state between calls.
//!
//! ## Public API
//!
//! - `CorrelationMatrixBuilder` + `RankingPolicy`: the pairwise matrix over
//!   a ranked subset of assets.
//! - `Projector` + `TrendRule`: the naive trend-extrapolation forecast.
//! - `AnalyticsError`: the specific error types returned from this crate.

pub mod correlation;
pub mod error;
pub mod projector;

// Re-export the key components to create a clean, public-facing API.
pub use correlation::{CorrelationMatrixBuilder, ListingOrder, RankingPolicy};
pub use error::AnalyticsError;
pub use projector::{Projector, TrendRule};
