pub mod enums;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::EntryState;
pub use structs::{Asset, CorrelationCell, PredictionPoint, TimeSeriesPoint};
