use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Cannot project from an empty price series")]
    EmptySeries,

    #[error("Invalid parameter for {0}: {1}")]
    InvalidParameter(String, String),
}
