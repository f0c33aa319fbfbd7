use data_sync::FetchError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to execute the HTTP request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The API returned status {0} for {1}")]
    Status(u16, String),

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),
}

// Fetch failures flow into the synchronization layer's error flag rather
// than propagating, so the mapping flattens everything to its taxonomy.
impl From<ApiError> for FetchError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Request(e) => FetchError::Transport(e.to_string()),
            ApiError::Status(code, _) => FetchError::Status(code),
            ApiError::Deserialization(msg) => FetchError::Malformed(msg),
        }
    }
}
