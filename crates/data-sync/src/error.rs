use thiserror::Error;

/// A failed refresh attempt, as reported by a `Fetch` implementation.
///
/// These are transient by contract: the synchronization layer records them on
/// the cache entry and waits for the next scheduled tick. They are never
/// retried eagerly and never surfaced as panics or early returns.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    #[error("Malformed response body: {0}")]
    Malformed(String),
}
