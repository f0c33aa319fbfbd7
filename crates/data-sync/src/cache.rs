use crate::error::FetchError;
use core_types::EntryState;
use serde_json::Value;

/// The mutable per-key cache record. Owned exclusively by the service's
/// refresh task; everything consumers see is a cloned [`CacheSnapshot`].
#[derive(Debug, Default)]
pub(crate) struct CacheEntry {
    pub(crate) state: State,
    pub(crate) payload: Option<Value>,
    pub(crate) fetched_at: Option<i64>,
    pub(crate) last_error: Option<String>,
}

/// Internal alias so `Default` lands on `Idle`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl From<State> for EntryState {
    fn from(state: State) -> Self {
        match state {
            State::Idle => EntryState::Idle,
            State::Loading => EntryState::Loading,
            State::Success => EntryState::Success,
            State::Error => EntryState::Error,
        }
    }
}

impl CacheEntry {
    /// Flags a refresh as in flight. The previous payload stays readable.
    pub(crate) fn mark_loading(&mut self) {
        self.state = State::Loading;
    }

    /// Records a successful refresh, replacing the payload.
    pub(crate) fn apply_success(&mut self, payload: Value, fetched_at: i64) {
        self.state = State::Success;
        self.payload = Some(payload);
        self.fetched_at = Some(fetched_at);
        self.last_error = None;
    }

    /// Records a failed refresh. The last successful payload, if any, is
    /// retained so consumers degrade to last-known-good instead of blanking.
    pub(crate) fn apply_error(&mut self, error: &FetchError) {
        self.state = State::Error;
        self.last_error = Some(error.to_string());
    }

    pub(crate) fn snapshot(&self, key: &str) -> CacheSnapshot {
        CacheSnapshot {
            key: key.to_string(),
            state: self.state.into(),
            payload: self.payload.clone(),
            fetched_at: self.fetched_at,
            last_error: self.last_error.clone(),
        }
    }
}

/// A point-in-time, read-only view of one cache entry.
///
/// `payload` carries the most recent successful response even while `state`
/// is `Loading` or `Error`; `None` means the key has never fetched
/// successfully.
#[derive(Debug, Clone)]
pub struct CacheSnapshot {
    pub key: String,
    pub state: EntryState,
    pub payload: Option<Value>,
    /// Epoch milliseconds of the last successful refresh.
    pub fetched_at: Option<i64>,
    pub last_error: Option<String>,
}

impl CacheSnapshot {
    /// True when there is no payload to render yet (first fetch still
    /// pending, or every fetch so far has failed).
    pub fn is_empty(&self) -> bool {
        self.payload.is_none()
    }
}
