use serde::{Deserialize, Serialize};

/// The lifecycle state of a cached remote payload.
///
/// An entry starts `Idle`, flips to `Loading` on every refresh tick, and then
/// settles into `Success` or `Error`. A `Loading` or `Error` entry may still
/// carry the payload from an earlier successful refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryState {
    Idle,
    Loading,
    Success,
    Error,
}

impl EntryState {
    /// Returns true while a refresh for the entry is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, EntryState::Loading)
    }

    /// Returns true once the last completed refresh failed.
    pub fn is_error(&self) -> bool {
        matches!(self, EntryState::Error)
    }
}
