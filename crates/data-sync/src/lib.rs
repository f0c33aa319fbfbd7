//! # Pulseboard Data Synchronization
//!
//! Keeps the dashboard's remote data fresh. Each distinct cache key owns one
//! refresh task on its own interval; concurrent subscribers to the same key
//! share that task and its cache slot, so at most one request per key is in
//! flight at any instant.
//!
//! ## Architectural Principles
//!
//! - **Stale-while-revalidate:** readers always see the last successful
//!   payload, including while a refresh is in flight or after one failed.
//! - **Errors are data, not exceptions:** a failed fetch is recorded on the
//!   snapshot's error flag and retried on the next tick; it never propagates
//!   to the consumer and never blanks previously fetched data.
//! - **Caller-managed lifetime:** consumers hold a `Subscription`; dropping
//!   the last one for a key cancels its timer and evicts the slot.
//!
//! ## Public API
//!
//! - `SyncService`: owner of all cache slots and refresh tasks.
//! - `Subscription`: a refcounted handle that reads snapshots.
//! - `Fetch`: the abstraction over "something that produces a JSON payload".
//! - `CacheSnapshot`: the read-only view handed to consumers.

pub mod cache;
pub mod error;
pub mod service;

// Re-export the key components to create a clean, public-facing API.
pub use cache::CacheSnapshot;
pub use error::FetchError;
pub use service::{Fetch, Subscription, SyncService};
