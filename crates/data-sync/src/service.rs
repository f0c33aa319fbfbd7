use crate::cache::{CacheEntry, CacheSnapshot};
use crate::error::FetchError;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;

/// The generic, abstract interface for a remote data source.
///
/// The service only ever sees raw JSON; typed decoding happens in the
/// consumer against the snapshot. This keeps one service instance able to
/// drive every endpoint in the system, and lets tests substitute scripted
/// fetchers for the HTTP client.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self) -> Result<Value, FetchError>;
}

/// One cache slot: the entry itself plus the bookkeeping that ties its
/// refresh task and its subscribers together.
struct Slot {
    key: String,
    entry: Mutex<CacheEntry>,
    /// Only mutated while holding the service's slot-map lock, so refcount
    /// changes cannot race slot eviction.
    subscribers: AtomicUsize,
    /// Wakes the refresh task out of its timer wait on eviction.
    shutdown: Notify,
}

impl Slot {
    fn lock_entry(&self) -> MutexGuard<'_, CacheEntry> {
        // A poisoned lock only means a writer panicked mid-update; the entry
        // data is still plain values, so recover rather than propagate.
        self.entry.lock().unwrap_or_else(|e| e.into_inner())
    }
}

struct Inner {
    slots: Mutex<HashMap<String, Arc<Slot>>>,
}

impl Inner {
    fn lock_slots(&self) -> MutexGuard<'_, HashMap<String, Arc<Slot>>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// True while `slot` is still the live slot for its key. A refresh task
    /// checks this after every fetch so that a request which raced eviction
    /// completes harmlessly and its result is discarded.
    fn is_current(&self, slot: &Arc<Slot>) -> bool {
        self.lock_slots()
            .get(&slot.key)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
    }

    /// Drops one subscriber from `slot`, evicting it when none remain.
    fn release(&self, slot: &Arc<Slot>) {
        let mut slots = self.lock_slots();
        if slot.subscribers.fetch_sub(1, Ordering::SeqCst) == 1 {
            if let Some(current) = slots.get(&slot.key) {
                if Arc::ptr_eq(current, slot) {
                    slots.remove(&slot.key);
                }
            }
            slot.shutdown.notify_one();
            tracing::debug!(key = %slot.key, "last subscriber gone, slot evicted");
        }
    }
}

/// Owns every cache slot and refresh task in the system.
///
/// Cloning is cheap and every clone drives the same set of slots.
#[derive(Clone)]
pub struct SyncService {
    inner: Arc<Inner>,
}

impl Default for SyncService {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                slots: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Subscribes to `key`, spawning its refresh task if this is the first
    /// subscriber. Later subscribers to the same key attach to the existing
    /// slot and cycle; their `fetcher` and `interval` arguments are ignored,
    /// since a key's identity is expected to pin down both.
    ///
    /// Parameterized endpoints must bake their parameters into the key:
    /// changing a parameter means subscribing to a different key, which
    /// tears the old timer down (once its other subscribers, if any, are
    /// gone) rather than repointing it.
    pub fn subscribe(
        &self,
        key: impl Into<String>,
        fetcher: Arc<dyn Fetch>,
        interval: Duration,
    ) -> Subscription {
        let key = key.into();
        let mut slots = self.inner.lock_slots();

        let slot = match slots.get(&key) {
            Some(slot) => {
                slot.subscribers.fetch_add(1, Ordering::SeqCst);
                Arc::clone(slot)
            }
            None => {
                let slot = Arc::new(Slot {
                    key: key.clone(),
                    entry: Mutex::new(CacheEntry::default()),
                    subscribers: AtomicUsize::new(1),
                    shutdown: Notify::new(),
                });
                slots.insert(key.clone(), Arc::clone(&slot));
                tokio::spawn(run_refresh_loop(
                    Arc::clone(&self.inner),
                    Arc::clone(&slot),
                    fetcher,
                    interval,
                ));
                tracing::debug!(%key, interval_ms = interval.as_millis() as u64, "refresh task started");
                slot
            }
        };
        drop(slots);

        Subscription {
            inner: Arc::clone(&self.inner),
            slot,
        }
    }

    /// The number of keys with live refresh tasks, for diagnostics.
    pub fn active_keys(&self) -> usize {
        self.inner.lock_slots().len()
    }
}

/// The per-key refresh cycle.
///
/// Cycles are strictly sequential within a key: the next tick is not awaited
/// until the previous fetch has resolved, so there is never more than one
/// request in flight for a slot. Missed ticks are delayed, not bursted.
async fn run_refresh_loop(
    inner: Arc<Inner>,
    slot: Arc<Slot>,
    fetcher: Arc<dyn Fetch>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = slot.shutdown.notified() => break,
        }

        slot.lock_entry().mark_loading();

        let result = fetcher.fetch().await;

        // The slot may have been evicted while the request was in flight.
        // The request was allowed to complete, but applying its result now
        // would resurrect a cache entry nobody is subscribed to.
        if !inner.is_current(&slot) {
            tracing::debug!(key = %slot.key, "discarding fetch result for evicted slot");
            break;
        }

        match result {
            Ok(payload) => {
                slot.lock_entry()
                    .apply_success(payload, Utc::now().timestamp_millis());
            }
            Err(error) => {
                tracing::warn!(key = %slot.key, %error, "refresh failed, retaining last-known-good payload");
                slot.lock_entry().apply_error(&error);
            }
        }
    }
}

/// A live, refcounted handle onto one cache slot.
///
/// Dropping the handle unsubscribes; dropping the last handle for a key
/// cancels its timer and evicts the slot.
pub struct Subscription {
    inner: Arc<Inner>,
    slot: Arc<Slot>,
}

impl Subscription {
    pub fn key(&self) -> &str {
        &self.slot.key
    }

    /// A point-in-time copy of the entry. Never blocks on in-flight fetches.
    pub fn snapshot(&self) -> CacheSnapshot {
        self.slot.lock_entry().snapshot(&self.slot.key)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.inner.release(&self.slot);
    }
}
