//! Time-bounded cache for the last full catalog load.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::loader::{CatalogSnapshot, LoadError};

#[derive(Debug)]
struct CachedSnapshot {
    snapshot: Arc<CatalogSnapshot>,
    loaded_at: Instant,
}

/// Holds the last snapshot and the instant it was loaded.
///
/// An entry is served while younger than the TTL and reloaded afterwards.
/// Loads run under the slot lock, so concurrent callers that find the entry
/// stale wait for one load instead of starting their own. A failed load
/// leaves the previous (stale) entry in place and the next call tries again.
#[derive(Debug)]
pub struct SnapshotCache {
    ttl: Duration,
    slot: Mutex<Option<CachedSnapshot>>,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get_or_try_load<F>(&self, load: F) -> Result<Arc<CatalogSnapshot>, LoadError>
    where
        F: FnOnce() -> Result<CatalogSnapshot, LoadError>,
    {
        self.get_or_try_load_at(Instant::now(), load)
    }

    /// Same as [`get_or_try_load`](Self::get_or_try_load) with an explicit
    /// clock reading.
    pub fn get_or_try_load_at<F>(
        &self,
        now: Instant,
        load: F,
    ) -> Result<Arc<CatalogSnapshot>, LoadError>
    where
        F: FnOnce() -> Result<CatalogSnapshot, LoadError>,
    {
        let mut slot = self.slot.lock().map_err(|_| LoadError::CachePoisoned)?;

        if let Some(cached) = slot.as_ref() {
            if now.saturating_duration_since(cached.loaded_at) < self.ttl {
                return Ok(Arc::clone(&cached.snapshot));
            }
            tracing::debug!(load_id = %cached.snapshot.load_id, "cached snapshot expired");
        }

        let snapshot = Arc::new(load()?);
        *slot = Some(CachedSnapshot {
            snapshot: Arc::clone(&snapshot),
            loaded_at: now,
        });
        Ok(snapshot)
    }

    /// The cached snapshot regardless of age, if any.
    pub fn peek(&self) -> Option<Arc<CatalogSnapshot>> {
        self.slot
            .lock()
            .ok()
            .and_then(|slot| slot.as_ref().map(|c| Arc::clone(&c.snapshot)))
    }

    pub fn invalidate(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}
