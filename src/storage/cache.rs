//! Snapshot cache — time-boxed view of the full record set.
//!
//! The only mutable shared state in the core. A mutex guards the whole
//! check-then-reload sequence, so concurrent callers hitting a stale
//! snapshot trigger at most one reload; late arrivals block briefly and
//! then see the fresh snapshot. Replacement is all-or-nothing.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::record::Record;

struct Snapshot {
    records: Arc<Vec<Record>>,
    captured_at: Instant,
}

pub struct SnapshotCache {
    inner: Mutex<Option<Snapshot>>,
    ttl: Duration,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(None),
            ttl,
        }
    }

    /// Return the cached snapshot, reloading through `reload` when absent
    /// or older than the TTL. The lock is held across the reload — that is
    /// what makes the reload single-flight.
    pub fn get_or_reload<F>(&self, reload: F) -> Arc<Vec<Record>>
    where
        F: FnOnce() -> Vec<Record>,
    {
        let mut guard = match self.inner.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(snapshot) = guard.as_ref() {
            if snapshot.captured_at.elapsed() < self.ttl {
                return snapshot.records.clone();
            }
            tracing::debug!(age_secs = snapshot.captured_at.elapsed().as_secs(), "Snapshot stale, reloading");
        }

        let records = Arc::new(reload());
        *guard = Some(Snapshot {
            records: records.clone(),
            captured_at: Instant::now(),
        });
        records
    }

    /// Drop the snapshot so the next call reloads regardless of age.
    pub fn invalidate(&self) {
        if let Ok(mut guard) = self.inner.lock() {
            *guard = None;
        }
    }
}
