use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::aircraft::AircraftState;
use crate::airport::Airport;
use crate::conflict::{assess, ThresholdTable};
use crate::source::SnapshotSource;

use super::error::CacheError;

/// Assessed snapshot as handed out by the cache.
#[derive(Debug, Clone)]
pub struct CachedSnapshot {
    pub airport: String,
    pub fetched_at: DateTime<Utc>,
    /// Set when a refresh failed and the last good snapshot is served instead
    pub stale: bool,
    pub aircraft: Arc<Vec<AircraftState>>,
}

#[derive(Debug)]
struct Entry {
    refreshed: Instant,
    fetched_at: DateTime<Utc>,
    aircraft: Arc<Vec<AircraftState>>,
}

impl Entry {
    fn snapshot(&self, airport: &str, stale: bool) -> CachedSnapshot {
        CachedSnapshot {
            airport: airport.to_string(),
            fetched_at: self.fetched_at,
            stale,
            aircraft: self.aircraft.clone(),
        }
    }
}

#[derive(Default)]
struct Slot {
    refreshes: AtomicU64,
    entry: Mutex<Option<Entry>>,
}

/// Last good snapshot per airport with TTL-based refresh. At most one
/// refresh per airport is in flight; callers arriving meanwhile wait for it
/// and reuse its result.
pub struct SnapshotCache {
    source: Arc<dyn SnapshotSource>,
    thresholds: ThresholdTable,
    ttl: Duration,
    slots: StdMutex<HashMap<String, Arc<Slot>>>,
}

impl SnapshotCache {
    pub fn new(source: Arc<dyn SnapshotSource>, thresholds: ThresholdTable, ttl: Duration) -> Self {
        Self {
            source,
            thresholds,
            ttl,
            slots: StdMutex::new(HashMap::new()),
        }
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    fn slot(&self, key: &str) -> Arc<Slot> {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.entry(key.to_string()).or_default().clone()
    }

    /// Returns the snapshot for `airport`, refreshing it when it is older than
    /// the TTL or when `force` is set.
    pub async fn get(&self, airport: &Airport, force: bool) -> Result<CachedSnapshot, CacheError> {
        let key = airport.code.as_str();
        let slot = self.slot(key);
        let seen = slot.refreshes.load(Ordering::Acquire);

        let mut entry = slot.entry.lock().await;

        if let Some(current) = entry.as_ref() {
            let fresh = Instant::now().duration_since(current.refreshed) < self.ttl;
            // a refresh that completed while we waited satisfies a forced request too
            let refreshed_meanwhile = slot.refreshes.load(Ordering::Acquire) != seen;
            if refreshed_meanwhile || (fresh && !force) {
                return Ok(current.snapshot(key, false));
            }
        }

        match self.source.fetch(airport).await {
            Ok(mut aircraft) => {
                assess(&mut aircraft, &self.thresholds);
                let refreshed = Entry {
                    refreshed: Instant::now(),
                    fetched_at: Utc::now(),
                    aircraft: Arc::new(aircraft),
                };
                let snapshot = refreshed.snapshot(key, false);
                *entry = Some(refreshed);
                slot.refreshes.fetch_add(1, Ordering::Release);
                Ok(snapshot)
            }
            Err(e) => match entry.as_ref() {
                Some(last_good) => {
                    log::warn!("refresh for {} failed, serving last good snapshot: {}", key, e);
                    Ok(last_good.snapshot(key, true))
                }
                None => Err(CacheError::Fetch {
                    airport: key.to_string(),
                    source: e,
                }),
            },
        }
    }
}
