//! TTL-based caching of the session catalog.

use super::{CatalogError, CatalogProvider};
use crate::planner::SessionRecord;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// A cached catalog with metadata.
#[derive(Clone)]
struct CachedCatalog {
    records: Arc<Vec<SessionRecord>>,
    fetched_at: Instant,
}

/// Caches the catalog returned by a provider for a fixed time-to-live.
///
/// Concurrent misses are collapsed into a single fetch.
pub struct CatalogCache<P> {
    provider: P,
    ttl: Duration,
    entry: RwLock<Option<CachedCatalog>>,
    refresh_lock: tokio::sync::Mutex<()>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<P: CatalogProvider> CatalogCache<P> {
    /// Creates a new cache with the specified TTL.
    pub fn new(provider: P, ttl: Duration) -> Self {
        Self {
            provider,
            ttl,
            entry: RwLock::new(None),
            refresh_lock: tokio::sync::Mutex::new(()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns the catalog, fetching it if the cached copy is missing,
    /// expired, or `force_refresh` is set.
    pub async fn get(&self, force_refresh: bool) -> Result<Arc<Vec<SessionRecord>>, CatalogError> {
        if !force_refresh {
            if let Some(records) = self.fresh() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(records);
            }
        }

        let _guard = self.refresh_lock.lock().await;

        // Double-check after acquiring the lock; another caller may have refreshed
        if !force_refresh {
            if let Some(records) = self.fresh() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(records);
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let start = Instant::now();
        let records = Arc::new(self.provider.fetch().await?);
        info!(
            records = records.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Catalog refreshed"
        );

        let mut entry = match self.entry.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *entry = Some(CachedCatalog {
            records: records.clone(),
            fetched_at: Instant::now(),
        });

        Ok(records)
    }

    /// Drops the cached catalog so the next `get` fetches again.
    pub fn invalidate(&self) {
        debug!("Invalidating catalog cache");
        match self.entry.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }

    /// Gets cache statistics.
    pub fn stats(&self) -> CacheStats {
        let entry = match self.entry.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };

        CacheStats {
            cached: entry.is_some(),
            expired: entry
                .as_ref()
                .is_some_and(|e| e.fetched_at.elapsed() >= self.ttl),
            records: entry.as_ref().map_or(0, |e| e.records.len()),
            age_secs: entry.as_ref().map(|e| e.fetched_at.elapsed().as_secs()),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn fresh(&self) -> Option<Arc<Vec<SessionRecord>>> {
        let entry = match self.entry.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entry
            .as_ref()
            .filter(|e| e.fetched_at.elapsed() < self.ttl)
            .map(|e| e.records.clone())
    }
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub cached: bool,
    pub expired: bool,
    pub records: usize,
    pub age_secs: Option<u64>,
    pub hits: u64,
    pub misses: u64,
}
