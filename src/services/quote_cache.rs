use crate::types::OhlcPoint;
use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Thread-safe TTL cache for fetched OHLC series.
///
/// Entries are keyed by symbol, range and interval so a 5-minute
/// intraday series and a 5-day hourly series for the same ticker are
/// cached independently. Expired entries are dropped lazily on access.
pub struct QuoteCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

struct CacheEntry {
    series: Vec<OhlcPoint>,
    expires_at: Instant,
}

impl QuoteCache {
    /// Create a new cache with the given time-to-live.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    fn key(symbol: &str, range: &str, interval: &str) -> String {
        format!("{}:{}:{}", symbol.to_uppercase(), range, interval)
    }

    /// Get a cached series if present and not expired.
    pub fn get(&self, symbol: &str, range: &str, interval: &str) -> Option<Vec<OhlcPoint>> {
        let key = Self::key(symbol, range, interval);
        let entry = self.entries.get(&key)?;
        if entry.expires_at > Instant::now() {
            Some(entry.series.clone())
        } else {
            drop(entry);
            self.entries.remove(&key);
            None
        }
    }

    /// Store a fetched series.
    pub fn insert(&self, symbol: &str, range: &str, interval: &str, series: Vec<OhlcPoint>) {
        self.entries.insert(
            Self::key(symbol, range, interval),
            CacheEntry {
                series,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Check whether a fresh series is cached.
    pub fn contains(&self, symbol: &str, range: &str, interval: &str) -> bool {
        self.get(symbol, range, interval).is_some()
    }

    /// Remove all expired entries.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.expires_at > now);
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of entries, including not-yet-purged expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
