//! In-memory cache for loaded static assets
//!
//! Hashing an asset for its ETag means reading the whole file, so loaded
//! assets are kept in a size-bounded moka cache. Entries are keyed by path and
//! are only reused while the file's length and modification time match what
//! was recorded at load time; a redeploy that rewrites a file in place is
//! picked up on the next request.

use metrics::{counter, gauge};
use moka::future::Cache;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::types::Asset;

/// Configuration for the asset cache
#[derive(Debug, Clone)]
pub struct AssetCacheConfig {
    /// Maximum cache size in bytes (default: 64MB)
    pub max_size_bytes: u64,
    /// Time-to-idle: evict entries not accessed for this duration (default: 1 hour)
    pub tti: Duration,
}

impl Default for AssetCacheConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: 64 * 1024 * 1024, // 64 MB
            tti: Duration::from_secs(3600),   // 1 hour
        }
    }
}

/// Thread-safe asset cache using moka, weighted by body size
pub struct AssetCache {
    cache: Cache<PathBuf, Asset>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl AssetCache {
    pub fn new(config: AssetCacheConfig) -> Self {
        let cache = Cache::builder()
            .weigher(|_key: &PathBuf, value: &Asset| -> u32 {
                value.body.len().min(u32::MAX as usize) as u32
            })
            .max_capacity(config.max_size_bytes)
            .time_to_idle(config.tti)
            .build();

        Self {
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn with_default_config() -> Self {
        Self::new(AssetCacheConfig::default())
    }

    /// Get a cached asset if present and still matching the file on disk
    pub async fn get(&self, path: &Path, len: u64, modified: u128) -> Option<Asset> {
        let fresh = self
            .cache
            .get(path)
            .await
            .filter(|asset| asset.len == len && asset.modified == modified);

        if fresh.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            counter!("spa_host_asset_cache_hits_total").increment(1);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            counter!("spa_host_asset_cache_misses_total").increment(1);
        }

        fresh
    }

    pub async fn insert(&self, path: PathBuf, asset: Asset) {
        self.cache.insert(path, asset).await;
        gauge!("spa_host_asset_cache_entry_count").set(self.cache.entry_count() as f64);
    }

    /// Get cache statistics
    pub fn stats(&self) -> AssetCacheStats {
        AssetCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetCacheStats {
    pub hits: u64,
    pub misses: u64,
}
