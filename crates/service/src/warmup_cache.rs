//! Warm-up cache
//!
//! Tracks which proxies have already been warmed up so the same proxy is not
//! re-warmed on every request. Entries are keyed by the proxy's warm-up
//! identity and expire after a TTL (default 1 hour); an expired entry is
//! treated as absent no matter what outcome it stored.

use browser_preflight_common::proxy::ProxyConfig;
use browser_preflight_common::types::CacheStats;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::info;

/// How often the background sweep removes expired entries.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(600);

#[derive(Debug, Clone)]
pub struct WarmupCacheEntry {
    pub last_attempt_at: Instant,
    pub success: bool,
    pub attempt_count: u32,
}

/// TTL-indexed record of warm-up attempts per proxy identity.
///
/// Cloning is cheap and shares the underlying map; the readiness reporter,
/// the per-proxy warm-up path and the background sweep all hold clones.
#[derive(Clone)]
pub struct WarmupCache {
    entries: Arc<RwLock<HashMap<String, WarmupCacheEntry>>>,
    ttl: Duration,
}

impl WarmupCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Check whether the proxy is warmed up and not expired.
    ///
    /// No proxy means nothing to warm, so the answer is `true`. An entry
    /// older than the TTL is deleted on the spot and reported unwarmed.
    /// Otherwise the stored outcome decides: a cached failure yields `false`,
    /// which correctly triggers a re-warm.
    pub async fn is_warmed(&self, proxy: &ProxyConfig) -> bool {
        let key = match proxy.warmup_identity() {
            Some(key) => key,
            None => return true,
        };

        let mut entries = self.entries.write().await;

        match entries.get(&key) {
            None => false,
            Some(entry) if entry.last_attempt_at.elapsed() > self.ttl => {
                entries.remove(&key);
                false
            }
            Some(entry) => entry.success,
        }
    }

    /// Record the outcome of a warm-up attempt.
    ///
    /// No-op when no proxy is configured. `attempt_count` accumulates across
    /// overwrites of the same identity.
    pub async fn record_attempt(&self, proxy: &ProxyConfig, success: bool) {
        let key = match proxy.warmup_identity() {
            Some(key) => key,
            None => return,
        };

        let mut entries = self.entries.write().await;
        let previous_attempts = entries.get(&key).map(|e| e.attempt_count).unwrap_or(0);

        entries.insert(
            key,
            WarmupCacheEntry {
                last_attempt_at: Instant::now(),
                success,
                attempt_count: previous_attempts + 1,
            },
        );
    }

    /// Look up the raw entry for a proxy, expired or not.
    pub async fn entry(&self, proxy: &ProxyConfig) -> Option<WarmupCacheEntry> {
        let key = proxy.warmup_identity()?;
        self.entries.read().await.get(&key).cloned()
    }

    /// Classify every entry against the current clock. Read-only: expired
    /// entries are counted, not evicted.
    pub async fn stats(&self) -> CacheStats {
        let entries = self.entries.read().await;

        let mut stats = CacheStats {
            total: entries.len(),
            ..Default::default()
        };

        for entry in entries.values() {
            if entry.last_attempt_at.elapsed() > self.ttl {
                stats.expired += 1;
            } else if entry.success {
                stats.active += 1;
            } else {
                stats.failed += 1;
            }
        }

        stats
    }

    /// Remove every expired entry.
    pub async fn sweep(&self) {
        let mut entries = self.entries.write().await;
        let before = entries.len();

        entries.retain(|_key, entry| entry.last_attempt_at.elapsed() <= self.ttl);

        let removed = before - entries.len();
        if removed > 0 {
            info!("Warm-up cache sweep removed {} expired entries", removed);
        }
    }

    /// Drop all entries.
    pub async fn reset(&self) {
        self.entries.write().await.clear();
    }

    /// Spawn the periodic sweep as a background task.
    ///
    /// Request-serving paths never wait on this, and as a plain spawned task
    /// it does not keep the runtime alive on its own.
    pub fn start_sweep_task(&self, interval: Duration) {
        let cache = self.clone();

        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                cache.sweep().await;
            }
        });
    }
}
