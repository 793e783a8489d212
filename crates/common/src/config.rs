use crate::proxy::ProxyConfig;
use crate::sites::WarmupSiteList;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level service configuration.
///
/// Values are typically loaded from environment variables by the binary; the
/// defaults here are the documented fallbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Port for the health HTTP surface.
    pub http_port: u16,

    /// Maximum concurrent browser contexts the dispatch layer may lease.
    pub capacity_limit: usize,

    pub warmup: WarmupConfig,
    pub browser: BrowserConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            http_port: 3000,
            capacity_limit: 20,
            warmup: WarmupConfig::default(),
            browser: BrowserConfig::default(),
        }
    }
}

/// Warm-up behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarmupConfig {
    /// Run whole-session warm-up after every successful launch.
    /// When off, the session reports as warmed without any visits.
    pub session_warmup_enabled: bool,

    /// Run per-proxy warm-up before dispatching proxied jobs.
    pub proxy_warmup_enabled: bool,

    /// Sites visited by both whole-session and per-proxy warm-up.
    pub sites: WarmupSiteList,

    /// Age beyond which a warm-up cache entry is treated as absent.
    #[serde(with = "humantime_serde")]
    pub cache_ttl: Duration,
}

impl Default for WarmupConfig {
    fn default() -> Self {
        Self {
            session_warmup_enabled: true,
            proxy_warmup_enabled: true,
            sites: WarmupSiteList::default(),
            cache_ttl: Duration::from_millis(3_600_000), // 1 hour
        }
    }
}

/// Browser engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// true = headless (faster, more detectable), false = headfull (better stealth)
    pub headless: bool,

    /// Path to browser binary. If None, uses default Chrome/Chromium auto-detection.
    pub browser_path: Option<PathBuf>,

    /// Egress proxy the whole browser is launched behind, if any.
    pub proxy: ProxyConfig,

    /// Fixed delay before retrying a failed launch or relaunching after a
    /// disconnect.
    #[serde(with = "humantime_serde")]
    pub relaunch_delay: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            browser_path: None,
            proxy: ProxyConfig::default(),
            relaunch_delay: Duration::from_secs(3),
        }
    }
}
