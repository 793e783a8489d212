//! # browser-preflight
//!
//! A readiness and warm-up layer in front of a browser-automation engine.
//! It keeps exactly one usable browser session alive, builds believable
//! browsing history for the session and for individual egress proxies, and
//! caches which proxies are already warmed so they are not re-warmed on
//! every use.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use browser_preflight::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServiceConfig::default();
//!     let engine = Arc::new(ChromeEngine::new(config.browser.clone()));
//!     run_service(config, engine).await
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Supervisor**: owns the single browser session; launch, warm-up,
//!   disconnect detection, relaunch with backoff
//! - **Warm-up executor**: visits a site list on a page, tolerating
//!   individual failures
//! - **Warm-up cache**: TTL-indexed record of warmed proxies
//! - **Readiness reporter**: derives the health snapshot served at `/health`
//! - **Common**: shared types, configuration, and the engine trait seam

/// Re-export of common types and configuration
pub use browser_preflight_common as common;

/// Re-export of the running service
pub use browser_preflight_service as service;

/// Convenient re-exports of commonly used types
pub mod prelude {
    // Engine seam
    pub use crate::common::engine::{BrowserEngine, PageHandle, SessionHandle};

    // Configuration types
    pub use crate::common::config::{BrowserConfig, ServiceConfig, WarmupConfig};
    pub use crate::common::proxy::{ProxyConfig, ProxyScheme};
    pub use crate::common::sites::{WarmupSiteList, DEFAULT_WARMUP_SITES};

    // Shared types
    pub use crate::common::types::{
        CacheStats, ConnectionState, HealthStatus, ReadinessSnapshot, WarmupOutcome, WarmupReport,
    };

    // Service functionality
    pub use crate::service::{
        run_service, run_sites, snapshot, warmup_proxy, warmup_session, ChromeEngine,
        ContextLease, ReadinessContext, Supervisor, WarmupCache,
    };
}
