//! Warm-up executor
//!
//! Visits a list of reputable sites on a page to build a believable browser
//! profile: history, cookies, storage, and TLS session tickets with major
//! CDNs. The same sequence runs once per fresh session and once per
//! never-seen (or expired) proxy.

use crate::warmup_cache::WarmupCache;
use browser_preflight_common::engine::{PageHandle, SessionHandle};
use browser_preflight_common::proxy::ProxyConfig;
use browser_preflight_common::sites::WarmupSiteList;
use browser_preflight_common::types::{WarmupOutcome, WarmupReport};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Per-visit navigation timeout. Only the initial document parse is awaited,
/// not the full resource load.
pub const SITE_NAV_TIMEOUT: Duration = Duration::from_secs(15);

/// Pause after each successful visit to let cookies and storage settle.
pub const SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Visit every site in order on the given page.
///
/// A failed visit is logged and skipped; it never aborts the rest of the
/// sequence. The run counts as successful when at least one visit succeeded.
/// Page lifecycle is the caller's business: this function only uses the
/// handle it is given.
pub async fn run_sites(page: &dyn PageHandle, sites: &WarmupSiteList) -> WarmupReport {
    let mut sites_visited = 0;

    for site in sites.iter() {
        debug!("Warm-up visiting {}", site);

        match page.navigate(site, SITE_NAV_TIMEOUT) {
            Ok(()) => {
                tokio::time::sleep(SETTLE_DELAY).await;
                sites_visited += 1;
            }
            Err(e) => {
                warn!("Warm-up visit to {} failed: {:#}", site, e);
            }
        }
    }

    info!(
        "Warm-up run complete: {}/{} sites visited successfully",
        sites_visited,
        sites.len()
    );

    WarmupReport {
        sites_visited,
        success: sites_visited > 0,
    }
}

/// Whole-session warm-up, run once after every successful launch.
///
/// Opens a dedicated page on the fresh session, runs the site sequence, and
/// closes the page regardless of outcome (close failures are swallowed).
pub async fn warmup_session(handle: &dyn SessionHandle, sites: &WarmupSiteList) -> WarmupOutcome {
    info!("Starting session warm-up with {} sites", sites.len());

    let page = match handle.open_page() {
        Ok(page) => page,
        Err(e) => {
            warn!("Failed to open warm-up page: {:#}", e);
            return WarmupOutcome::Failed;
        }
    };

    let report = run_sites(page.as_ref(), sites).await;

    if let Err(e) = page.close() {
        debug!("Ignoring warm-up page close error: {:#}", e);
    }

    if report.success {
        WarmupOutcome::Succeeded
    } else {
        WarmupOutcome::Failed
    }
}

/// Per-proxy warm-up, run before dispatching a proxied job.
///
/// The page must already be bound to the proxy. On a cache hit (or when no
/// proxy is configured) this returns immediately; on a miss it runs the site
/// sequence and records the outcome either way, so the cache always reflects
/// the last attempt.
///
/// There is no inter-request mutual exclusion here: two concurrent requests
/// can both miss for the same identity and both run the sequence. The cache
/// ends in the last writer's outcome, which is acceptable — duplicated
/// network cost, never corrupted state.
pub async fn warmup_proxy(
    page: &dyn PageHandle,
    proxy: &ProxyConfig,
    cache: &WarmupCache,
    sites: &WarmupSiteList,
    enabled: bool,
) -> bool {
    if !enabled {
        return true;
    }

    if cache.is_warmed(proxy).await {
        if let Some(identity) = proxy.warmup_identity() {
            debug!("Proxy {} already warmed up", identity);
        }
        return true;
    }

    // is_warmed() is only false when an identity exists.
    let identity = match proxy.warmup_identity() {
        Some(identity) => identity,
        None => return true,
    };

    info!(
        "Warming up proxy {} with {} sites",
        identity,
        sites.len()
    );

    let report = run_sites(page, sites).await;
    cache.record_attempt(proxy, report.success).await;

    report.success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FakePage, FakeSession};

    fn sites(urls: &[&str]) -> WarmupSiteList {
        urls.iter().map(|u| u.to_string()).collect()
    }

    fn proxy(host: &str, port: u16) -> ProxyConfig {
        ProxyConfig {
            host: Some(host.to_string()),
            port: Some(port),
            ..Default::default()
        }
    }

    fn hour_cache() -> WarmupCache {
        WarmupCache::new(Duration::from_millis(3_600_000))
    }

    // ==================== run_sites ====================

    #[tokio::test(start_paused = true)]
    async fn test_run_sites_visits_in_order() {
        let page = FakePage::new();
        let list = sites(&["https://a.example/", "https://b.example/", "https://c.example/"]);

        let report = run_sites(&page, &list).await;

        assert!(report.success);
        assert_eq!(report.sites_visited, 3);
        assert_eq!(
            page.visits(),
            vec!["https://a.example/", "https://b.example/", "https://c.example/"]
        );
        // Page lifecycle belongs to the caller.
        assert_eq!(page.closes(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_sites_skips_failures_and_continues() {
        let page = FakePage::failing_on(&["https://b.example/", "https://d.example/"]);
        let list = sites(&[
            "https://a.example/",
            "https://b.example/",
            "https://c.example/",
            "https://d.example/",
        ]);

        let report = run_sites(&page, &list).await;

        assert!(report.success);
        assert_eq!(report.sites_visited, 2);
        assert_eq!(page.visits(), vec!["https://a.example/", "https://c.example/"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_sites_all_failures() {
        let page = FakePage::failing_on(&["https://a.example/", "https://b.example/"]);
        let list = sites(&["https://a.example/", "https://b.example/"]);

        let report = run_sites(&page, &list).await;

        assert!(!report.success);
        assert_eq!(report.sites_visited, 0);
    }

    // ==================== warmup_session ====================

    #[tokio::test(start_paused = true)]
    async fn test_warmup_session_success_closes_page() {
        let session = FakeSession::new();
        let list = WarmupSiteList::default();

        let outcome = warmup_session(&session, &list).await;

        assert_eq!(outcome, WarmupOutcome::Succeeded);
        assert_eq!(session.visits().len(), 3);
        assert_eq!(session.pages_closed(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_warmup_session_failure_still_closes_page() {
        let session =
            FakeSession::with_failing_sites(&["https://a.example/", "https://b.example/"]);
        let list = sites(&["https://a.example/", "https://b.example/"]);

        let outcome = warmup_session(&session, &list).await;

        assert_eq!(outcome, WarmupOutcome::Failed);
        assert_eq!(session.pages_closed(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_warmup_session_swallows_close_error() {
        let session = FakeSession::new();
        session.set_fail_page_close();

        let outcome = warmup_session(&session, &WarmupSiteList::default()).await;

        assert_eq!(outcome, WarmupOutcome::Succeeded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_warmup_session_page_open_failure() {
        let session = FakeSession::new();
        session.set_fail_page_open();

        let outcome = warmup_session(&session, &WarmupSiteList::default()).await;

        assert_eq!(outcome, WarmupOutcome::Failed);
        assert!(session.visits().is_empty());
    }

    // ==================== warmup_proxy ====================

    #[tokio::test(start_paused = true)]
    async fn test_warmup_proxy_disabled_skips_everything() {
        let page = FakePage::new();
        let cache = hour_cache();
        let p = proxy("p.example.com", 8080);

        let ok = warmup_proxy(&page, &p, &cache, &WarmupSiteList::default(), false).await;

        assert!(ok);
        assert!(page.visits().is_empty());
        assert!(cache.entry(&p).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_warmup_proxy_no_proxy_configured() {
        let page = FakePage::new();
        let cache = hour_cache();

        let ok = warmup_proxy(
            &page,
            &ProxyConfig::default(),
            &cache,
            &WarmupSiteList::default(),
            true,
        )
        .await;

        assert!(ok);
        assert!(page.visits().is_empty());
        assert_eq!(cache.stats().await.total, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_warmup_proxy_miss_runs_and_records() {
        let page = FakePage::new();
        let cache = hour_cache();
        let p = proxy("p.example.com", 8080);

        let ok = warmup_proxy(&page, &p, &cache, &WarmupSiteList::default(), true).await;

        assert!(ok);
        assert_eq!(page.visits().len(), 3);
        let entry = cache.entry(&p).await.expect("attempt recorded");
        assert!(entry.success);
        assert_eq!(entry.attempt_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_warmup_proxy_hit_short_circuits() {
        let page = FakePage::new();
        let cache = hour_cache();
        let p = proxy("p.example.com", 8080);

        cache.record_attempt(&p, true).await;

        let ok = warmup_proxy(&page, &p, &cache, &WarmupSiteList::default(), true).await;

        assert!(ok);
        assert!(page.visits().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_warmup_proxy_cached_failure_triggers_rewarm() {
        // A cached failed attempt must not short-circuit the way a cached
        // success does.
        let cache = hour_cache();
        let p = proxy("p.example.com", 8080);
        let list = sites(&["https://a.example/"]);

        let failing_page = FakePage::failing_on(&["https://a.example/"]);
        assert!(!warmup_proxy(&failing_page, &p, &cache, &list, true).await);
        assert_eq!(cache.entry(&p).await.unwrap().attempt_count, 1);

        let working_page = FakePage::new();
        assert!(warmup_proxy(&working_page, &p, &cache, &list, true).await);
        assert_eq!(working_page.visits().len(), 1);

        let entry = cache.entry(&p).await.unwrap();
        assert!(entry.success);
        assert_eq!(entry.attempt_count, 2);
    }
}
