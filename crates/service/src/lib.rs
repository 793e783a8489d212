mod chrome;
mod readiness;
mod session;
mod supervisor;
mod warmup;
mod warmup_cache;

#[cfg(test)]
mod testutil;

pub use chrome::ChromeEngine;
pub use readiness::{health_router, snapshot, AppState};
pub use session::{ContextLease, ReadinessContext};
pub use supervisor::Supervisor;
pub use warmup::{run_sites, warmup_proxy, warmup_session, SETTLE_DELAY, SITE_NAV_TIMEOUT};
pub use warmup_cache::{WarmupCache, WarmupCacheEntry, SWEEP_INTERVAL};

use anyhow::Result;
use browser_preflight_common::config::ServiceConfig;
use browser_preflight_common::engine::BrowserEngine;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Run the readiness/warm-up service with the given configuration and engine.
///
/// Wires up the shared readiness context, the warm-up cache with its
/// background sweep, the lifecycle supervisor, and the health endpoint, then
/// serves until ctrl-c/SIGTERM.
pub async fn run_service(config: ServiceConfig, engine: Arc<dyn BrowserEngine>) -> Result<()> {
    info!(
        engine = engine.name(),
        "Starting browser-preflight (capacity: {}, warm-up sites: {})",
        config.capacity_limit,
        config.warmup.sites.len()
    );

    let shutdown = CancellationToken::new();
    let ctx = Arc::new(ReadinessContext::new(config.capacity_limit));

    let cache = WarmupCache::new(config.warmup.cache_ttl);
    cache.start_sweep_task(SWEEP_INTERVAL);

    let supervisor = Supervisor::new(
        engine,
        ctx.clone(),
        config.warmup.sites.clone(),
        config.warmup.session_warmup_enabled,
        config.browser.relaunch_delay,
        shutdown.clone(),
    );
    let supervisor_handle = supervisor.spawn();

    let app = health_router(AppState {
        ctx: ctx.clone(),
        cache: cache.clone(),
    });

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Health endpoint listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown requested, stopping supervisor...");
    shutdown.cancel();
    supervisor_handle.await?;

    info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C signal");
        },
        _ = terminate => {
            warn!("Received SIGTERM signal");
        },
    }
}
