//! Readiness reporter
//!
//! Derives a point-in-time health summary from the shared session state and
//! the warm-up cache, and serves it at `GET /health`. Strictly read-only:
//! nothing here mutates what it reports on.

use crate::session::ReadinessContext;
use crate::warmup_cache::WarmupCache;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use browser_preflight_common::types::{HealthStatus, ReadinessSnapshot};
use std::sync::Arc;

/// Shared state for the health surface.
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<ReadinessContext>,
    pub cache: WarmupCache,
}

/// Derive the current readiness snapshot.
///
/// `ok` needs a ready and warmed-up session; a ready but unwarmed session is
/// `degraded`; anything else (launching, disconnected, shutting down) is
/// `error`.
pub async fn snapshot(ctx: &ReadinessContext, cache: &WarmupCache) -> ReadinessSnapshot {
    let session_ready = ctx.session_ready().await;
    let warmed_up = ctx.warmup_outcome().await.as_warmed_up();

    let status = if session_ready && warmed_up {
        HealthStatus::Ok
    } else if session_ready {
        HealthStatus::Degraded
    } else {
        HealthStatus::Error
    };

    ReadinessSnapshot {
        status,
        session_ready,
        warmed_up,
        active_context_count: ctx.active_context_count(),
        capacity_limit: ctx.capacity_limit(),
        uptime_seconds: ctx.uptime_seconds(),
        cache_stats: cache.stats().await,
    }
}

/// Router exposing `GET /health`.
pub fn health_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(state)
}

/// 200 when a session is published, 503 otherwise; the body carries the full
/// snapshot either way.
async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<ReadinessSnapshot>) {
    let snapshot = snapshot(&state.ctx, &state.cache).await;

    let code = if snapshot.session_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(snapshot))
}
