use serde::{Deserialize, Serialize};

/// Connection state of the single shared browser session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    /// A launch attempt is in flight (also the initial state).
    #[default]
    Launching,
    /// A session is published and usable.
    Ready,
    /// The engine connection was lost; a relaunch is pending.
    Disconnected,
    /// Terminal state: shutdown was requested, no further relaunch.
    ShuttingDown,
}

/// Outcome of whole-session warm-up.
///
/// `Disabled` and `Succeeded` both report as "warmed up" at the health
/// boundary, but are kept apart internally so tests (and logs) can tell
/// "no warm-up required" from "warm-up actually ran and worked".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WarmupOutcome {
    /// Warm-up has not run yet for the current session.
    #[default]
    Pending,
    /// Warm-up was turned off by configuration.
    Disabled,
    /// At least one warm-up visit succeeded.
    Succeeded,
    /// Every warm-up visit failed (or the warm-up page could not be opened).
    Failed,
}

impl WarmupOutcome {
    /// Collapse to the externally observable boolean.
    pub fn as_warmed_up(&self) -> bool {
        matches!(self, Self::Disabled | Self::Succeeded)
    }
}

/// Aggregate result of one warm-up run over a site list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarmupReport {
    /// Number of sites visited successfully.
    pub sites_visited: usize,
    /// True iff at least one visit succeeded.
    pub success: bool,
}

/// Point-in-time classification of all warm-up cache entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub total: usize,
    pub active: usize,
    pub expired: usize,
    pub failed: usize,
}

/// Health status derived from session state and warm-up outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Session ready and warmed up.
    Ok,
    /// Session ready, warm-up incomplete or failed.
    Degraded,
    /// No usable session (launching, disconnected or shutting down).
    Error,
}

impl HealthStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok => "ok",
            Self::Degraded => "degraded",
            Self::Error => "error",
        }
    }
}

/// Derived readiness summary, exposed verbatim as the health payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessSnapshot {
    pub status: HealthStatus,
    pub session_ready: bool,
    pub warmed_up: bool,
    pub active_context_count: usize,
    pub capacity_limit: usize,
    pub uptime_seconds: u64,
    pub cache_stats: CacheStats,
}
