//! Shared readiness state
//!
//! One [`ReadinessContext`] is created per process and passed by reference to
//! every component: the supervisor mutates the session slot, the dispatch
//! layer leases context slots, and the readiness reporter only reads.

use browser_preflight_common::engine::SessionHandle;
use browser_preflight_common::types::{ConnectionState, WarmupOutcome};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Process-wide session and capacity state.
///
/// At most one live session handle exists at a time: the supervisor clears
/// the slot before any relaunch attempt and republishes under a new
/// generation. The generation counter lets late disconnect signals from a
/// superseded handle be recognized and dropped.
pub struct ReadinessContext {
    slot: RwLock<SessionSlot>,
    active_contexts: AtomicUsize,
    capacity_limit: usize,
    started_at: Instant,
}

#[derive(Default)]
struct SessionSlot {
    connection: ConnectionState,
    warmup: WarmupOutcome,
    handle: Option<Arc<dyn SessionHandle>>,
    generation: u64,
}

impl ReadinessContext {
    pub fn new(capacity_limit: usize) -> Self {
        Self {
            slot: RwLock::new(SessionSlot::default()),
            active_contexts: AtomicUsize::new(0),
            capacity_limit,
            started_at: Instant::now(),
        }
    }

    /// Clear any previous session and enter `Launching`.
    pub async fn begin_launch(&self) {
        let mut slot = self.slot.write().await;
        slot.handle = None;
        slot.connection = ConnectionState::Launching;
        slot.warmup = WarmupOutcome::Pending;
    }

    /// Publish a freshly launched session and enter `Ready`.
    ///
    /// Returns the new session generation.
    pub async fn publish_ready(&self, handle: Arc<dyn SessionHandle>) -> u64 {
        let mut slot = self.slot.write().await;
        slot.generation += 1;
        slot.handle = Some(handle);
        slot.connection = ConnectionState::Ready;
        slot.warmup = WarmupOutcome::Pending;
        slot.generation
    }

    pub async fn set_warmup_outcome(&self, outcome: WarmupOutcome) {
        self.slot.write().await.warmup = outcome;
    }

    /// Record a disconnect for the given session generation.
    ///
    /// Returns false (and changes nothing) when the generation has already
    /// been superseded or shutdown is in progress.
    pub async fn mark_disconnected(&self, generation: u64) -> bool {
        let mut slot = self.slot.write().await;
        if slot.generation != generation || slot.connection == ConnectionState::ShuttingDown {
            return false;
        }
        slot.handle = None;
        slot.connection = ConnectionState::Disconnected;
        true
    }

    /// Enter the terminal state. No session will be published after this.
    pub async fn mark_shutting_down(&self) {
        let mut slot = self.slot.write().await;
        slot.handle = None;
        slot.connection = ConnectionState::ShuttingDown;
    }

    pub async fn connection_state(&self) -> ConnectionState {
        self.slot.read().await.connection
    }

    pub async fn warmup_outcome(&self) -> WarmupOutcome {
        self.slot.read().await.warmup
    }

    pub async fn session_ready(&self) -> bool {
        let slot = self.slot.read().await;
        slot.connection == ConnectionState::Ready && slot.handle.is_some()
    }

    /// Current live session handle, if one is published.
    pub async fn current_session(&self) -> Option<Arc<dyn SessionHandle>> {
        self.slot.read().await.handle.clone()
    }

    pub async fn generation(&self) -> u64 {
        self.slot.read().await.generation
    }

    /// Lease a context slot for one request.
    ///
    /// Returns `None` at capacity; the dispatch layer answers 429 in that
    /// case. The slot is released when the lease is dropped.
    pub fn acquire_context(self: &Arc<Self>) -> Option<ContextLease> {
        let mut current = self.active_contexts.load(Ordering::SeqCst);
        loop {
            if current >= self.capacity_limit {
                return None;
            }
            match self.active_contexts.compare_exchange(
                current,
                current + 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return Some(ContextLease { ctx: self.clone() }),
                Err(observed) => current = observed,
            }
        }
    }

    pub fn active_context_count(&self) -> usize {
        self.active_contexts.load(Ordering::SeqCst)
    }

    pub fn capacity_limit(&self) -> usize {
        self.capacity_limit
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// RAII lease on one context slot.
pub struct ContextLease {
    ctx: Arc<ReadinessContext>,
}

impl Drop for ContextLease {
    fn drop(&mut self) {
        self.ctx.active_contexts.fetch_sub(1, Ordering::SeqCst);
    }
}
