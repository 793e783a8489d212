//! Browser lifecycle supervisor
//!
//! Owns the single shared browser session: launches it, runs whole-session
//! warm-up once per successful launch, watches for disconnects, and
//! relaunches with a fixed backoff until shutdown. An explicit retry loop
//! (not recursion) keeps at most one relaunch in flight; the session
//! generation counter makes late disconnect signals from a superseded handle
//! harmless.

use crate::session::ReadinessContext;
use crate::warmup;
use browser_preflight_common::engine::{BrowserEngine, SessionHandle};
use browser_preflight_common::sites::WarmupSiteList;
use browser_preflight_common::types::WarmupOutcome;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

pub struct Supervisor {
    engine: Arc<dyn BrowserEngine>,
    ctx: Arc<ReadinessContext>,
    sites: WarmupSiteList,
    warmup_enabled: bool,
    relaunch_delay: Duration,
    shutdown: CancellationToken,
}

impl Supervisor {
    pub fn new(
        engine: Arc<dyn BrowserEngine>,
        ctx: Arc<ReadinessContext>,
        sites: WarmupSiteList,
        warmup_enabled: bool,
        relaunch_delay: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            engine,
            ctx,
            sites,
            warmup_enabled,
            relaunch_delay,
            shutdown,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Supervision loop. Runs until the shutdown token fires; every launch
    /// or warm-up failure is logged and retried, never fatal.
    pub async fn run(self) {
        info!(
            engine = self.engine.name(),
            "Starting browser lifecycle supervisor"
        );

        loop {
            if self.shutdown.is_cancelled() {
                break;
            }

            // Clear any previous session before attempting a replacement, so
            // at most one live handle exists process-wide.
            self.ctx.begin_launch().await;

            info!("Launching browser session...");
            let handle: Arc<dyn SessionHandle> = match self.engine.launch() {
                Ok(handle) => Arc::from(handle),
                Err(e) => {
                    error!(
                        "Browser launch failed: {:#}, retrying in {:?}",
                        e, self.relaunch_delay
                    );
                    if self.backoff().await {
                        break;
                    }
                    continue;
                }
            };

            // Subscribe before publishing: a disconnect racing the publish
            // must not be lost.
            let mut disconnected = handle.disconnected();
            let generation = self.ctx.publish_ready(handle.clone()).await;
            info!(generation, "Browser session ready");

            let outcome = if self.warmup_enabled {
                warmup::warmup_session(handle.as_ref(), &self.sites).await
            } else {
                info!("Session warm-up disabled by configuration");
                WarmupOutcome::Disabled
            };
            self.ctx.set_warmup_outcome(outcome).await;

            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                result = disconnected.wait_for(|lost| *lost) => {
                    // A closed channel means the handle was torn down without
                    // signaling; treat it as a disconnect as well.
                    let _ = result;
                }
            }

            if self.shutdown.is_cancelled() {
                break;
            }

            if self.ctx.mark_disconnected(generation).await {
                warn!(
                    generation,
                    "Browser session disconnected, relaunching in {:?}", self.relaunch_delay
                );
            }

            if self.backoff().await {
                break;
            }
        }

        self.ctx.mark_shutting_down().await;
        info!("Browser lifecycle supervisor stopped");
    }

    /// Sleep the fixed relaunch delay. Returns true when shutdown fired
    /// before the delay elapsed.
    async fn backoff(&self) -> bool {
        tokio::select! {
            _ = self.shutdown.cancelled() => true,
            _ = tokio::time::sleep(self.relaunch_delay) => false,
        }
    }
}
