//! Automation engine seam
//!
//! The challenge-solving browser engine itself is an external collaborator;
//! this module only defines the narrow surface the orchestration layer needs
//! from it: launch a session, open pages, navigate, and signal disconnects.
//! Implement these traits to plug in a different engine (or a scripted fake
//! in tests).

use anyhow::Result;
use std::time::Duration;
use tokio::sync::watch;

/// Factory for browser sessions.
pub trait BrowserEngine: Send + Sync {
    /// Launch a new browser session.
    ///
    /// Called by the lifecycle supervisor on startup and after every
    /// disconnect. Errors are recoverable: the supervisor logs them and
    /// retries after a fixed delay.
    fn launch(&self) -> Result<Box<dyn SessionHandle>>;

    /// Get unique identifier for this engine (used in logging)
    fn name(&self) -> &str;
}

/// A live browser session.
pub trait SessionHandle: Send + Sync {
    /// Open a fresh page in the session.
    fn open_page(&self) -> Result<Box<dyn PageHandle>>;

    /// Subscribe to the disconnect signal.
    ///
    /// The receiver observes `true` once the engine connection is lost. The
    /// signal fires at most once per session; a handle that has been
    /// superseded by a relaunch may still fire, and subscribers are expected
    /// to ignore it.
    fn disconnected(&self) -> watch::Receiver<bool>;
}

/// A page within a live session.
pub trait PageHandle: Send + Sync {
    /// Navigate to `url`, waiting only for the initial document to parse
    /// (not for the full resource load), bounded by `timeout`.
    fn navigate(&self, url: &str, timeout: Duration) -> Result<()>;

    /// Close the page.
    fn close(&self) -> Result<()>;
}
