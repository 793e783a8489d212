//! Scripted engine/session/page fakes for tests.

use anyhow::{anyhow, Result};
use browser_preflight_common::engine::{BrowserEngine, PageHandle, SessionHandle};
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

/// Page that records successful visits and fails navigation for scripted URLs.
pub struct FakePage {
    visits: Arc<Mutex<Vec<String>>>,
    failing: Arc<HashSet<String>>,
    closes: Arc<AtomicUsize>,
    fail_close: bool,
}

impl FakePage {
    pub fn new() -> Self {
        Self::failing_on(&[])
    }

    pub fn failing_on(urls: &[&str]) -> Self {
        Self {
            visits: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(urls.iter().map(|u| u.to_string()).collect()),
            closes: Arc::new(AtomicUsize::new(0)),
            fail_close: false,
        }
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl PageHandle for FakePage {
    fn navigate(&self, url: &str, _timeout: Duration) -> Result<()> {
        if self.failing.contains(url) {
            return Err(anyhow!("navigation timed out: {}", url));
        }
        self.visits.lock().unwrap().push(url.to_string());
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            Err(anyhow!("target already closed"))
        } else {
            Ok(())
        }
    }
}

/// Session whose pages share one visit log, with a manual disconnect trigger.
pub struct FakeSession {
    visits: Arc<Mutex<Vec<String>>>,
    failing: Arc<HashSet<String>>,
    pages_closed: Arc<AtomicUsize>,
    fail_page_open: AtomicBool,
    fail_page_close: AtomicBool,
    disconnect_tx: watch::Sender<bool>,
    // Kept so the channel stays open even before anyone subscribes.
    _disconnect_rx: watch::Receiver<bool>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::with_failing_sites(&[])
    }

    pub fn with_failing_sites(urls: &[&str]) -> Self {
        let (disconnect_tx, disconnect_rx) = watch::channel(false);
        Self {
            visits: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(urls.iter().map(|u| u.to_string()).collect()),
            pages_closed: Arc::new(AtomicUsize::new(0)),
            fail_page_open: AtomicBool::new(false),
            fail_page_close: AtomicBool::new(false),
            disconnect_tx,
            _disconnect_rx: disconnect_rx,
        }
    }

    pub fn set_fail_page_open(&self) {
        self.fail_page_open.store(true, Ordering::SeqCst);
    }

    pub fn set_fail_page_close(&self) {
        self.fail_page_close.store(true, Ordering::SeqCst);
    }

    pub fn fire_disconnect(&self) {
        let _ = self.disconnect_tx.send(true);
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }

    pub fn pages_closed(&self) -> usize {
        self.pages_closed.load(Ordering::SeqCst)
    }
}

impl SessionHandle for FakeSession {
    fn open_page(&self) -> Result<Box<dyn PageHandle>> {
        if self.fail_page_open.load(Ordering::SeqCst) {
            return Err(anyhow!("browser refused to open a page"));
        }
        Ok(Box::new(FakePage {
            visits: self.visits.clone(),
            failing: self.failing.clone(),
            closes: self.pages_closed.clone(),
            fail_close: self.fail_page_close.load(Ordering::SeqCst),
        }))
    }

    fn disconnected(&self) -> watch::Receiver<bool> {
        self.disconnect_tx.subscribe()
    }
}

/// Delegating handle so one [`FakeSession`] can outlive the box given to the
/// supervisor and still be poked from the test.
pub struct SharedSession(pub Arc<FakeSession>);

impl SessionHandle for SharedSession {
    fn open_page(&self) -> Result<Box<dyn PageHandle>> {
        self.0.open_page()
    }

    fn disconnected(&self) -> watch::Receiver<bool> {
        self.0.disconnected()
    }
}

enum LaunchScript {
    Session(Arc<FakeSession>),
    Failure,
}

/// Engine with a scripted launch sequence.
///
/// Scripted entries are consumed in order; once the script runs dry every
/// launch produces a fresh default session (or fails, after `fail_always`).
pub struct FakeEngine {
    script: Mutex<VecDeque<LaunchScript>>,
    sessions: Mutex<Vec<Arc<FakeSession>>>,
    launches: AtomicUsize,
    fail_always: AtomicBool,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            sessions: Mutex::new(Vec::new()),
            launches: AtomicUsize::new(0),
            fail_always: AtomicBool::new(false),
        }
    }

    pub fn push_failure(&self) {
        self.script.lock().unwrap().push_back(LaunchScript::Failure);
    }

    pub fn push_session(&self, session: Arc<FakeSession>) {
        self.script
            .lock()
            .unwrap()
            .push_back(LaunchScript::Session(session));
    }

    pub fn set_fail_always(&self) {
        self.fail_always.store(true, Ordering::SeqCst);
    }

    pub fn launch_count(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    /// The nth successfully launched session.
    pub fn session(&self, index: usize) -> Arc<FakeSession> {
        self.sessions.lock().unwrap()[index].clone()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

impl BrowserEngine for FakeEngine {
    fn launch(&self) -> Result<Box<dyn SessionHandle>> {
        self.launches.fetch_add(1, Ordering::SeqCst);

        let scripted = self.script.lock().unwrap().pop_front();
        let session = match scripted {
            Some(LaunchScript::Failure) => return Err(anyhow!("engine refused to launch")),
            Some(LaunchScript::Session(session)) => session,
            None => {
                if self.fail_always.load(Ordering::SeqCst) {
                    return Err(anyhow!("engine refused to launch"));
                }
                Arc::new(FakeSession::new())
            }
        };

        self.sessions.lock().unwrap().push(session.clone());
        Ok(Box::new(SharedSession(session)))
    }

    fn name(&self) -> &str {
        "fake"
    }
}
