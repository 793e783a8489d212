//! Chrome-backed automation engine
//!
//! Production [`BrowserEngine`] implementation on headless Chrome. The
//! engine's challenge-solving behavior is its own business; this module only
//! launches it with believable flags, opens pages, and notices when the CDP
//! connection dies.

use anyhow::{anyhow, Result};
use browser_preflight_common::config::BrowserConfig;
use browser_preflight_common::engine::{BrowserEngine, PageHandle, SessionHandle};
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

/// How often the CDP connection is probed for liveness. headless_chrome has
/// no disconnect callback, so a poll stands in for one.
const CONNECTION_POLL_INTERVAL: Duration = Duration::from_secs(5);

pub struct ChromeEngine {
    config: BrowserConfig,
}

impl ChromeEngine {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }
}

impl BrowserEngine for ChromeEngine {
    fn launch(&self) -> Result<Box<dyn SessionHandle>> {
        let proxy_server = self.config.proxy.build_proxy_server();

        if let Some(server) = &proxy_server {
            if self.config.proxy.credentials().is_some() {
                info!("Launching browser behind proxy {} (authenticated)", server);
            } else {
                info!("Launching browser behind proxy {} (no authentication)", server);
            }
        } else {
            info!("Launching browser with direct connection");
        }

        let args = default_chrome_args(self.config.headless);

        let mut launch_builder = LaunchOptions::default_builder();
        launch_builder
            .headless(self.config.headless)
            .proxy_server(proxy_server.as_deref())
            // Long idle timeout: the default 30s closes the WebSocket under
            // a quiet browser, which would look like a disconnect.
            .idle_browser_timeout(Duration::from_secs(3600))
            .args(args);

        if let Some(browser_path) = &self.config.browser_path {
            info!("Using custom browser binary: {}", browser_path.display());
            launch_builder.path(Some(browser_path.clone()));
        }

        let launch_options = launch_builder
            .build()
            .map_err(|e| anyhow!("Failed to build launch options: {}", e))?;

        let browser = Browser::new(launch_options)?;
        info!("Browser process launched successfully");

        let (disconnect_tx, disconnect_rx) = watch::channel(false);
        let session = ChromeSession {
            browser: Arc::new(browser),
            disconnect_tx,
            disconnect_rx,
        };
        session.spawn_connection_monitor();

        Ok(Box::new(session))
    }

    fn name(&self) -> &str {
        "chrome"
    }
}

struct ChromeSession {
    browser: Arc<Browser>,
    disconnect_tx: watch::Sender<bool>,
    disconnect_rx: watch::Receiver<bool>,
}

impl ChromeSession {
    /// Probe the CDP connection periodically; fire the disconnect signal on
    /// the first failure. The task stops once it has fired, or once every
    /// receiver (including this session's own) is gone.
    fn spawn_connection_monitor(&self) {
        let browser = self.browser.clone();
        let disconnect_tx = self.disconnect_tx.clone();

        tokio::spawn(async move {
            loop {
                tokio::time::sleep(CONNECTION_POLL_INTERVAL).await;

                if disconnect_tx.is_closed() {
                    break;
                }

                if browser.get_version().is_err() {
                    warn!("Browser CDP connection lost");
                    let _ = disconnect_tx.send(true);
                    break;
                }
            }
        });
    }
}

impl SessionHandle for ChromeSession {
    fn open_page(&self) -> Result<Box<dyn PageHandle>> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| anyhow!("Failed to open page: {}", e))?;
        Ok(Box::new(ChromePage { tab }))
    }

    fn disconnected(&self) -> watch::Receiver<bool> {
        self.disconnect_rx.clone()
    }
}

struct ChromePage {
    tab: Arc<Tab>,
}

impl PageHandle for ChromePage {
    fn navigate(&self, url: &str, timeout: Duration) -> Result<()> {
        self.tab.set_default_timeout(timeout);
        self.tab.navigate_to(url)?;
        // Waits for the navigation to commit and the document to come up,
        // not for every subresource to finish loading.
        self.tab.wait_until_navigated()?;
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.tab.close(true)?;
        Ok(())
    }
}

/// Standard Chrome arguments: container compatibility, anti-bot stealth,
/// a realistic desktop window, and no first-run chrome.
fn default_chrome_args(headless: bool) -> Vec<&'static OsStr> {
    let mut args: Vec<&'static OsStr> = vec![
        // Required for containers - Chrome's namespace sandbox needs
        // SYS_ADMIN, which container isolation already covers.
        OsStr::new("--no-sandbox"),
        OsStr::new("--disable-dev-shm-usage"),
        // Anti-bot stealth
        OsStr::new("--disable-blink-features=AutomationControlled"),
        OsStr::new("--exclude-switches=enable-automation"),
        // Realistic Full HD desktop resolution
        OsStr::new("--window-size=1920,1080"),
        // Startup optimization
        OsStr::new("--no-first-run"),
        OsStr::new("--no-default-browser-check"),
        // Keep JS running normally in background tabs
        OsStr::new("--disable-background-timer-throttling"),
        OsStr::new("--disable-backgrounding-occluded-windows"),
        OsStr::new("--disable-renderer-backgrounding"),
    ];

    // Headful-specific args (better stealth for a visible browser)
    if !headless {
        args.push(OsStr::new("--disable-infobars"));
        args.push(OsStr::new(
            "--disable-features=IsolateOrigins,site-per-process",
        ));
    }

    args
}
