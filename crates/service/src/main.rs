use anyhow::Result;
use browser_preflight_common::config::{BrowserConfig, ServiceConfig, WarmupConfig};
use browser_preflight_common::proxy::ProxyConfig;
use browser_preflight_common::sites::WarmupSiteList;
use browser_preflight_service::{run_service, ChromeEngine};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config_from_env()?;
    let engine = Arc::new(ChromeEngine::new(config.browser.clone()));

    run_service(config, engine).await
}

fn load_config_from_env() -> Result<ServiceConfig> {
    use std::env;
    use std::path::PathBuf;
    use std::time::Duration;

    let http_port = env::var("HTTP_PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()?;

    // Maximum concurrent browser contexts the dispatch layer may lease
    let capacity_limit = env::var("MAX_CONTEXTS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(20);

    // Warm-up toggles: anything except the literal "false" leaves them on
    let session_warmup_enabled = env::var("WARMUP_ENABLED")
        .map(|v| v != "false")
        .unwrap_or(true);
    let proxy_warmup_enabled = env::var("PROXY_WARMUP_ENABLED")
        .map(|v| v != "false")
        .unwrap_or(true);

    // Comma-separated override; empty or unset falls back to the built-ins
    let sites = env::var("WARMUP_SITES")
        .map(|raw| WarmupSiteList::parse(&raw))
        .unwrap_or_default();

    // TTL in milliseconds
    let cache_ttl = env::var("PROXY_WARMUP_TTL")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(3_600_000));

    let headless = env::var("HEADLESS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(true);

    // Custom browser path; if not set, uses Chrome/Chromium auto-detection
    let browser_path: Option<PathBuf> = env::var("BROWSER_PATH").ok().map(PathBuf::from);

    // Egress proxy the whole browser launches behind (optional)
    let proxy = ProxyConfig {
        host: env::var("PROXY_HOST").ok(),
        port: env::var("PROXY_PORT").ok().and_then(|v| v.parse().ok()),
        username: env::var("PROXY_USERNAME").ok(),
        password: env::var("PROXY_PASSWORD").ok(),
        ..Default::default()
    };

    Ok(ServiceConfig {
        http_port,
        capacity_limit,
        warmup: WarmupConfig {
            session_warmup_enabled,
            proxy_warmup_enabled,
            sites,
            cache_ttl,
        },
        browser: BrowserConfig {
            headless,
            browser_path,
            proxy,
            relaunch_delay: Duration::from_secs(3),
        },
    })
}
