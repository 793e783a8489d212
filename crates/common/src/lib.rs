pub mod config;
pub mod engine;
pub mod proxy;
pub mod sites;
pub mod types;

pub use config::{BrowserConfig, ServiceConfig, WarmupConfig};
pub use engine::{BrowserEngine, PageHandle, SessionHandle};
pub use proxy::{ProxyConfig, ProxyScheme};
pub use sites::{WarmupSiteList, DEFAULT_WARMUP_SITES};
pub use types::*;
