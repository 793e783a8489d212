use serde::{Deserialize, Serialize};

/// Proxy protocol/scheme
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProxyScheme {
    /// HTTP proxy (default)
    #[default]
    Http,
    /// HTTPS proxy
    Https,
    /// SOCKS5 proxy
    Socks5,
}

impl ProxyScheme {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
            Self::Socks5 => "socks5",
        }
    }
}

/// Egress proxy configuration.
///
/// Built from individual components so the same value can drive both the
/// browser launch flags and the warm-up cache key. A config without host and
/// port means "direct connection" and is treated as no proxy everywhere.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Proxy protocol
    pub scheme: ProxyScheme,

    /// Proxy server hostname
    pub host: Option<String>,

    /// Proxy server port
    pub port: Option<u16>,

    /// Username for proxy authentication
    pub username: Option<String>,

    /// Password for proxy authentication
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Canonical identity of this proxy for warm-up bookkeeping.
    ///
    /// Format: `host:port`, or `host:port:username` when authenticated.
    /// Two configs pointing at the same endpoint with the same username are
    /// the same proxy as far as warm-up history goes, so the password is
    /// deliberately not part of the identity.
    ///
    /// Returns `None` when no proxy is configured (missing host or port).
    pub fn warmup_identity(&self) -> Option<String> {
        let (host, port) = match (&self.host, self.port) {
            (Some(host), Some(port)) => (host, port),
            _ => return None,
        };

        match &self.username {
            Some(user) => Some(format!("{}:{}:{}", host, port, user)),
            None => Some(format!("{}:{}", host, port)),
        }
    }

    /// Build the proxy server string for the browser launch flags.
    ///
    /// Credentials are never embedded: Chrome rejects them in the
    /// `--proxy-server` value, they have to be supplied separately.
    ///
    /// Returns `None` if no proxy is configured (direct connection).
    pub fn build_proxy_server(&self) -> Option<String> {
        match (&self.host, self.port) {
            (Some(host), Some(port)) => {
                Some(format!("{}://{}:{}", self.scheme.as_str(), host, port))
            }
            _ => None,
        }
    }

    /// Extract credentials, if both parts are present.
    pub fn credentials(&self) -> Option<(String, String)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.clone(), pass.clone())),
            _ => None,
        }
    }

    /// Check if a proxy is configured at all.
    pub fn is_configured(&self) -> bool {
        self.host.is_some() && self.port.is_some()
    }
}
