use reqwest::Proxy;

use crate::ResolveError;

/// Which requests a proxy applies to
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ProxyType {
    /// Plain HTTP requests only
    Http,
    /// HTTPS requests only
    Https,
    /// SOCKS5 proxy for every request
    Socks5,
    /// Every request, whatever the scheme
    All,
}

/// Basic credentials for the proxy
#[derive(Debug, Clone)]
pub struct ProxyAuth {
    pub username: String,
    pub password: String,
}

/// Proxy used for playlist requests
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Proxy server URL (e.g., "http://proxy.example.com:8080")
    pub url: String,
    pub proxy_type: ProxyType,
    pub auth: Option<ProxyAuth>,
}

impl ProxyConfig {
    /// Convert into a reqwest proxy, attaching credentials when present.
    pub fn to_reqwest(&self) -> Result<Proxy, ResolveError> {
        let invalid = |e: reqwest::Error| {
            ResolveError::Client(format!("Invalid {:?} proxy URL {}: {e}", self.proxy_type, self.url))
        };

        let mut proxy = match self.proxy_type {
            ProxyType::Http => Proxy::http(&self.url).map_err(invalid)?,
            ProxyType::Https => Proxy::https(&self.url).map_err(invalid)?,
            ProxyType::Socks5 => {
                let url = if self.url.starts_with("socks5://") || self.url.starts_with("socks5h://")
                {
                    self.url.clone()
                } else {
                    format!("socks5://{}", self.url)
                };
                Proxy::all(&url).map_err(invalid)?
            }
            ProxyType::All => Proxy::all(&self.url).map_err(invalid)?,
        };

        if let Some(auth) = &self.auth {
            proxy = proxy.basic_auth(&auth.username, &auth.password);
        }

        Ok(proxy)
    }
}
