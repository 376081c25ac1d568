//! # Builder for ResolverConfig
//!
//! Fluent construction of [`ResolverConfig`] values.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use hls_resolver::ResolverConfig;
//!
//! let config = ResolverConfig::builder()
//!     .with_timeout(Duration::from_secs(60))
//!     .with_user_agent("MyApp/1.0")
//!     .with_header("Authorization", "Bearer token")
//!     .with_max_playlist_depth(3)
//!     .build();
//!
//! assert_eq!(config.max_playlist_depth, 3);
//! ```

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::warn;

use crate::{ResolverConfig, proxy::ProxyConfig};

/// Builder for creating ResolverConfig instances with a fluent API
#[derive(Debug, Clone)]
pub struct ResolverConfigBuilder {
    config: ResolverConfig,
}

impl ResolverConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: ResolverConfig::default(),
        }
    }

    /// Set the overall timeout for each playlist request
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.config.follow_redirects = follow;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Add a default HTTP header; invalid names or values are skipped with a warning
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        match (
            name.as_ref().parse::<HeaderName>(),
            HeaderValue::from_str(value.as_ref()),
        ) {
            (Ok(name), Ok(value)) => {
                self.config.headers.insert(name, value);
            }
            _ => warn!("Skipping invalid header '{}'", name.as_ref()),
        }
        self
    }

    /// Merge headers into the defaults, replacing entries with the same name
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        for (name, value) in headers.iter() {
            self.config.headers.insert(name.clone(), value.clone());
        }
        self
    }

    /// Set the proxy configuration
    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.config.proxy = Some(proxy);
        self.config.use_system_proxy = false; // Explicit proxy overrides system proxy
        self
    }

    /// Set whether to use system proxy settings if available
    pub fn with_system_proxy(mut self, use_system_proxy: bool) -> Self {
        if self.config.proxy.is_none() {
            self.config.use_system_proxy = use_system_proxy;
        }
        self
    }

    /// Limit how many playlists one resolution may fetch
    pub fn with_max_playlist_depth(mut self, depth: usize) -> Self {
        self.config.max_playlist_depth = depth;
        self
    }

    pub fn build(self) -> ResolverConfig {
        self.config
    }
}

impl Default for ResolverConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
