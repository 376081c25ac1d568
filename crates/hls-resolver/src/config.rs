use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};

use crate::proxy::ProxyConfig;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Index playlists may point at exactly one level of flat playlists.
pub const DEFAULT_MAX_PLAYLIST_DEPTH: usize = 2;

/// Configurable options for playlist resolution
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Overall timeout for each playlist request (zero disables it)
    pub timeout: Duration,

    /// Connection timeout (time to establish initial connection)
    pub connect_timeout: Duration,

    /// Whether to follow redirects
    pub follow_redirects: bool,

    /// User agent string
    pub user_agent: String,

    /// Headers sent with every request, before per-call headers
    pub headers: HeaderMap,

    /// Proxy configuration (optional)
    pub proxy: Option<ProxyConfig>,

    /// Whether to use system proxy settings if available
    pub use_system_proxy: bool,

    /// Maximum number of playlists fetched for one resolution
    pub max_playlist_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            follow_redirects: true,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            headers: ResolverConfig::default_headers(),
            proxy: None,
            use_system_proxy: true,
            max_playlist_depth: DEFAULT_MAX_PLAYLIST_DEPTH,
        }
    }
}

impl ResolverConfig {
    pub fn builder() -> crate::builder::ResolverConfigBuilder {
        crate::builder::ResolverConfigBuilder::new()
    }

    pub fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static(
                "application/vnd.apple.mpegurl,application/x-mpegurl,audio/mpegurl,*/*;q=0.8",
            ),
        );

        headers.insert(
            reqwest::header::ACCEPT_ENCODING,
            HeaderValue::from_static("gzip, deflate, br"),
        );

        headers
    }
}
