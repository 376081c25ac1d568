//! Resolution driver: fetch, classify, then either descend into a variant or
//! resolve the chunk list.

use std::sync::Arc;

use tracing::{debug, info};

use crate::ResolveError;
use crate::client::create_client;
use crate::config::{DEFAULT_MAX_PLAYLIST_DEPTH, ResolverConfig};
use crate::playlist::base_url::{BaseUrlStrategy, DirectoryBaseUrl, compose_child_url};
use crate::playlist::fetcher::{HttpPlaylistFetcher, PlaylistFetcher};
use crate::playlist::model::{Playlist, PlaylistRef, ResolvedSegment};
use crate::playlist::segments::resolve_segments;
use crate::playlist::selector::{ConsoleSelector, VariantSelector};

pub struct PlaylistResolver {
    fetcher: Arc<dyn PlaylistFetcher>,
    selector: Arc<dyn VariantSelector>,
    base_url: Arc<dyn BaseUrlStrategy>,
    max_playlist_depth: usize,
}

impl PlaylistResolver {
    pub fn new(
        fetcher: Arc<dyn PlaylistFetcher>,
        selector: Arc<dyn VariantSelector>,
        base_url: Arc<dyn BaseUrlStrategy>,
    ) -> Self {
        Self {
            fetcher,
            selector,
            base_url,
            max_playlist_depth: DEFAULT_MAX_PLAYLIST_DEPTH,
        }
    }

    pub fn builder() -> PlaylistResolverBuilder {
        PlaylistResolverBuilder::default()
    }

    /// Cap on playlists fetched per resolution; at least one is always fetched.
    pub fn with_max_playlist_depth(mut self, depth: usize) -> Self {
        self.max_playlist_depth = depth.max(1);
        self
    }

    /// Resolve `playlist` into fetchable segments.
    ///
    /// Index playlists are descended into through the selected variant, with
    /// the same headers, until a flat playlist is reached. At most
    /// `max_playlist_depth` playlists are fetched.
    pub async fn resolve(
        &self,
        playlist: &PlaylistRef,
    ) -> Result<Vec<ResolvedSegment>, ResolveError> {
        let mut current = playlist.clone();

        for depth in 1..=self.max_playlist_depth {
            match self.fetcher.fetch(&current).await? {
                Playlist::Index(index) => {
                    let choice = self.selector.select(&index.variants)?;
                    let variant = index.variants.get(choice).ok_or_else(|| {
                        ResolveError::InvalidSelection {
                            input: (choice + 1).to_string(),
                        }
                    })?;

                    let base = self.base_url.base_url(&current.url)?;
                    let child_url = compose_child_url(&base, &variant.uri);
                    debug!(
                        "Index playlist at depth {depth}: variant {} -> {child_url}",
                        choice + 1
                    );
                    current = current.child(child_url);
                }
                Playlist::Flat(flat) => {
                    let segments = resolve_segments(flat, &current.url)?;
                    info!("Resolved {} segments from {}", segments.len(), current.url);
                    return Ok(segments);
                }
            }
        }

        Err(ResolveError::DepthExceeded {
            depth: self.max_playlist_depth,
        })
    }
}

/// Assembles a [`PlaylistResolver`], defaulting to HTTP fetching, the console
/// prompt and the directory base URL.
#[derive(Default)]
pub struct PlaylistResolverBuilder {
    config: ResolverConfig,
    fetcher: Option<Arc<dyn PlaylistFetcher>>,
    selector: Option<Arc<dyn VariantSelector>>,
    base_url: Option<Arc<dyn BaseUrlStrategy>>,
}

impl PlaylistResolverBuilder {
    pub fn config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn fetcher(mut self, fetcher: impl PlaylistFetcher + 'static) -> Self {
        self.fetcher = Some(Arc::new(fetcher));
        self
    }

    pub fn selector(mut self, selector: impl VariantSelector + 'static) -> Self {
        self.selector = Some(Arc::new(selector));
        self
    }

    /// Replace the default base URL algorithm entirely.
    pub fn base_url(mut self, strategy: impl BaseUrlStrategy + 'static) -> Self {
        self.base_url = Some(Arc::new(strategy));
        self
    }

    pub fn build(self) -> Result<PlaylistResolver, ResolveError> {
        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpPlaylistFetcher::new(create_client(&self.config)?)),
        };
        let selector = self
            .selector
            .unwrap_or_else(|| Arc::new(ConsoleSelector::stdio()));
        let base_url = self
            .base_url
            .unwrap_or_else(|| Arc::new(DirectoryBaseUrl));

        Ok(PlaylistResolver::new(fetcher, selector, base_url)
            .with_max_playlist_depth(self.config.max_playlist_depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playlist::decode::decode_playlist;
    use crate::playlist::selector::{PolicySelector, VariantSelectionPolicy};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::io::Cursor;

    const MASTER: &str = "#EXTM3U\n\
        #EXT-X-STREAM-INF:BANDWIDTH=5000000,RESOLUTION=1920x1080\n\
        /1080p/index.m3u8\n\
        #EXT-X-STREAM-INF:BANDWIDTH=2500000,RESOLUTION=1280x720\n\
        /720p/index.m3u8\n";

    const MEDIA: &str = "#EXTM3U\n\
        #EXT-X-TARGETDURATION:6\n\
        #EXT-X-KEY:METHOD=AES-128,URI=\"key.bin\"\n\
        #EXTINF:6.0,\n\
        chunk_001.ts\n\
        #EXTINF:6.0,\n\
        chunk_002.ts\n\
        #EXT-X-ENDLIST\n";

    /// Serves canned playlists and records the requested URLs.
    #[derive(Default)]
    struct MemoryFetcher {
        bodies: HashMap<String, &'static str>,
        requests: Mutex<Vec<String>>,
    }

    impl MemoryFetcher {
        fn with(mut self, url: &str, body: &'static str) -> Self {
            self.bodies.insert(url.to_string(), body);
            self
        }
    }

    #[async_trait]
    impl PlaylistFetcher for MemoryFetcher {
        async fn fetch(&self, playlist: &PlaylistRef) -> Result<Playlist, ResolveError> {
            self.requests.lock().push(playlist.url.clone());
            let body = self.bodies.get(&playlist.url).ok_or_else(|| {
                ResolveError::HttpStatus {
                    url: playlist.url.clone(),
                    status: reqwest::StatusCode::NOT_FOUND,
                }
            })?;
            decode_playlist(&playlist.url, body.as_bytes())
        }
    }

    fn console(input: &str) -> ConsoleSelector<Cursor<Vec<u8>>, Vec<u8>> {
        ConsoleSelector::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[tokio::test]
    async fn index_selection_descends_into_chosen_variant() {
        let fetcher = Arc::new(
            MemoryFetcher::default()
                .with("http://cdn.example.com/video/master.m3u8", MASTER)
                .with("http://cdn.example.com/video/720p/index.m3u8", MEDIA),
        );
        let resolver = PlaylistResolver::builder()
            .fetcher(fetcher.clone())
            .selector(console("2\n"))
            .build()
            .unwrap();

        let segments = resolver
            .resolve(&PlaylistRef::new("http://cdn.example.com/video/master.m3u8"))
            .await
            .unwrap();

        assert_eq!(
            *fetcher.requests.lock(),
            vec![
                "http://cdn.example.com/video/master.m3u8".to_string(),
                "http://cdn.example.com/video/720p/index.m3u8".to_string(),
            ]
        );
        let uris: Vec<_> = segments.iter().map(|s| s.uri()).collect();
        assert_eq!(
            uris,
            vec![
                "http://cdn.example.com/video/720p/chunk_001.ts",
                "http://cdn.example.com/video/720p/chunk_002.ts",
            ]
        );
        assert_eq!(
            segments[0].key().unwrap().uri,
            "http://cdn.example.com/video/720p/key.bin"
        );
        assert!(Arc::ptr_eq(
            segments[0].key().unwrap(),
            segments[1].key().unwrap()
        ));
    }

    #[tokio::test]
    async fn flat_playlist_needs_no_selection() {
        let fetcher = Arc::new(
            MemoryFetcher::default().with("http://cdn.example.com/live/index.m3u8", MEDIA),
        );
        let resolver = PlaylistResolver::builder()
            .fetcher(fetcher.clone())
            .selector(console(""))
            .build()
            .unwrap();

        let segments = resolver
            .resolve(&PlaylistRef::new("http://cdn.example.com/live/index.m3u8"))
            .await
            .unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(fetcher.requests.lock().len(), 1);
    }

    #[tokio::test]
    async fn base_url_override_replaces_default() {
        let fetcher = Arc::new(
            MemoryFetcher::default()
                .with("http://origin.example.com/master.m3u8", MASTER)
                .with("https://edge.example.com/hls/1080p/index.m3u8", MEDIA),
        );
        let resolver = PlaylistResolver::builder()
            .fetcher(fetcher.clone())
            .selector(PolicySelector::new(VariantSelectionPolicy::HighestBandwidth))
            .base_url(|_: &str| Ok::<_, ResolveError>("https://edge.example.com/hls".to_string()))
            .build()
            .unwrap();

        let segments = resolver
            .resolve(&PlaylistRef::new("http://origin.example.com/master.m3u8"))
            .await
            .unwrap();

        assert_eq!(
            segments[0].uri(),
            "https://edge.example.com/hls/1080p/chunk_001.ts"
        );
    }

    #[tokio::test]
    async fn invalid_selection_stops_resolution() {
        let fetcher = Arc::new(
            MemoryFetcher::default().with("http://cdn.example.com/video/master.m3u8", MASTER),
        );
        let resolver = PlaylistResolver::builder()
            .fetcher(fetcher.clone())
            .selector(console("abc\n"))
            .build()
            .unwrap();

        let err = resolver
            .resolve(&PlaylistRef::new("http://cdn.example.com/video/master.m3u8"))
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::InvalidSelection { ref input } if input == "abc"));
        assert_eq!(fetcher.requests.lock().len(), 1);
    }

    #[tokio::test]
    async fn self_referencing_index_hits_depth_limit() {
        const LOOP: &str = "#EXTM3U\n\
            #EXT-X-STREAM-INF:BANDWIDTH=1000\n\
            /master.m3u8\n";

        let fetcher = Arc::new(
            MemoryFetcher::default()
                .with("http://cdn.example.com/master.m3u8", LOOP)
                .with("http://cdn.example.com//master.m3u8", LOOP),
        );
        let resolver = PlaylistResolver::builder()
            .fetcher(fetcher.clone())
            .selector(PolicySelector::default())
            .build()
            .unwrap();

        let err = resolver
            .resolve(&PlaylistRef::new("http://cdn.example.com/master.m3u8"))
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::DepthExceeded { depth: 2 }));
        assert_eq!(fetcher.requests.lock().len(), 2);
    }

    #[tokio::test]
    async fn zero_depth_still_fetches_one_playlist() {
        let fetcher = Arc::new(
            MemoryFetcher::default().with("http://cdn.example.com/live/index.m3u8", MEDIA),
        );
        let resolver = PlaylistResolver::builder()
            .config(ResolverConfig::builder().with_max_playlist_depth(0).build())
            .fetcher(fetcher.clone())
            .selector(PolicySelector::default())
            .build()
            .unwrap();

        let segments = resolver
            .resolve(&PlaylistRef::new("http://cdn.example.com/live/index.m3u8"))
            .await
            .unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(fetcher.requests.lock().len(), 1);
    }

    #[tokio::test]
    async fn fetch_errors_propagate() {
        let resolver = PlaylistResolver::builder()
            .fetcher(Arc::new(MemoryFetcher::default()))
            .selector(PolicySelector::default())
            .build()
            .unwrap();

        let err = resolver
            .resolve(&PlaylistRef::new("http://cdn.example.com/missing.m3u8"))
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::HttpStatus { status, .. } if status == 404));
    }
}
