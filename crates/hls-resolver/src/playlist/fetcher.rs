// Playlist fetching: one GET per playlist, decoded into `Playlist`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::ResolveError;
use crate::playlist::decode::decode_playlist;
use crate::playlist::model::{Playlist, PlaylistRef};

#[async_trait]
pub trait PlaylistFetcher: Send + Sync {
    async fn fetch(&self, playlist: &PlaylistRef) -> Result<Playlist, ResolveError>;
}

#[async_trait]
impl<T: PlaylistFetcher + ?Sized> PlaylistFetcher for Arc<T> {
    async fn fetch(&self, playlist: &PlaylistRef) -> Result<Playlist, ResolveError> {
        (**self).fetch(playlist).await
    }
}

/// Fetches playlists over HTTP with a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpPlaylistFetcher {
    http_client: Client,
}

impl HttpPlaylistFetcher {
    pub fn new(http_client: Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl PlaylistFetcher for HttpPlaylistFetcher {
    async fn fetch(&self, playlist: &PlaylistRef) -> Result<Playlist, ResolveError> {
        let url =
            Url::parse(&playlist.url).map_err(|e| ResolveError::url_parse(&playlist.url, e))?;

        debug!("Fetching playlist {url}");
        let response = self
            .http_client
            .get(url.clone())
            .headers(playlist.headers.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        // The response is consumed here; nothing outlives this call.
        let body = response.bytes().await?;
        let decoded = decode_playlist(url.as_str(), &body)?;
        debug!("Fetched {} playlist {url} ({} bytes)", decoded.kind(), body.len());
        Ok(decoded)
    }
}
