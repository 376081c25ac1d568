// Segment resolution: turns a flat playlist into self-contained descriptors.

use std::sync::Arc;

use tracing::{debug, trace};
use url::Url;

use crate::ResolveError;
use crate::playlist::base_url::is_absolute;
use crate::playlist::model::{EncryptionKey, FlatPlaylist, ResolvedSegment};

/// Resolve every chunk of `playlist` against `base_url`, the playlist's own URL.
///
/// Output order is the playlist order. Chunks without a key of their own
/// share the key in effect (the playlist default key until another
/// `EXT-X-KEY` replaces it, `METHOD=NONE` clears it). Each distinct key is
/// resolved once and then shared by `Arc`.
pub fn resolve_segments(
    playlist: FlatPlaylist,
    base_url: &str,
) -> Result<Vec<ResolvedSegment>, ResolveError> {
    let base = Url::parse(base_url).map_err(|e| ResolveError::url_parse(base_url, e))?;

    let mut active_key = playlist
        .default_key
        .map(|key| resolve_key(&base, key))
        .transpose()?
        .filter(|key| !key.is_none_method());

    let mut segments = Vec::with_capacity(playlist.chunks.len());
    for mut chunk in playlist.chunks {
        if !is_absolute(&chunk.uri) {
            chunk.uri = join(&base, &chunk.uri)?;
        }

        if let Some(map) = chunk.init_map.as_mut() {
            if !is_absolute(&map.uri) {
                map.uri = join(&base, &map.uri)?;
            }
        }

        if let Some(own) = chunk.key.take() {
            let own = Arc::unwrap_or_clone(own);
            active_key = if own.is_none_method() {
                None
            } else {
                Some(resolve_key(&base, own)?)
            };
        }
        chunk.key = active_key.clone();

        trace!("Resolved segment #{}: {}", chunk.sequence, chunk.uri);
        segments.push(ResolvedSegment::new(chunk));
    }

    debug!("Resolved {} segments from {base_url}", segments.len());
    Ok(segments)
}

fn resolve_key(base: &Url, mut key: EncryptionKey) -> Result<Arc<EncryptionKey>, ResolveError> {
    if !key.is_none_method() && !is_absolute(&key.uri) {
        key.uri = join(base, &key.uri)?;
    }
    Ok(Arc::new(key))
}

fn join(base: &Url, reference: &str) -> Result<String, ResolveError> {
    base.join(reference)
        .map(String::from)
        .map_err(|e| ResolveError::url_parse(reference, e))
}
