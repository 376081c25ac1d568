use std::sync::Arc;

use reqwest::header::HeaderMap;
use serde::Serialize;

/// A playlist location plus the headers every request for it carries.
#[derive(Debug, Clone)]
pub struct PlaylistRef {
    pub url: String,
    pub headers: HeaderMap,
}

impl PlaylistRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HeaderMap::new(),
        }
    }

    pub fn with_headers(url: impl Into<String>, headers: HeaderMap) -> Self {
        Self {
            url: url.into(),
            headers,
        }
    }

    /// Same headers, different location.
    pub(crate) fn child(&self, url: String) -> Self {
        Self {
            url,
            headers: self.headers.clone(),
        }
    }
}

/// One selectable rendition of an index playlist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variant {
    /// Reference to the variant's flat playlist, as written in the index.
    pub uri: String,
    /// `WIDTHxHEIGHT`, when the index declares it.
    pub resolution: Option<String>,
    pub bandwidth: u64,
    pub average_bandwidth: Option<u64>,
    pub codecs: Option<String>,
    pub frame_rate: Option<f64>,
}

impl Variant {
    /// Pixel count parsed from the resolution label; `None` if it overflows.
    pub fn pixels(&self) -> Option<u64> {
        let (width, height) = self.dimensions()?;
        width.checked_mul(height)
    }

    pub fn dimensions(&self) -> Option<(u64, u64)> {
        let label = self.resolution.as_deref()?;
        let (width, height) = label.split_once('x')?;
        Some((width.trim().parse().ok()?, height.trim().parse().ok()?))
    }
}

/// Decryption key metadata.
///
/// Chunks share keys through `Arc`. The URI is made absolute before the key
/// is handed to any chunk, so every holder sees the same resolved value.
/// Resolving against different bases per chunk would need a new `Arc` per
/// base rather than mutation through a shared one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncryptionKey {
    /// `NONE`, `AES-128`, `SAMPLE-AES` or a vendor method.
    pub method: String,
    /// Key URI; empty for `METHOD=NONE`.
    pub uri: String,
    pub iv: Option<String>,
    pub key_format: Option<String>,
    pub key_format_versions: Option<String>,
}

impl EncryptionKey {
    /// `METHOD=NONE` ends encryption for the chunks that follow.
    pub fn is_none_method(&self) -> bool {
        self.method.eq_ignore_ascii_case("NONE")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ByteRange {
    pub length: u64,
    pub offset: Option<u64>,
}

/// `EXT-X-MAP` initialization section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitMap {
    pub uri: String,
    pub byte_range: Option<ByteRange>,
}

/// A media chunk as listed in a flat playlist.
///
/// Before resolution `key` holds only a key declared directly ahead of this
/// chunk; afterwards it holds the key in effect for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaChunk {
    pub uri: String,
    pub duration: f32,
    pub title: Option<String>,
    pub sequence: u64,
    pub byte_range: Option<ByteRange>,
    pub discontinuity: bool,
    pub init_map: Option<InitMap>,
    pub key: Option<Arc<EncryptionKey>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlatPlaylist {
    pub target_duration: u64,
    pub media_sequence: u64,
    pub end_list: bool,
    /// Key declared before the first chunk.
    pub default_key: Option<EncryptionKey>,
    pub chunks: Vec<MediaChunk>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexPlaylist {
    pub variants: Vec<Variant>,
}

/// A decoded playlist: either an index of variants or a flat chunk list.
#[derive(Debug, Clone, PartialEq)]
pub enum Playlist {
    Index(IndexPlaylist),
    Flat(FlatPlaylist),
}

impl Playlist {
    pub fn kind(&self) -> &'static str {
        match self {
            Playlist::Index(_) => "index",
            Playlist::Flat(_) => "flat",
        }
    }
}

/// A chunk whose URIs are all absolute and directly fetchable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedSegment {
    chunk: MediaChunk,
}

impl ResolvedSegment {
    pub(crate) fn new(chunk: MediaChunk) -> Self {
        Self { chunk }
    }

    pub fn chunk(&self) -> &MediaChunk {
        &self.chunk
    }

    pub fn uri(&self) -> &str {
        &self.chunk.uri
    }

    pub fn key(&self) -> Option<&Arc<EncryptionKey>> {
        self.chunk.key.as_ref()
    }

    pub fn into_chunk(self) -> MediaChunk {
        self.chunk
    }
}
