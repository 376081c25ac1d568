// Playlist resolution: fetch, classify, select, and normalize.

pub mod base_url;
pub mod decode;
pub mod fetcher;
pub mod model;
pub mod resolver;
pub mod segments;
pub mod selector;

// Re-exports for easier access
pub use base_url::{BaseUrlStrategy, DirectoryBaseUrl, compose_child_url};
pub use decode::decode_playlist;
pub use fetcher::{HttpPlaylistFetcher, PlaylistFetcher};
pub use model::{
    ByteRange, EncryptionKey, FlatPlaylist, IndexPlaylist, InitMap, MediaChunk, Playlist,
    PlaylistRef, ResolvedSegment, Variant,
};
pub use resolver::{PlaylistResolver, PlaylistResolverBuilder};
pub use segments::resolve_segments;
pub use selector::{
    ConsoleSelector, PolicySelector, VariantSelectionPolicy, VariantSelector, parse_selection,
};
