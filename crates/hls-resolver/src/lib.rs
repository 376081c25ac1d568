//! # hls-resolver
//!
//! Resolves an HLS playlist URL into an ordered list of fetchable segments.
//!
//! An index (master) playlist is descended into through a selected variant;
//! a flat (media) playlist is normalized so that every segment, init section
//! and key URI is absolute. Segment download, decryption and muxing are left
//! to the caller.
//!
//! ## Features
//!
//! - Pluggable variant selection: console prompt or headless policies
//! - Overridable base URL computation for variant references
//! - Key inheritance with keys shared across segments by `Arc`
//! - Bounded index nesting
//!
//! ```no_run
//! use hls_resolver::{PlaylistRef, PlaylistResolver, PolicySelector, ResolverConfig};
//!
//! # async fn run() -> Result<(), hls_resolver::ResolveError> {
//! let resolver = PlaylistResolver::builder()
//!     .config(ResolverConfig::builder().with_header("Authorization", "Bearer t").build())
//!     .selector(PolicySelector::default())
//!     .build()?;
//!
//! for segment in resolver.resolve(&PlaylistRef::new("https://example.com/master.m3u8")).await? {
//!     println!("{}", segment.uri());
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod playlist;
pub mod proxy;

pub use builder::ResolverConfigBuilder;
pub use client::create_client;
pub use config::ResolverConfig;
pub use error::ResolveError;
pub use proxy::{ProxyAuth, ProxyConfig, ProxyType};

pub use playlist::{
    BaseUrlStrategy, ConsoleSelector, DirectoryBaseUrl, EncryptionKey, HttpPlaylistFetcher,
    MediaChunk, Playlist, PlaylistFetcher, PlaylistRef, PlaylistResolver, PolicySelector,
    ResolvedSegment, Variant, VariantSelectionPolicy, VariantSelector,
};
