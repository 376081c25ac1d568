//! Base URL computation for variant references found in index playlists.
//!
//! The child playlist URL is `base + variant.uri`, a plain string
//! concatenation. Callers whose origin lays paths out differently can supply
//! their own [`BaseUrlStrategy`], usually as a closure.

use url::Url;

use crate::ResolveError;

/// Computes the base URL that variant references are appended to.
pub trait BaseUrlStrategy: Send + Sync {
    fn base_url(&self, playlist_url: &str) -> Result<String, ResolveError>;
}

impl<F> BaseUrlStrategy for F
where
    F: Fn(&str) -> Result<String, ResolveError> + Send + Sync,
{
    fn base_url(&self, playlist_url: &str) -> Result<String, ResolveError> {
        self(playlist_url)
    }
}

/// Parent directory of the playlist path, query and fragment removed.
///
/// Some servers put query-like text into a bare path segment
/// (`/video/720p%3Ftoken=x/index.m3u8`); when the directory's last segment
/// contains a `?` only the text before it is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryBaseUrl;

impl BaseUrlStrategy for DirectoryBaseUrl {
    fn base_url(&self, playlist_url: &str) -> Result<String, ResolveError> {
        let mut url =
            Url::parse(playlist_url).map_err(|e| ResolveError::url_parse(playlist_url, e))?;

        let mut dir = parent_dir(url.path()).to_string();
        let name = last_segment(&dir);
        if let Some(idx) = query_marker(name) {
            let trimmed = name[..idx].to_string();
            dir = join_path(parent_dir(&dir), &trimmed);
        }

        url.set_query(None);
        url.set_fragment(None);
        url.set_path(if dir.is_empty() { "/" } else { &dir });
        Ok(url.to_string())
    }
}

/// Compose the child playlist URL for a variant reference.
///
/// Absolute references are used as they are.
pub fn compose_child_url(base: &str, variant_uri: &str) -> String {
    if is_absolute(variant_uri) {
        variant_uri.to_string()
    } else {
        format!("{base}{variant_uri}")
    }
}

/// A reference is absolute when it carries its own scheme.
pub(crate) fn is_absolute(uri: &str) -> bool {
    Url::parse(uri).is_ok()
}

fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => "",
    }
}

fn last_segment(dir: &str) -> &str {
    dir.rsplit('/').next().unwrap_or("")
}

/// A `?` inside a parsed path is percent-encoded.
fn query_marker(segment: &str) -> Option<usize> {
    let literal = segment.find('?');
    let encoded = segment.to_ascii_uppercase().find("%3F");
    match (literal, encoded) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn join_path(dir: &str, name: &str) -> String {
    if name.is_empty() {
        dir.to_string()
    } else if dir.ends_with('/') {
        format!("{dir}{name}")
    } else {
        format!("{dir}/{name}")
    }
}
