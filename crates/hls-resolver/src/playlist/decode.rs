// Playlist decoding: m3u8 text into the two-case `Playlist` model.

use std::sync::Arc;

use m3u8_rs::{ExtTag, MasterPlaylist, MediaPlaylist, MediaSegment, parse_playlist_res};
use tracing::trace;

use crate::ResolveError;
use crate::playlist::model::{
    ByteRange, EncryptionKey, FlatPlaylist, IndexPlaylist, InitMap, MediaChunk, Playlist, Variant,
};

/// Decode a playlist body fetched from `url`.
pub fn decode_playlist(url: &str, body: &[u8]) -> Result<Playlist, ResolveError> {
    match parse_playlist_res(body) {
        Ok(m3u8_rs::Playlist::MasterPlaylist(pl)) => decode_index(url, pl).map(Playlist::Index),
        Ok(m3u8_rs::Playlist::MediaPlaylist(pl)) => decode_flat(url, pl).map(Playlist::Flat),
        Err(e) => Err(ResolveError::decode(url, e.to_string())),
    }
}

fn decode_index(url: &str, playlist: MasterPlaylist) -> Result<IndexPlaylist, ResolveError> {
    let variants: Vec<Variant> = playlist
        .variants
        .into_iter()
        .filter(|v| !v.is_i_frame)
        .map(|v| Variant {
            uri: v.uri,
            resolution: v.resolution.map(|r| format!("{}x{}", r.width, r.height)),
            bandwidth: v.bandwidth,
            average_bandwidth: v.average_bandwidth,
            codecs: v.codecs,
            frame_rate: v.frame_rate,
        })
        .collect();

    if variants.is_empty() {
        return Err(ResolveError::UnsupportedFormat(format!(
            "index playlist {url} has no playable variants"
        )));
    }

    Ok(IndexPlaylist { variants })
}

fn decode_flat(url: &str, playlist: MediaPlaylist) -> Result<FlatPlaylist, ResolveError> {
    if playlist.i_frames_only {
        return Err(ResolveError::UnsupportedFormat(format!(
            "I-frame only playlist {url}"
        )));
    }

    let mut default_key = None;
    let mut chunks = Vec::with_capacity(playlist.segments.len());

    for (idx, mut segment) in playlist.segments.into_iter().enumerate() {
        let key = segment_key(url, &mut segment)?;

        // A key ahead of the first entry applies to the whole playlist.
        let key = if idx == 0 {
            default_key = key;
            None
        } else {
            key.map(Arc::new)
        };

        if segment.uri.trim().is_empty() {
            trace!("Dropping empty entry at position {idx} in {url}");
            continue;
        }

        chunks.push(MediaChunk {
            uri: segment.uri,
            duration: segment.duration,
            title: segment.title.filter(|t| !t.is_empty()),
            sequence: playlist.media_sequence.wrapping_add(idx as u64),
            byte_range: segment.byte_range.map(decode_byte_range),
            discontinuity: segment.discontinuity,
            init_map: segment.map.map(|m| InitMap {
                uri: m.uri,
                byte_range: m.byte_range.map(decode_byte_range),
            }),
            key,
        });
    }

    Ok(FlatPlaylist {
        target_duration: playlist.target_duration,
        media_sequence: playlist.media_sequence,
        end_list: playlist.end_list,
        default_key,
        chunks,
    })
}

/// Key declared directly ahead of `segment`, if any.
fn segment_key(
    url: &str,
    segment: &mut MediaSegment,
) -> Result<Option<EncryptionKey>, ResolveError> {
    if let Some(key) = segment.key.take() {
        return decode_key(url, key).map(Some);
    }

    // m3u8-rs refuses `METHOD=NONE` without an IV and keeps the line as an
    // unknown tag instead.
    Ok(segment.unknown_tags.iter().rev().find_map(clear_key_marker))
}

fn clear_key_marker(tag: &ExtTag) -> Option<EncryptionKey> {
    if tag.tag != "X-KEY" {
        return None;
    }
    let method = tag
        .rest
        .as_deref()?
        .split(',')
        .find_map(|attr| attr.trim().strip_prefix("METHOD="))?;

    method.trim().eq_ignore_ascii_case("NONE").then(|| EncryptionKey {
        method: "NONE".to_string(),
        uri: String::new(),
        iv: None,
        key_format: None,
        key_format_versions: None,
    })
}

fn decode_key(url: &str, key: m3u8_rs::Key) -> Result<EncryptionKey, ResolveError> {
    let method = key.method.to_string();
    let uri = match key.uri {
        Some(uri) => uri,
        None if method.eq_ignore_ascii_case("NONE") => String::new(),
        None => {
            return Err(ResolveError::decode(
                url,
                format!("EXT-X-KEY with METHOD={method} has no URI"),
            ));
        }
    };

    Ok(EncryptionKey {
        method,
        uri,
        iv: key.iv,
        key_format: key.keyformat,
        key_format_versions: key.keyformatversions,
    })
}

fn decode_byte_range(range: m3u8_rs::ByteRange) -> ByteRange {
    ByteRange {
        length: range.length,
        offset: range.offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://cdn.example.com/video/index.m3u8";

    fn flat(body: &str) -> FlatPlaylist {
        match decode_playlist(URL, body.as_bytes()).unwrap() {
            Playlist::Flat(pl) => pl,
            other => panic!("expected flat playlist, got {}", other.kind()),
        }
    }

    #[test]
    fn decodes_index_with_resolution_labels() {
        let body = "#EXTM3U\n\
            #EXT-X-STREAM-INF:BANDWIDTH=5000000,RESOLUTION=1920x1080\n\
            1080p/index.m3u8\n\
            #EXT-X-STREAM-INF:BANDWIDTH=2500000\n\
            audio/index.m3u8\n\
            #EXT-X-I-FRAME-STREAM-INF:BANDWIDTH=200000,URI=\"iframes.m3u8\"\n";

        let Playlist::Index(index) = decode_playlist(URL, body.as_bytes()).unwrap() else {
            panic!("expected index playlist");
        };

        assert_eq!(index.variants.len(), 2);
        assert_eq!(index.variants[0].uri, "1080p/index.m3u8");
        assert_eq!(index.variants[0].resolution.as_deref(), Some("1920x1080"));
        assert_eq!(index.variants[0].pixels(), Some(1920 * 1080));
        assert_eq!(index.variants[1].resolution, None);
        assert_eq!(index.variants[1].bandwidth, 2_500_000);
    }

    #[test]
    fn leading_key_becomes_default_key() {
        let pl = flat(
            "#EXTM3U\n\
             #EXT-X-TARGETDURATION:10\n\
             #EXT-X-MEDIA-SEQUENCE:7\n\
             #EXT-X-KEY:METHOD=AES-128,URI=\"key.bin\",IV=0x1234\n\
             #EXTINF:10.0,\n\
             a.ts\n\
             #EXTINF:10.0,\n\
             b.ts\n\
             #EXT-X-KEY:METHOD=AES-128,URI=\"key2.bin\"\n\
             #EXTINF:10.0,\n\
             c.ts\n\
             #EXT-X-ENDLIST\n",
        );

        let default_key = pl.default_key.as_ref().unwrap();
        assert_eq!(default_key.method, "AES-128");
        assert_eq!(default_key.uri, "key.bin");
        assert_eq!(default_key.iv.as_deref(), Some("0x1234"));

        assert_eq!(pl.chunks.len(), 3);
        assert!(pl.chunks[0].key.is_none());
        assert!(pl.chunks[1].key.is_none());
        assert_eq!(pl.chunks[2].key.as_ref().unwrap().uri, "key2.bin");
        assert_eq!(
            pl.chunks.iter().map(|c| c.sequence).collect::<Vec<_>>(),
            vec![7, 8, 9]
        );
        assert!(pl.end_list);
        assert_eq!(pl.target_duration, 10);
    }

    #[test]
    fn keeps_byte_ranges_and_init_map() {
        let pl = flat(
            "#EXTM3U\n\
             #EXT-X-TARGETDURATION:4\n\
             #EXT-X-MAP:URI=\"init.mp4\"\n\
             #EXTINF:4.0,\n\
             #EXT-X-BYTERANGE:1000@0\n\
             media.mp4\n\
             #EXT-X-DISCONTINUITY\n\
             #EXTINF:4.0,\n\
             next.mp4\n",
        );

        assert_eq!(pl.chunks[0].init_map.as_ref().unwrap().uri, "init.mp4");
        assert_eq!(
            pl.chunks[0].byte_range,
            Some(ByteRange {
                length: 1000,
                offset: Some(0)
            })
        );
        assert!(!pl.chunks[0].discontinuity);
        assert!(pl.chunks[1].discontinuity);
    }

    #[test]
    fn key_without_uri_is_a_decode_error() {
        let body = "#EXTM3U\n\
            #EXT-X-TARGETDURATION:10\n\
            #EXT-X-KEY:METHOD=AES-128\n\
            #EXTINF:10.0,\n\
            a.ts\n";

        assert!(matches!(
            decode_playlist(URL, body.as_bytes()),
            Err(ResolveError::Decode { .. })
        ));
    }

    #[test]
    fn none_key_needs_no_uri() {
        let pl = flat(
            "#EXTM3U\n\
             #EXT-X-TARGETDURATION:10\n\
             #EXTINF:10.0,\n\
             a.ts\n\
             #EXT-X-KEY:METHOD=NONE\n\
             #EXTINF:10.0,\n\
             b.ts\n",
        );

        assert!(pl.chunks[0].key.is_none());
        assert!(pl.chunks[1].key.as_ref().unwrap().is_none_method());
    }

    #[test]
    fn none_key_ahead_of_first_chunk_is_default_key() {
        let pl = flat(
            "#EXTM3U\n\
             #EXT-X-TARGETDURATION:10\n\
             #EXT-X-KEY:METHOD=NONE\n\
             #EXTINF:10.0,\n\
             a.ts\n",
        );

        assert!(pl.default_key.as_ref().unwrap().is_none_method());
        assert!(pl.chunks[0].key.is_none());
    }

    #[test]
    fn sequence_numbers_wrap_at_u64_max() {
        let pl = flat(
            "#EXTM3U\n\
             #EXT-X-TARGETDURATION:10\n\
             #EXT-X-MEDIA-SEQUENCE:18446744073709551615\n\
             #EXTINF:10.0,\n\
             a.ts\n\
             #EXTINF:10.0,\n\
             b.ts\n",
        );

        assert_eq!(pl.chunks[0].sequence, u64::MAX);
        assert_eq!(pl.chunks[1].sequence, 0);
    }

    #[test]
    fn garbage_body_is_a_decode_error() {
        let err = decode_playlist(URL, b"<html>not a playlist</html>").unwrap_err();
        assert!(matches!(err, ResolveError::Decode { ref url, .. } if url == URL));
    }

    #[test]
    fn iframe_only_index_is_unsupported() {
        let body = "#EXTM3U\n\
            #EXT-X-I-FRAME-STREAM-INF:BANDWIDTH=200000,URI=\"iframes.m3u8\"\n";

        assert!(matches!(
            decode_playlist(URL, body.as_bytes()),
            Err(ResolveError::UnsupportedFormat(_))
        ));
    }
}
