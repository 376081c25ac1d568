use std::io::Write;

use hls_resolver::ResolvedSegment;

use crate::error::AppError;

/// Write one line per segment: the URI, then the key when encrypted.
pub fn write_plain<W: Write>(out: &mut W, segments: &[ResolvedSegment]) -> Result<(), AppError> {
    for segment in segments {
        match segment.key() {
            Some(key) => writeln!(out, "{} key={} {}", segment.uri(), key.method, key.uri)?,
            None => writeln!(out, "{}", segment.uri())?,
        }
    }
    out.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(out: &mut W, segments: &[ResolvedSegment]) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut *out, segments)?;
    writeln!(out)?;
    Ok(())
}
