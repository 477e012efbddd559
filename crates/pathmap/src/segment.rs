//! Segment codec: escaping for node lines, percent-decoding for paths.
//!
//! Inside a node line the four bytes `\`, `/`, `:`, `!` are escaped by
//! prefixing a single `\`; any unescaped `/`, `:` or `!` terminates the
//! segment. Input paths carry percent-encoded (`%XX`) segments; the trie
//! stores the decoded form.

use percent_encoding::percent_decode_str;

use crate::error::{Error, Result};

/// Escape a segment for inclusion in a node line.
///
/// # Example
///
/// ```
/// use pathmap::segment::escape;
///
/// assert_eq!(escape("fancy/paths"), "fancy\\/paths");
/// assert_eq!(escape("plain"), "plain");
/// ```
#[must_use]
pub fn escape(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        if matches!(c, '\\' | '/' | ':' | '!') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Decode an escaped segment starting at `start`, stopping at the first
/// unescaped `/`, `:` or `!`.
///
/// Returns the decoded segment and the index of the terminating byte
/// (`bytes.len()` if the input ended first).
///
/// # Errors
///
/// Returns `Error::MalformedLine` on an unterminated escape or when the
/// decoded bytes are not valid UTF-8.
pub(crate) fn take_escaped(bytes: &[u8], start: usize) -> Result<(String, usize)> {
    let mut seg = Vec::new();
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                let Some(&next) = bytes.get(i + 1) else {
                    return Err(Error::MalformedLine {
                        pos: i,
                        reason: "unterminated escape",
                    });
                };
                seg.push(next);
                i += 2;
            }
            b'/' | b':' | b'!' => break,
            b => {
                seg.push(b);
                i += 1;
            }
        }
    }
    let seg = String::from_utf8(seg).map_err(|_| Error::MalformedLine {
        pos: start,
        reason: "segment is not valid UTF-8",
    })?;
    Ok((seg, i))
}

/// Percent-decode a single path segment.
///
/// Invalid `%XX` sequences pass through literally; decoded bytes that do
/// not form UTF-8 are replaced with U+FFFD.
#[must_use]
pub fn percent_decode(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

/// Split a path into percent-decoded segments.
///
/// The leading `/` denotes the root and is consumed; every remaining
/// `/`-separated component becomes one segment, empty components included
/// (so `"/"` yields one empty segment and `"/a//b"` yields three).
///
/// # Errors
///
/// Returns `Error::PathShape` if `path` does not start with `/`.
pub fn split_path(path: &str) -> Result<Vec<String>> {
    let Some(rest) = path.strip_prefix('/') else {
        return Err(Error::PathShape);
    };
    Ok(rest.split('/').map(percent_decode).collect())
}
