//! Read-only PathMap over serialized bytes.
//!
//! The reader holds the complete file bytes and resolves lookups by
//! decoding only the lines a traversal touches. The root line is the last
//! non-empty line of the file; every inter-line reference is an absolute
//! byte offset, so the buffer must never be edited after writing.

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::line::{NodeLine, Ref};
use crate::segment;

/// A decoded line: either a node record or a JSON leaf payload.
#[derive(Debug, Clone)]
enum Line {
    Node(NodeLine),
    Leaf(Value),
}

/// Read-only view over a serialized PathMap.
///
/// Opened from a borrowed slice, lookups parse lazily over the original
/// buffer; decoded lines are cached by offset so repeated traversals do
/// not re-parse. The cache makes a `PathMap` `!Sync` — share the bytes
/// across threads, not the instance.
///
/// # Example
///
/// ```
/// use pathmap::{PathMap, PathTrie};
/// use serde_json::json;
///
/// let mut trie = PathTrie::new();
/// trie.insert("/foo", json!("f"))?;
/// let text = trie.stringify()?;
///
/// let map = PathMap::from_slice(text.as_bytes())?;
/// assert_eq!(map.find("/foo")?, Some(json!("f")));
/// assert_eq!(map.find("/bar")?, None);
/// # Ok::<(), pathmap::Error>(())
/// ```
pub struct PathMap<'a> {
    /// The file bytes - borrowed for zero-copy opens, owned otherwise.
    data: Cow<'a, [u8]>,
    /// Offset of the first byte of the root line.
    root_offset: u64,
    /// offset → decoded line, filled as traversals touch lines.
    cache: RefCell<HashMap<u64, Line>>,
}

impl<'a> PathMap<'a> {
    /// Open a serialized PathMap from a byte slice (zero-copy).
    ///
    /// Locates the root line by scanning from the end: trailing newlines
    /// are skipped, then the root starts just after the preceding newline
    /// (or at byte 0).
    ///
    /// # Errors
    ///
    /// Returns `Error::UnexpectedEof` if the buffer contains no complete,
    /// newline-terminated line.
    pub fn from_slice(data: &'a [u8]) -> Result<Self> {
        Self::build(Cow::Borrowed(data))
    }

    /// Open from an owned string, producing a `'static` reader.
    ///
    /// # Errors
    ///
    /// Same as [`PathMap::from_slice`].
    pub fn from_string(text: String) -> Result<PathMap<'static>> {
        PathMap::build(Cow::Owned(text.into_bytes()))
    }

    /// Open from an owned byte buffer, producing a `'static` reader.
    ///
    /// # Errors
    ///
    /// Same as [`PathMap::from_slice`].
    pub fn from_vec(data: Vec<u8>) -> Result<PathMap<'static>> {
        PathMap::build(Cow::Owned(data))
    }

    fn build(data: Cow<'_, [u8]>) -> Result<PathMap<'_>> {
        let mut end = data.len();
        while end > 0 && data[end - 1] == b'\n' {
            end -= 1;
        }
        if end == 0 {
            // Nothing but (possibly) newlines
            return Err(Error::UnexpectedEof { offset: 0 });
        }
        if end == data.len() {
            // The last line never got its terminator
            return Err(Error::UnexpectedEof { offset: end });
        }
        let root_offset = match data[..end].iter().rposition(|&b| b == b'\n') {
            Some(i) => (i + 1) as u64,
            None => 0,
        };
        Ok(PathMap {
            data,
            root_offset,
            cache: RefCell::new(HashMap::new()),
        })
    }

    /// Look up the payload stored at exactly `path`.
    ///
    /// Resolves the root line, then follows one child reference per
    /// percent-decoded segment. `Ok(None)` means the path was never
    /// inserted; errors are reserved for bad arguments and corrupt files.
    ///
    /// # Errors
    ///
    /// Returns `Error::PathShape` if `path` does not start with `/`,
    /// `Error::UnexpectedPayload` if the root line is a JSON leaf, and
    /// `Error::UnexpectedEof` / `Error::MalformedLine` /
    /// `Error::JsonParse` on corrupt buffers.
    pub fn find(&self, path: &str) -> Result<Option<Value>> {
        let segments = segment::split_path(path)?;

        let mut node = match self.line_at(self.root_offset)? {
            Line::Node(node) => node,
            Line::Leaf(_) => {
                return Err(Error::UnexpectedPayload {
                    offset: self.root_offset,
                });
            }
        };

        for (i, seg) in segments.iter().enumerate() {
            let last = i + 1 == segments.len();
            let child = match node.children.get(seg.as_str()) {
                Some(&child) => child,
                None => return Ok(None),
            };
            match child {
                Ref::Inline => {
                    // The remaining path must be empty
                    return Ok(if last { Some(Value::Bool(true)) } else { None });
                }
                Ref::Offset(offset) => match self.line_at(offset)? {
                    Line::Node(next) => node = next,
                    Line::Leaf(payload) => {
                        return Ok(if last { Some(payload) } else { None });
                    }
                },
            }
        }

        // All segments consumed on a node line: resolve its self-reference.
        match node.self_ref {
            Some(Ref::Inline) => Ok(Some(Value::Bool(true))),
            Some(Ref::Offset(offset)) => match self.line_at(offset)? {
                Line::Leaf(payload) => Ok(Some(payload)),
                Line::Node(_) => Err(Error::MalformedLine {
                    pos: offset as usize,
                    reason: "payload reference resolves to a node line",
                }),
            },
            None => Ok(None),
        }
    }

    /// Read and decode the line starting at `offset`, consulting the
    /// parse cache first. Failed decodes are not cached.
    fn line_at(&self, offset: u64) -> Result<Line> {
        if let Some(line) = self.cache.borrow().get(&offset) {
            return Ok(line.clone());
        }
        let text = self.read_line(offset)?;
        let line = match text.as_bytes().first() {
            None => Line::Node(NodeLine::default()),
            Some(&b) if NodeLine::starts_line(b) => Line::Node(NodeLine::decode(text)?),
            Some(_) => {
                Line::Leaf(serde_json::from_str(text).map_err(|e| Error::JsonParse(e.to_string()))?)
            }
        };
        self.cache.borrow_mut().insert(offset, line.clone());
        Ok(line)
    }

    /// Slice the line text at `offset`: scan forward to the next newline
    /// and decode the bytes in between.
    fn read_line(&self, offset: u64) -> Result<&str> {
        let data = self.data.as_ref();
        let start = offset as usize;
        if start >= data.len() {
            return Err(Error::UnexpectedEof { offset: start });
        }
        let end = data[start..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|i| start + i)
            .ok_or(Error::UnexpectedEof { offset: data.len() })?;
        std::str::from_utf8(&data[start..end]).map_err(|_| Error::MalformedLine {
            pos: start,
            reason: "line is not valid UTF-8",
        })
    }

    /// Get the raw file bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_ref()
    }

    /// Get the byte offset of the root line.
    #[inline]
    #[must_use]
    pub fn root_offset(&self) -> u64 {
        self.root_offset
    }

    /// Get the file length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer is empty (never true for a constructed reader).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Convert to an owned reader with `'static` lifetime, keeping the
    /// parse cache.
    #[must_use]
    pub fn into_owned(self) -> PathMap<'static> {
        PathMap {
            data: Cow::Owned(self.data.into_owned()),
            root_offset: self.root_offset,
            cache: self.cache,
        }
    }
}

impl std::fmt::Debug for PathMap<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathMap")
            .field("len", &self.data.len())
            .field("root_offset", &format_args!("{:#x}", self.root_offset))
            .field("cached_lines", &self.cache.borrow().len())
            .finish()
    }
}
