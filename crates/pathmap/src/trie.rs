//! In-memory writer trie.
//!
//! A [`PathTrie`] is built by repeated insertion, serialized once with
//! [`PathTrie::stringify`], and discarded. It is the mutable half of the
//! format; the serialized text is immutable and read with
//! [`PathMap`](crate::PathMap).

use std::collections::BTreeMap;

use serde_json::Value;

use crate::encode;
use crate::error::Result;
use crate::segment;

/// One trie node: optional self-payload plus children keyed by decoded
/// segment. The map is ordered so serialization sees children in
/// ascending byte order.
#[derive(Debug, Clone, Default)]
pub(crate) struct Node {
    pub(crate) payload: Option<Value>,
    pub(crate) children: BTreeMap<String, Node>,
}

/// Mutable path → payload mapping.
///
/// Paths must start with `/`; segments are percent-decoded on the way in,
/// so `/fancy%2Fpaths` addresses a single segment containing a slash.
/// Payloads are opaque JSON values and the last insert for a path wins.
///
/// # Example
///
/// ```
/// use pathmap::PathTrie;
/// use serde_json::json;
///
/// let mut trie = PathTrie::new();
/// trie.insert("/foo", json!("f")).unwrap();
/// assert_eq!(trie.find("/foo").unwrap(), Some(&json!("f")));
/// assert_eq!(trie.stringify().unwrap(), "\"f\"\n/foo:\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathTrie {
    root: Node,
    len: usize,
}

impl PathTrie {
    /// Create an empty trie.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `payload` at `path`, overwriting any prior value there.
    ///
    /// # Errors
    ///
    /// Returns `Error::PathShape` if `path` does not start with `/`; the
    /// trie is untouched on error.
    pub fn insert(&mut self, path: &str, payload: Value) -> Result<()> {
        let segments = segment::split_path(path)?;
        let mut node = &mut self.root;
        for seg in segments {
            node = node.children.entry(seg).or_default();
        }
        if node.payload.replace(payload).is_none() {
            self.len += 1;
        }
        Ok(())
    }

    /// Insert every `(path, payload)` pair in order.
    ///
    /// # Errors
    ///
    /// Returns the first `insert` error; earlier entries stay inserted.
    pub fn bulk_insert<I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        for (path, payload) in entries {
            self.insert(&path, payload)?;
        }
        Ok(())
    }

    /// Look up the payload inserted at exactly `path`.
    ///
    /// # Errors
    ///
    /// Returns `Error::PathShape` if `path` does not start with `/`.
    pub fn find(&self, path: &str) -> Result<Option<&Value>> {
        let segments = segment::split_path(path)?;
        let mut node = &self.root;
        for seg in &segments {
            match node.children.get(seg.as_str()) {
                Some(child) => node = child,
                None => return Ok(None),
            }
        }
        Ok(node.payload.as_ref())
    }

    /// Number of distinct paths inserted.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check whether nothing has been inserted.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Serialize into the file text.
    ///
    /// Deterministic given the final trie state. The returned string is
    /// the complete file: newline-terminated lines with the root last.
    ///
    /// # Errors
    ///
    /// Returns `Error::JsonSerialize` if a payload cannot be encoded.
    pub fn stringify(&self) -> Result<String> {
        encode::stringify(&self.root)
    }
}
