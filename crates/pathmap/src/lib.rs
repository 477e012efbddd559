//! PathMap: a compact, human-inspectable, read-only file format mapping
//! path-style string keys to small JSON payloads.
//!
//! The file is newline-delimited UTF-8 text. Each line is either a
//! JSON-encoded leaf payload or a node line; node lines reference other
//! lines by absolute byte offset, identical lines are stored once, and
//! the last non-empty line is the root. A writer builds the file from an
//! in-memory trie ([`PathTrie`]); a reader ([`PathMap`]) answers point
//! lookups by decoding only the lines it touches. A Bloom filter
//! companion ([`BloomFilter`]) over the key set lets readers
//! short-circuit absence checks.
//!
//! # Example
//!
//! ```
//! use pathmap::{PathMap, PathTrie};
//! use serde_json::json;
//!
//! let mut trie = PathTrie::new();
//! trie.insert("/women/shoes", json!({"count": 12}))?;
//! trie.insert("/women/boots", json!(true))?;
//!
//! let text = trie.stringify()?;
//! let map = PathMap::from_slice(text.as_bytes())?;
//! assert_eq!(map.find("/women/shoes")?, Some(json!({"count": 12})));
//! assert_eq!(map.find("/women/sandals")?, None);
//! # Ok::<(), pathmap::Error>(())
//! ```

pub mod bloom;
pub mod document;
pub(crate) mod encode;
pub mod error;
pub mod line;
pub mod segment;
pub mod trie;

pub use bloom::{BloomFilter, BloomParams};
pub use document::PathMap;
pub use error::{Error, Result};
pub use line::{NodeLine, Ref};
pub use trie::PathTrie;
