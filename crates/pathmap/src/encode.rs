//! Depth-first serializer with line-level deduplication.
//!
//! Lines are pushed into an append-only buffer; each line's byte offset is
//! assigned as it is pushed and embedded by the parent line. A table keyed
//! by full line text collapses identical payloads, and because node-line
//! text is deterministic in child ordering and child offsets, structurally
//! identical subtrees collapse transitively. The root line is pushed last
//! so readers can locate it from the end of the buffer.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::line::{NodeLine, Ref};
use crate::trie::Node;

/// Serialize a trie into the complete file text.
pub(crate) fn stringify(root: &Node) -> Result<String> {
    let mut ser = Serializer::default();
    ser.emit_node(root)?;
    Ok(ser.buf)
}

#[derive(Default)]
struct Serializer {
    buf: String,
    /// line text → offset of its first emission
    seen: HashMap<String, u64>,
}

impl Serializer {
    /// Append `text` as a line, or return the offset of an identical line
    /// pushed earlier.
    fn push(&mut self, text: &str) -> u64 {
        if let Some(&offset) = self.seen.get(text) {
            return offset;
        }
        let offset = self.buf.len() as u64;
        self.buf.push_str(text);
        self.buf.push('\n');
        self.seen.insert(text.to_owned(), offset);
        offset
    }

    /// `true` is carried inline as the `!` marker; every other payload
    /// gets a JSON line.
    fn emit_leaf(&mut self, payload: &Value) -> Result<Ref> {
        if *payload == Value::Bool(true) {
            return Ok(Ref::Inline);
        }
        let text =
            serde_json::to_string(payload).map_err(|e| Error::JsonSerialize(e.to_string()))?;
        Ok(Ref::Offset(self.push(&text)))
    }

    /// Post-order: child lines first, then this node's line. A child that
    /// is payload-only collapses to its leaf reference; anything with
    /// children of its own becomes a node line.
    fn emit_node(&mut self, node: &Node) -> Result<u64> {
        let mut line = NodeLine::default();
        if let Some(payload) = &node.payload {
            line.self_ref = Some(self.emit_leaf(payload)?);
        }
        for (seg, child) in &node.children {
            let child_ref = if child.children.is_empty()
                && let Some(payload) = &child.payload
            {
                self.emit_leaf(payload)?
            } else {
                Ref::Offset(self.emit_node(child)?)
            };
            line.children.insert(seg.clone(), child_ref);
        }
        Ok(self.push(&line.encode()))
    }
}
