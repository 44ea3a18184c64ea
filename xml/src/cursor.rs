//! Small recursive-descent helpers for walking an [`XmlReader`] stream without re-deriving
//! depth bookkeeping in every frontend. Frontends call [`for_each_child`] from a `Start` event
//! already consumed, and call the closure once per direct child `Start` event; anything the
//! closure doesn't itself consume is skipped automatically before moving to the next sibling.

use crate::{NodeType, XmlReader};

/// Skips the remainder of the subtree opened by the `Start` event at `depth` (that is, consumes
/// events up to and including its matching `End`).
pub fn skip_subtree(reader: &mut dyn XmlReader, depth: usize) {
    loop {
        if !reader.advance() {
            return;
        }
        if reader.node_type() == NodeType::End && reader.depth() == depth {
            return;
        }
    }
}

/// Collects the coalesced text content of the element currently open at `depth`, skipping any
/// child elements (mixed content is not meaningful for a value payload).
pub fn text_content(reader: &mut dyn XmlReader, depth: usize) -> String {
    let mut text = String::new();
    loop {
        if !reader.advance() {
            break;
        }
        match reader.node_type() {
            NodeType::End if reader.depth() == depth => break,
            NodeType::Text => text.push_str(reader.text()),
            NodeType::Start => {
                let child_depth = reader.depth();
                skip_subtree(reader, child_depth);
            }
            _ => {}
        }
    }
    text
}

/// Invokes `f` once per direct child `Start` event of the element open at `depth`. `f` receives
/// the reader positioned at the child's `Start` event (depth + 1), and may consume as much or as
/// little of the child subtree as it likes — including, for a nested frontend, walking all the
/// way to the child's own closing tag itself (e.g. via a nested [`for_each_child`] call). Whatever
/// is left unconsumed is skipped automatically before moving to the next sibling.
pub fn for_each_child(reader: &mut dyn XmlReader, depth: usize, mut f: impl FnMut(&mut dyn XmlReader)) {
    let child_depth = depth + 1;
    loop {
        if !reader.advance() {
            return;
        }
        match reader.node_type() {
            NodeType::End if reader.depth() == depth => return,
            NodeType::Start if reader.depth() == child_depth => {
                f(reader);
                let already_closed = reader.node_type() == NodeType::End && reader.depth() == child_depth;
                if !already_closed {
                    skip_subtree(reader, child_depth);
                }
            }
            _ => {}
        }
    }
}
