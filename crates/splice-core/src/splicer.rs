//! Splice segment sequences back into a [`Tree`].
//!
//! Text segments before the first node become the target slot (`text` or
//! `tail`); text after an inserted node is appended to that node's tail.
//! Inserted nodes keep their relative order:
//! - text splices put them at the front of the node's children
//! - tail splices put them right after the node in its parent

use splice_tree::{NodeId, Tree, TreeNode};

use crate::segment::Segment;

/// Rewrite `node.text` from `segments`, inserting fragment nodes as leading children.
///
/// Pre-existing children keep their order after the inserted ones. An empty
/// sequence leaves the node untouched.
pub fn splice_text(tree: &mut Tree, node: NodeId, segments: Vec<Segment>) {
    if segments.is_empty() {
        return;
    }
    let (text, nodes) = merge_segments(segments);
    let inserted = nodes.len();

    tree.set_text(node, text);
    for (offset, subtree) in nodes.into_iter().enumerate() {
        tree.insert_subtree(node, offset, subtree);
    }

    tracing::debug!(node = node.index(), inserted, "Spliced text");
}

/// Rewrite `node.tail` from `segments`, inserting fragment nodes as following siblings.
///
/// # Panics
///
/// Panics if `node` has no parent. Root nodes have no tail slot to splice into,
/// so callers must check before calling.
pub fn splice_tail(tree: &mut Tree, node: NodeId, segments: Vec<Segment>) {
    if segments.is_empty() {
        return;
    }
    let parent = tree
        .parent(node)
        .expect("tail splice requires a node with a parent");
    let index = tree
        .index_in_parent(node)
        .expect("node must be listed among its parent's children")
        + 1;
    let (tail, nodes) = merge_segments(segments);
    let inserted = nodes.len();

    tree.set_tail(node, tail);
    for (offset, subtree) in nodes.into_iter().enumerate() {
        tree.insert_subtree(parent, index + offset, subtree);
    }

    tracing::debug!(node = node.index(), inserted, "Spliced tail");
}

/// Flatten segments into leading text plus nodes whose tails absorb later text.
fn merge_segments(segments: Vec<Segment>) -> (String, Vec<TreeNode>) {
    let mut lead = String::new();
    let mut nodes: Vec<TreeNode> = Vec::new();

    for segment in segments {
        match segment {
            Segment::Text(text) => append_text(&mut lead, &mut nodes, &text),
            Segment::Fragment(fragment) => {
                append_text(&mut lead, &mut nodes, &fragment.text);
                nodes.extend(fragment.nodes);
            }
        }
    }

    (lead, nodes)
}

fn append_text(lead: &mut String, nodes: &mut [TreeNode], text: &str) {
    match nodes.last_mut() {
        Some(last) => last.tail.push_str(text),
        None => lead.push_str(text),
    }
}
