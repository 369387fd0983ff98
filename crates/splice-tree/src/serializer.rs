//! HTML serializer for [`Tree`].
//!
//! Output mirrors the text/tail walk: open tag, text, each child followed by
//! its tail, close tag. Void elements have no end tag; every other element
//! gets an explicit one. `script` and `style` bodies are written unescaped.

use std::fmt::Write;

use crate::parser::is_void_element;
use crate::tree::{NodeId, NodeKind, Tree};

/// Elements whose content HTML reads as raw text.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

fn is_raw_text_element(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.iter().any(|raw| raw.eq_ignore_ascii_case(tag))
}

/// Serialize the whole document (the root's text and children, without a root tag).
pub fn serialize_document(tree: &Tree) -> String {
    serialize_node(tree, tree.root())
}

/// Serialize `id` and its subtree. The node's own tail is not included.
///
/// For the root only its content is written.
pub fn serialize_node(tree: &Tree, id: NodeId) -> String {
    let mut out = String::with_capacity(1024);
    write_node(tree, id, &mut out);
    out
}

fn write_node(tree: &Tree, id: NodeId, out: &mut String) {
    let node = tree.node(id);
    match &node.kind {
        NodeKind::Root => write_content(tree, id, false, out),
        NodeKind::Comment => {
            out.push_str("<!--");
            out.push_str(&node.text);
            out.push_str("-->");
        }
        NodeKind::Element { tag, attrs } => {
            out.push('<');
            out.push_str(tag);
            for (key, value) in attrs {
                write!(out, r#" {key}="{}""#, escape_attr(value)).unwrap();
            }
            out.push('>');

            if is_void_element(tag) && node.text.is_empty() && node.children().is_empty() {
                return;
            }
            write_content(tree, id, is_raw_text_element(tag), out);
            write!(out, "</{tag}>").unwrap();
        }
    }
}

fn write_content(tree: &Tree, id: NodeId, raw: bool, out: &mut String) {
    let write_text = |text: &str, out: &mut String| {
        if raw {
            out.push_str(text);
        } else {
            out.push_str(&escape_text(text));
        }
    };
    write_text(tree.text(id), out);
    for &child in tree.children(id) {
        write_node(tree, child, out);
        write_text(tree.tail(child), out);
    }
}

/// Escape text content.
pub fn escape_text(text: &str) -> String {
    escape(text, false)
}

/// Escape an attribute value for use inside double quotes.
pub fn escape_attr(text: &str) -> String {
    escape(text, true)
}

fn escape(text: &str, escape_quotes: bool) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if escape_quotes => result.push_str("&quot;"),
            _ => result.push(ch),
        }
    }
    result
}
