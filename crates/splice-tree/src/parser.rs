//! Markup parser producing text/tail trees.
//!
//! Input is wrapped in a synthetic container element and read with
//! `quick-xml`. HTML void elements may be left unclosed, and valueless
//! attributes are accepted. Everything else must be balanced: renderer output
//! that does not nest properly is rejected so callers can fall back to the
//! original text.

#![allow(clippy::unused_self)] // Unit struct methods have &self for API consistency

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::entities::{convert_html_entities, decode_reference};
use crate::error::ParseError;
use crate::tree::{NodeKind, Tree, TreeNode};

/// Name of the synthetic element wrapped around every input.
const WRAPPER_TAG: &str = "splice-root";

/// HTML elements that never have content or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Check whether `tag` is an HTML void element.
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|void| void.eq_ignore_ascii_case(tag))
}

/// Parsed markup fragment: leading text followed by top-level nodes.
///
/// Each node carries its own tail, so the fragment reads as
/// `text, nodes[0], nodes[0].tail, nodes[1], nodes[1].tail, ...`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    /// Text before the first node.
    pub text: String,
    /// Top-level nodes in order.
    pub nodes: Vec<TreeNode>,
}

/// Parse HTML-ish markup into trees and fragments.
pub struct MarkupParser;

impl MarkupParser {
    /// Create a new parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse a whole document. Comments are kept as [`NodeKind::Comment`] nodes.
    pub fn parse_document(&self, html: &str) -> Result<Tree, ParseError> {
        let root = self.parse_wrapped(html, true)?;
        Ok(Tree::from(root))
    }

    /// Parse a replacement fragment.
    ///
    /// Comments, declarations and processing instructions are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Empty`] for an empty string and a structural
    /// error for anything that does not nest properly.
    pub fn parse_fragment(&self, html: &str) -> Result<Fragment, ParseError> {
        if html.is_empty() {
            return Err(ParseError::Empty);
        }
        let root = self.parse_wrapped(html, false)?;
        Ok(Fragment {
            text: root.text,
            nodes: root.children,
        })
    }

    fn parse_wrapped(&self, html: &str, keep_comments: bool) -> Result<TreeNode, ParseError> {
        let html = convert_html_entities(html);
        let wrapped = format!("<{WRAPPER_TAG}>{html}</{WRAPPER_TAG}>");

        let mut reader = Reader::from_str(&wrapped);
        let config = reader.config_mut();
        config.trim_text(false);
        // End tags are checked here so that unclosed void elements are accepted.
        config.check_end_names = false;
        config.allow_unmatched_ends = true;

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(_) => break,
                Event::Eof => return Err(ParseError::Unclosed(WRAPPER_TAG.to_owned())),
                _ => {}
            }
            buf.clear();
        }

        let mut root = TreeNode::with_kind(NodeKind::Root);
        self.parse_children(&mut reader, &mut root, WRAPPER_TAG, keep_comments)?;

        // A wrapper end tag written in the input closes the wrapper early.
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Eof => Ok(root),
            _ => Err(ParseError::UnexpectedEnd(WRAPPER_TAG.to_owned())),
        }
    }

    fn parse_children<R: BufRead>(
        &self,
        reader: &mut Reader<R>,
        node: &mut TreeNode,
        open_tag: &str,
        keep_comments: bool,
    ) -> Result<(), ParseError> {
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let tag = self.decode_tag(reader, &e);
                    let attrs = self.decode_attrs(reader, &e)?;
                    let mut child = TreeNode::with_kind(NodeKind::Element {
                        tag: tag.clone(),
                        attrs,
                    });
                    if !is_void_element(&tag) {
                        self.parse_children(reader, &mut child, &tag, keep_comments)?;
                    }
                    node.children.push(child);
                }
                Event::Empty(e) => {
                    let child = TreeNode::with_kind(NodeKind::Element {
                        tag: self.decode_tag(reader, &e),
                        attrs: self.decode_attrs(reader, &e)?,
                    });
                    node.children.push(child);
                }
                Event::Text(e) => {
                    let text = reader.decoder().decode(&e)?;
                    append_text(node, &text);
                }
                Event::GeneralRef(e) => {
                    let entity = reader.decoder().decode(&e)?;
                    append_text(node, &decode_reference(&entity));
                }
                Event::CData(e) => {
                    append_text(node, &String::from_utf8_lossy(&e));
                }
                Event::Comment(e) => {
                    if keep_comments {
                        let text = reader.decoder().decode(&e)?.into_owned();
                        node.children
                            .push(TreeNode::with_kind(NodeKind::Comment).with_text(text));
                    }
                }
                Event::End(e) => {
                    let end_tag = self.decode_tag_from_bytes(reader, e.name().as_ref());
                    if end_tag.eq_ignore_ascii_case(open_tag) {
                        return Ok(());
                    }
                    if end_tag.eq_ignore_ascii_case(WRAPPER_TAG) {
                        return Err(ParseError::Unclosed(open_tag.to_owned()));
                    }
                    // Stray end tags of void elements carry no structure.
                    if !is_void_element(&end_tag) {
                        if open_tag == WRAPPER_TAG {
                            return Err(ParseError::UnexpectedEnd(end_tag));
                        }
                        return Err(ParseError::MismatchedEnd {
                            expected: open_tag.to_owned(),
                            found: end_tag,
                        });
                    }
                }
                Event::Eof => return Err(ParseError::Unclosed(open_tag.to_owned())),
                Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            }
            buf.clear();
        }
    }

    fn decode_tag<R: BufRead>(&self, reader: &Reader<R>, e: &BytesStart) -> String {
        self.decode_tag_from_bytes(reader, e.name().as_ref())
    }

    fn decode_tag_from_bytes<R: BufRead>(&self, reader: &Reader<R>, name: &[u8]) -> String {
        reader.decoder().decode(name).map_or_else(
            |_| String::from_utf8_lossy(name).into_owned(),
            std::borrow::Cow::into_owned,
        )
    }

    fn decode_attrs<R: BufRead>(
        &self,
        reader: &Reader<R>,
        e: &BytesStart,
    ) -> Result<Vec<(String, String)>, ParseError> {
        let mut attrs = Vec::new();
        for attr in e.html_attributes() {
            let attr = attr?;
            let key = reader.decoder().decode(attr.key.as_ref()).map_or_else(
                |_| String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                std::borrow::Cow::into_owned,
            );
            let value = attr.unescape_value().map_or_else(
                |_| String::from_utf8_lossy(&attr.value).into_owned(),
                std::borrow::Cow::into_owned,
            );
            attrs.push((key, value));
        }
        Ok(attrs)
    }
}

impl Default for MarkupParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Append text to the node's text, or to its last child's tail.
fn append_text(node: &mut TreeNode, text: &str) {
    if let Some(last_child) = node.children.last_mut() {
        last_child.tail.push_str(text);
    } else {
        node.text.push_str(text);
    }
}
