//! Mutable markup tree with the text/tail model.
//!
//! This crate provides the document representation the splice passes operate on:
//! - [`Tree`]: arena of [`Node`]s addressed by [`NodeId`], with parent links
//! - [`TreeNode`]: owned subtree, the shape parsed fragments take before grafting
//! - [`MarkupParser`]: `quick-xml` based parser for documents and fragments
//! - [`serialize_document`] / [`serialize_node`]: HTML serializer
//!
//! # Example
//!
//! ```
//! use splice_tree::{MarkupParser, serialize_document};
//!
//! let html = "<p>Hello <b>world</b>!</p>";
//! let tree = MarkupParser::new().parse_document(html).unwrap();
//! assert_eq!(serialize_document(&tree), html);
//! ```

mod entities;
mod error;
mod parser;
mod serializer;
mod tree;

pub use entities::convert_html_entities;
pub use error::ParseError;
pub use parser::{Fragment, MarkupParser, is_void_element};
pub use serializer::{escape_attr, escape_text, serialize_document, serialize_node};
pub use tree::{Node, NodeId, NodeKind, Tree, TreeNode};
