//! Replace embedded markers in a markup tree with rendered markup.
//!
//! A pass has two stages:
//! - [`ContentReplacer`] splits a `text` or `tail` string around pattern
//!   matches, turning each match into a [`Segment`] (verbatim text or a parsed
//!   fragment).
//! - [`splice_text`] / [`splice_tail`] write a segment sequence back into the
//!   tree so that document order is preserved.
//!
//! [`replace_in_tree`] drives both stages over a whole tree, skipping
//! [`OpaqueTags`] content. Every failure is contained to the match that caused
//! it: the reader sees the original marker text instead of rendered output.
//!
//! # Example
//!
//! ```
//! use regex::Regex;
//! use splice_core::{OpaqueTags, replace_in_tree};
//! use splice_tree::{MarkupParser, serialize_document};
//!
//! let mut tree = MarkupParser::new().parse_document("<p>x [b]y[/b] z</p>").unwrap();
//! let pattern = Regex::new(r"\[b\](.*?)\[/b\]").unwrap();
//!
//! replace_in_tree(&mut tree, &pattern, &OpaqueTags::default(), |caps| {
//!     Some(format!("<strong>{}</strong>", &caps[1]))
//! });
//!
//! assert_eq!(serialize_document(&tree), "<p>x <strong>y</strong> z</p>");
//! ```

mod matcher;
mod opaque;
mod pass;
mod segment;
mod splicer;

pub use matcher::{ContentReplacer, PassReport};
pub use opaque::{DEFAULT_OPAQUE_TAGS, OpaqueTags};
pub use pass::{replace_in_tree, scan_tree};
pub use segment::Segment;
pub use splicer::{splice_tail, splice_text};
