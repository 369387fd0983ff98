//! Matcher output units.

use splice_tree::Fragment;

/// One piece of a rewritten text block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, either unmatched input or a match kept verbatim.
    Text(String),
    /// Parsed replacement markup.
    Fragment(Fragment),
}

impl Segment {
    /// Shorthand for a text segment.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}
