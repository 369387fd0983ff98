//! Verbatim content containers that are never scanned.

use std::collections::HashSet;

use splice_tree::NodeKind;

/// Tags whose content is shown verbatim and must not be rewritten.
pub const DEFAULT_OPAQUE_TAGS: &[&str] = &["script", "style", "pre", "code", "textarea"];

/// Set of element tags treated as opaque. Matching ignores ASCII case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueTags {
    tags: HashSet<String>,
}

impl OpaqueTags {
    /// Build a set from tag names.
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tags: tags
                .into_iter()
                .map(|tag| tag.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Check whether an element tag is in the set.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(&tag.to_ascii_lowercase())
    }

    /// Check whether a node's own content must be left alone.
    ///
    /// Comments are always opaque; the document root never is.
    #[must_use]
    pub fn is_opaque(&self, kind: &NodeKind) -> bool {
        match kind {
            NodeKind::Root => false,
            NodeKind::Comment => true,
            NodeKind::Element { tag, .. } => self.contains(tag),
        }
    }
}

impl Default for OpaqueTags {
    fn default() -> Self {
        Self::new(DEFAULT_OPAQUE_TAGS)
    }
}
