//! Error types for markup parsing.

use std::str::Utf8Error;

/// Markup could not be turned into a tree or fragment.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Input contained no markup at all.
    #[error("empty markup")]
    Empty,

    /// Input ended while an element was still open.
    #[error("unclosed element <{0}>")]
    Unclosed(String),

    /// End tag does not match the innermost open element.
    #[error("mismatched end tag: expected </{expected}>, found </{found}>")]
    MismatchedEnd {
        /// Innermost open element.
        expected: String,
        /// End tag actually found.
        found: String,
    },

    /// End tag with no open element to close.
    #[error("unexpected end tag </{0}>")]
    UnexpectedEnd(String),

    /// XML reader error.
    #[error("XML parse error")]
    Xml(#[from] quick_xml::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error")]
    Utf8(#[from] Utf8Error),

    /// Malformed attribute.
    #[error("XML attribute error")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    /// Encoding error while decoding names or text.
    #[error("encoding error")]
    Encoding(#[from] quick_xml::encoding::EncodingError),
}
