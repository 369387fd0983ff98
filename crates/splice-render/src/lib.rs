//! Rendering passes that replace formula markers in a markup tree.
//!
//! - [`MathPass`] renders `\[...\]` and `\(...\)` through a [`MathRenderer`].
//! - [`TexPass`] renders `[tex]...[/tex]` through a [`TexRenderer`] when
//!   `[tex] enabled = true` is set.
//!
//! Renderers are collaborators supplied by the caller. A renderer failure only
//! affects its own match, which stays in the document as written.
//!
//! # Example
//!
//! ```
//! use splice_config::Config;
//! use splice_render::{MathPass, MathRenderer, RenderError};
//! use splice_tree::{MarkupParser, serialize_document};
//!
//! struct Echo;
//!
//! impl MathRenderer for Echo {
//!     fn display_math(&self, source: &str) -> Result<String, RenderError> {
//!         Ok(format!("<div>{source}</div>"))
//!     }
//!
//!     fn inline_math(&self, source: &str) -> Result<String, RenderError> {
//!         Ok(format!("<span>{source}</span>"))
//!     }
//! }
//!
//! let mut tree = MarkupParser::new().parse_document(r"<p>\(x\)</p>").unwrap();
//! MathPass::new(Echo, &Config::default()).run(&mut tree);
//! assert_eq!(serialize_document(&tree), "<p><span>x</span></p>");
//! ```

mod error;
mod math;
mod prefetch;
mod tex;

pub use error::RenderError;
pub use math::{MathPass, MathRenderer, MathSource};
pub use tex::{TexPass, TexRenderer, TexResponse, content_hash};

use splice_config::Config;
use splice_core::OpaqueTags;

/// Opaque tag set for a config, falling back to the built-in list.
#[must_use]
pub fn opaque_tags(config: &Config) -> OpaqueTags {
    config
        .markup
        .opaque_tags
        .as_ref()
        .map_or_else(OpaqueTags::default, OpaqueTags::new)
}
