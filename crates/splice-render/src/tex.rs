//! `[tex]...[/tex]` block rendering.
//!
//! Each block's source is hashed and sent to a [`TexRenderer`]. A successful
//! response yields either vector markup or an image URL; anything else keeps
//! the original block, delimiters included.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use splice_config::Config;
use splice_core::{OpaqueTags, PassReport, replace_in_tree};
use splice_tree::{Tree, escape_attr};

use crate::error::RenderError;
use crate::prefetch::{collect_unique, render_all};

/// Non-greedy block that may span lines.
static TEX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[tex\](.*?)\[/tex\]").expect("invalid tex regex"));

/// Cache key for a tex source: hex SHA-1 of its UTF-8 bytes.
#[must_use]
pub fn content_hash(source: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(source.as_bytes());
    hex::encode(hasher.finalize())
}

/// Renderer reply for one tex source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TexResponse {
    /// Whether rendering succeeded.
    pub success: bool,
    /// Inline SVG markup.
    pub svg: Option<String>,
    /// URL of a raster image.
    pub png: Option<String>,
    /// Renderer error message for unsuccessful replies.
    pub error: Option<String>,
}

impl TexResponse {
    /// Decode a JSON payload.
    pub fn from_json(payload: &[u8]) -> Result<Self, RenderError> {
        Ok(serde_json::from_slice(payload)?)
    }

    /// Markup to splice in for `source`, if the reply has usable output.
    ///
    /// SVG wins over the image URL. The image gets the source as its `alt` text.
    #[must_use]
    pub fn to_markup(&self, source: &str) -> Option<String> {
        if !self.success {
            return None;
        }
        if let Some(svg) = &self.svg {
            return Some(svg.clone());
        }
        self.png.as_ref().map(|url| {
            format!(
                r#"<img src="{}" alt="{}">"#,
                escape_attr(url),
                escape_attr(source)
            )
        })
    }
}

/// Tex rendering collaborator.
pub trait TexRenderer {
    /// Render `source`; `hash` is its [`content_hash`] for caching.
    fn query(&self, source: &str, hash: &str) -> Result<TexResponse, RenderError>;
}

/// Replaces `[tex]` blocks with rendered output when enabled.
pub struct TexPass<R> {
    renderer: R,
    enabled: bool,
    opaque: OpaqueTags,
}

impl<R: TexRenderer> TexPass<R> {
    /// Create a pass. Enablement and opaque tags come from `config`.
    pub fn new(renderer: R, config: &Config) -> Self {
        Self {
            renderer,
            enabled: config.tex.enabled,
            opaque: crate::opaque_tags(config),
        }
    }

    /// Whether the pass does anything.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The wrapped renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Render blocks one at a time while walking the tree.
    ///
    /// A disabled pass returns an empty report without scanning.
    pub fn run(&self, tree: &mut Tree) -> PassReport {
        if !self.enabled {
            tracing::debug!("Tex rendering disabled, skipping pass");
            return PassReport::default();
        }
        let report = replace_in_tree(tree, &TEX_PATTERN, &self.opaque, |caps| {
            tex_source(caps).and_then(|source| self.render(&source))
        });
        tracing::info!(
            matches = report.matches,
            replaced = report.replaced,
            "Tex pass finished"
        );
        report
    }

    fn render(&self, source: &str) -> Option<String> {
        let hash = content_hash(source);
        match self.renderer.query(source, &hash) {
            Ok(response) => {
                let markup = response.to_markup(source);
                if markup.is_none() {
                    tracing::warn!(
                        %hash,
                        error = response.error.as_deref().unwrap_or("no output"),
                        "Tex renderer returned no usable output, keeping source text"
                    );
                }
                markup
            }
            Err(e) => {
                tracing::warn!(%hash, error = %e, "Tex render failed, keeping source text");
                None
            }
        }
    }
}

impl<R: TexRenderer + Sync> TexPass<R> {
    /// Render all distinct blocks concurrently, then splice.
    ///
    /// Produces the same tree as [`run`](Self::run).
    pub fn run_parallel(&self, tree: &mut Tree) -> PassReport {
        if !self.enabled {
            tracing::debug!("Tex rendering disabled, skipping pass");
            return PassReport::default();
        }
        let sources = collect_unique(tree, &TEX_PATTERN, &self.opaque, tex_source);
        tracing::debug!(count = sources.len(), "Rendering tex blocks in parallel");
        let rendered = render_all(sources, |source| self.render(source));

        let report = replace_in_tree(tree, &TEX_PATTERN, &self.opaque, |caps| {
            tex_source(caps).and_then(|source| rendered.get(&source).cloned().flatten())
        });
        tracing::info!(
            matches = report.matches,
            replaced = report.replaced,
            "Tex pass finished"
        );
        report
    }
}

fn tex_source(caps: &Captures<'_>) -> Option<String> {
    caps.get(1).map(|source| source.as_str().to_owned())
}
