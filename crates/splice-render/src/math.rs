//! Math delimiter rendering.
//!
//! `\[...\]` is display math and `\(...\)` is inline math. Each formula is sent
//! to a [`MathRenderer`] and the returned markup replaces the delimited text.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use splice_config::Config;
use splice_core::{OpaqueTags, PassReport, replace_in_tree};
use splice_tree::Tree;

use crate::error::RenderError;
use crate::prefetch::{collect_unique, render_all};

/// Display (`\[...\]`) or inline (`\(...\)`) delimiters. Formulas do not span lines.
static MATH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\\[(.*?)\\\]|\\\((.*?)\\\)").expect("invalid math regex")
});

/// Formula source with its display mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MathSource {
    /// Block formula from `\[...\]`.
    Display(String),
    /// Inline formula from `\(...\)`.
    Inline(String),
}

impl MathSource {
    /// Extract the formula from a math pattern match.
    #[must_use]
    pub fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        if let Some(display) = caps.get(1) {
            return Some(Self::Display(display.as_str().to_owned()));
        }
        caps.get(2)
            .map(|inline| Self::Inline(inline.as_str().to_owned()))
    }

    /// Formula text without delimiters.
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::Display(source) | Self::Inline(source) => source,
        }
    }
}

/// Math rendering collaborator.
pub trait MathRenderer {
    /// Render a display formula to markup.
    fn display_math(&self, source: &str) -> Result<String, RenderError>;

    /// Render an inline formula to markup.
    fn inline_math(&self, source: &str) -> Result<String, RenderError>;
}

/// Replaces math delimiters with rendered markup.
pub struct MathPass<R> {
    renderer: R,
    opaque: OpaqueTags,
}

impl<R: MathRenderer> MathPass<R> {
    /// Create a pass using the opaque tags from `config`.
    pub fn new(renderer: R, config: &Config) -> Self {
        Self {
            renderer,
            opaque: crate::opaque_tags(config),
        }
    }

    /// The wrapped renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Render formulas one at a time while walking the tree.
    pub fn run(&self, tree: &mut Tree) -> PassReport {
        let report = replace_in_tree(tree, &MATH_PATTERN, &self.opaque, |caps| {
            MathSource::from_captures(caps).and_then(|source| self.render(&source))
        });
        tracing::info!(
            matches = report.matches,
            replaced = report.replaced,
            "Math pass finished"
        );
        report
    }

    fn render(&self, source: &MathSource) -> Option<String> {
        let result = match source {
            MathSource::Display(formula) => self.renderer.display_math(formula),
            MathSource::Inline(formula) => self.renderer.inline_math(formula),
        };
        match result {
            Ok(markup) => Some(markup),
            Err(e) => {
                tracing::warn!(error = %e, source = source.source(), "Math render failed, keeping source text");
                None
            }
        }
    }
}

impl<R: MathRenderer + Sync> MathPass<R> {
    /// Render all distinct formulas concurrently, then splice.
    ///
    /// Produces the same tree as [`run`](Self::run); each distinct formula is
    /// rendered once.
    pub fn run_parallel(&self, tree: &mut Tree) -> PassReport {
        let sources = collect_unique(tree, &MATH_PATTERN, &self.opaque, MathSource::from_captures);
        tracing::debug!(count = sources.len(), "Rendering formulas in parallel");
        let rendered = render_all(sources, |source| self.render(source));

        let report = replace_in_tree(tree, &MATH_PATTERN, &self.opaque, |caps| {
            MathSource::from_captures(caps).and_then(|source| rendered.get(&source).cloned().flatten())
        });
        tracing::info!(
            matches = report.matches,
            replaced = report.replaced,
            "Math pass finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use splice_tree::{MarkupParser, serialize_document};
    use std::sync::Mutex;

    /// Renderer that tags output by mode and records every call.
    #[derive(Default)]
    struct FakeMath {
        calls: Mutex<Vec<String>>,
    }

    impl MathRenderer for FakeMath {
        fn display_math(&self, source: &str) -> Result<String, RenderError> {
            self.calls.lock().unwrap().push(format!("display:{source}"));
            Ok("<b>RENDERED</b>".to_owned())
        }

        fn inline_math(&self, source: &str) -> Result<String, RenderError> {
            self.calls.lock().unwrap().push(format!("inline:{source}"));
            if source == "fail" {
                return Err(RenderError::Unavailable("timeout".to_owned()));
            }
            Ok("<i>RENDERED</i>".to_owned())
        }
    }

    fn parse(html: &str) -> Tree {
        MarkupParser::new().parse_document(html).unwrap()
    }

    #[test]
    fn test_inline_and_display() {
        let mut tree = parse(r"<p>a \(x+1\) b \[y=2\]</p>");
        let pass = MathPass::new(FakeMath::default(), &Config::default());

        let report = pass.run(&mut tree);

        assert_eq!(
            serialize_document(&tree),
            "<p>a <i>RENDERED</i> b <b>RENDERED</b></p>"
        );
        assert_eq!(report.replaced, 2);
        assert_eq!(
            *pass.renderer().calls.lock().unwrap(),
            vec!["inline:x+1", "display:y=2"]
        );
    }

    #[test]
    fn test_renderer_failure_keeps_source() {
        let html = r"<p>ok \(a\) bad \(fail\)</p>";
        let mut tree = parse(html);
        let pass = MathPass::new(FakeMath::default(), &Config::default());

        let report = pass.run(&mut tree);

        assert_eq!(
            serialize_document(&tree),
            r"<p>ok <i>RENDERED</i> bad \(fail\)</p>"
        );
        assert_eq!(report.matches, 2);
        assert_eq!(report.replaced, 1);
    }

    #[test]
    fn test_formula_does_not_span_lines() {
        let html = "<p>\\(a\nb\\)</p>";
        let mut tree = parse(html);
        let pass = MathPass::new(FakeMath::default(), &Config::default());

        let report = pass.run(&mut tree);

        assert_eq!(report.matches, 0);
        assert_eq!(serialize_document(&tree), html);
    }

    #[test]
    fn test_opaque_tags_from_config() {
        let config = Config::from_toml("[markup]\nopaque_tags = [\"span\"]").unwrap();
        let mut tree = parse(r"<span>\(a\)</span><code>\(b\)</code>");
        let pass = MathPass::new(FakeMath::default(), &config);

        pass.run(&mut tree);

        assert_eq!(
            serialize_document(&tree),
            r"<span>\(a\)</span><code><i>RENDERED</i></code>"
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let html = r"<div><p>\(a\) and \[b\]</p><em>x</em>\(a\) \(fail\)<pre>\(c\)</pre></div>";
        let mut sequential = parse(html);
        let mut parallel = parse(html);

        let seq_report = MathPass::new(FakeMath::default(), &Config::default()).run(&mut sequential);
        let pass = MathPass::new(FakeMath::default(), &Config::default());
        let par_report = pass.run_parallel(&mut parallel);

        assert_eq!(serialize_document(&parallel), serialize_document(&sequential));
        assert_eq!(par_report, seq_report);
        // \(a\) appears twice but is rendered once.
        let mut calls = pass.renderer().calls.lock().unwrap().clone();
        calls.sort();
        assert_eq!(calls, vec!["display:b", "inline:a", "inline:fail"]);
    }

    #[test]
    fn test_from_captures() {
        let caps = MATH_PATTERN.captures(r"\[x\]").unwrap();
        assert_eq!(
            MathSource::from_captures(&caps),
            Some(MathSource::Display("x".to_owned()))
        );
        let caps = MATH_PATTERN.captures(r"\(y\)").unwrap();
        let source = MathSource::from_captures(&caps).unwrap();
        assert_eq!(source, MathSource::Inline("y".to_owned()));
        assert_eq!(source.source(), "y");
    }
}
