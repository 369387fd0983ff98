//! Pattern matching and replacement into segment sequences.

use regex::{Captures, Regex};
use splice_tree::MarkupParser;

use crate::segment::Segment;

/// Summary of a replacement pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Pattern matches found.
    pub matches: usize,
    /// Matches replaced by parsed markup.
    pub replaced: usize,
    /// Recovered failures, one line each.
    pub diagnostics: Vec<String>,
}

/// Turns text blocks into [`Segment`] sequences.
///
/// The callback maps a match to replacement markup, or `None` to keep the
/// matched text. Markup that fails to parse is also kept as the original text
/// and recorded in the [`PassReport`].
pub struct ContentReplacer<'p, F> {
    pattern: &'p Regex,
    callback: F,
    parser: MarkupParser,
    report: PassReport,
}

impl<'p, F> ContentReplacer<'p, F>
where
    F: FnMut(&Captures<'_>) -> Option<String>,
{
    /// Create a replacer for `pattern`.
    pub fn new(pattern: &'p Regex, callback: F) -> Self {
        Self {
            pattern,
            callback,
            parser: MarkupParser::new(),
            report: PassReport::default(),
        }
    }

    /// Split `text` around every match of the pattern.
    ///
    /// Returns `None` when `text` is empty or nothing matches. Otherwise the
    /// result is `[before-1, replacement-1, before-2, replacement-2, ..., rest]`
    /// with empty text pieces omitted. Adjacent text segments are not merged.
    pub fn process(&mut self, text: &str) -> Option<Vec<Segment>> {
        if text.is_empty() {
            return None;
        }

        let mut segments = Vec::new();
        let mut last = 0;
        let mut matched = false;
        let pattern = self.pattern;

        for caps in pattern.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            matched = true;
            if whole.start() > last {
                segments.push(Segment::text(&text[last..whole.start()]));
            }
            segments.push(self.replacement(&caps, whole.as_str()));
            last = whole.end();
        }

        if !matched {
            return None;
        }
        if last < text.len() {
            segments.push(Segment::text(&text[last..]));
        }
        Some(segments)
    }

    fn replacement(&mut self, caps: &Captures<'_>, source: &str) -> Segment {
        self.report.matches += 1;

        let Some(markup) = (self.callback)(caps) else {
            return Segment::text(source);
        };

        match self.parser.parse_fragment(&markup) {
            Ok(fragment) => {
                self.report.replaced += 1;
                Segment::Fragment(fragment)
            }
            Err(e) => {
                tracing::warn!(error = %e, %markup, "Failed to parse replacement, keeping source text");
                self.report
                    .diagnostics
                    .push(format!("failed to parse replacement for {source:?}: {e}"));
                Segment::text(source)
            }
        }
    }

    /// Report accumulated over all processed blocks.
    #[must_use]
    pub fn report(&self) -> &PassReport {
        &self.report
    }

    /// Consume the replacer and return its report.
    #[must_use]
    pub fn into_report(self) -> PassReport {
        self.report
    }
}
