//! Whole-tree replacement pass.
//!
//! Scan targets are collected before anything is spliced, so nodes inserted by
//! a replacement are never scanned again in the same pass. Opaque nodes are
//! skipped together with their subtree, but their tail still belongs to the
//! parent and is scanned.

use regex::{Captures, Regex};
use splice_tree::{NodeId, Tree};

use crate::matcher::{ContentReplacer, PassReport};
use crate::opaque::OpaqueTags;
use crate::splicer::{splice_tail, splice_text};

/// Which slots of a node a pass looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScanTarget {
    node: NodeId,
    text: bool,
    tail: bool,
}

/// Replace every match of `pattern` in `tree` with markup from `callback`.
///
/// For each eligible node in document order the node's text is processed and
/// spliced first, then its tail. The callback returns `None` to keep a match
/// as-is.
pub fn replace_in_tree<F>(
    tree: &mut Tree,
    pattern: &Regex,
    opaque: &OpaqueTags,
    callback: F,
) -> PassReport
where
    F: FnMut(&Captures<'_>) -> Option<String>,
{
    let targets = scan_targets(tree, opaque);
    let mut replacer = ContentReplacer::new(pattern, callback);

    for target in targets {
        if target.text
            && let Some(segments) = replacer.process(tree.text(target.node))
        {
            splice_text(tree, target.node, segments);
        }
        if target.tail
            && let Some(segments) = replacer.process(tree.tail(target.node))
        {
            splice_tail(tree, target.node, segments);
        }
    }

    let report = replacer.into_report();
    tracing::debug!(
        pattern = pattern.as_str(),
        matches = report.matches,
        replaced = report.replaced,
        "Replacement pass finished"
    );
    report
}

/// Visit every match `replace_in_tree` would see, without touching the tree.
pub fn scan_tree<F>(tree: &Tree, pattern: &Regex, opaque: &OpaqueTags, mut visit: F)
where
    F: FnMut(&Captures<'_>),
{
    for target in scan_targets(tree, opaque) {
        if target.text {
            pattern
                .captures_iter(tree.text(target.node))
                .for_each(|caps| visit(&caps));
        }
        if target.tail {
            pattern
                .captures_iter(tree.tail(target.node))
                .for_each(|caps| visit(&caps));
        }
    }
}

fn scan_targets(tree: &Tree, opaque: &OpaqueTags) -> Vec<ScanTarget> {
    let mut targets = Vec::new();
    collect_targets(tree, tree.root(), opaque, &mut targets);
    targets
}

fn collect_targets(tree: &Tree, id: NodeId, opaque: &OpaqueTags, out: &mut Vec<ScanTarget>) {
    let node = tree.node(id);
    let is_opaque = opaque.is_opaque(&node.kind);

    out.push(ScanTarget {
        node: id,
        text: !is_opaque,
        tail: node.parent().is_some(),
    });

    if !is_opaque {
        for &child in node.children() {
            collect_targets(tree, child, opaque, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use splice_tree::{MarkupParser, serialize_document};

    const MATH: &str = r"\\\[(.*?)\\\]|\\\((.*?)\\\)";

    fn parse(html: &str) -> Tree {
        MarkupParser::new().parse_document(html).unwrap()
    }

    fn math() -> Regex {
        Regex::new(MATH).unwrap()
    }

    /// Bold for display math, italic for inline math.
    fn render() -> impl FnMut(&Captures<'_>) -> Option<String> {
        |caps| {
            let markup = if caps.get(1).is_some() {
                "<b>RENDERED</b>"
            } else {
                "<i>RENDERED</i>"
            };
            Some(markup.to_owned())
        }
    }

    #[test]
    fn test_inline_and_display_math() {
        let mut tree = parse(r"<p>a \(x+1\) b \[y=2\]</p>");
        let p = tree.children(tree.root())[0];

        let report = replace_in_tree(&mut tree, &math(), &OpaqueTags::default(), render());

        assert_eq!(tree.text(p), "a ");
        let children = tree.children(p).to_vec();
        assert_eq!(children.len(), 2);
        assert_eq!(tree.tag(children[0]), Some("i"));
        assert_eq!(tree.tail(children[0]), " b ");
        assert_eq!(tree.tag(children[1]), Some("b"));
        assert_eq!(tree.tail(children[1]), "");
        assert_eq!(report.matches, 2);
        assert_eq!(report.replaced, 2);
    }

    #[test]
    fn test_tail_replacement_before_next_sibling() {
        let mut tree = parse(r"<div><span>s</span>\(a\) tail<em>next</em></div>");

        replace_in_tree(&mut tree, &math(), &OpaqueTags::default(), render());

        let div = tree.children(tree.root())[0];
        let tags: Vec<_> = tree
            .children(div)
            .iter()
            .map(|&id| tree.tag(id).unwrap_or_default())
            .collect();
        assert_eq!(tags, vec!["span", "i", "em"]);
        let inserted = tree.children(div)[1];
        assert_eq!(tree.tail(inserted), " tail");
        assert_eq!(
            serialize_document(&tree),
            "<div><span>s</span><i>RENDERED</i> tail<em>next</em></div>"
        );
    }

    #[test]
    fn test_no_match_is_byte_identical() {
        let html = r#"<div class="x"><p>plain <b>text</b> here</p><!-- \(not\) --></div>tail"#;
        let mut tree = parse(html);

        let report = replace_in_tree(&mut tree, &math(), &OpaqueTags::default(), render());

        assert_eq!(report, PassReport::default());
        assert_eq!(serialize_document(&tree), html);
    }

    #[test]
    fn test_opaque_nodes_are_skipped_but_tail_is_scanned() {
        let mut tree = parse(r"<p><code>\(a\) <b>\(b\)</b></code>\(c\)</p><pre>\(d\)</pre>");

        replace_in_tree(&mut tree, &math(), &OpaqueTags::default(), render());

        assert_eq!(
            serialize_document(&tree),
            r"<p><code>\(a\) <b>\(b\)</b></code><i>RENDERED</i></p><pre>\(d\)</pre>"
        );
    }

    #[test]
    fn test_custom_opaque_set() {
        let mut tree = parse(r"<p>\(a\)</p><code>\(b\)</code>");

        replace_in_tree(&mut tree, &math(), &OpaqueTags::new(["p"]), render());

        assert_eq!(
            serialize_document(&tree),
            r"<p>\(a\)</p><code><i>RENDERED</i></code>"
        );
    }

    #[test]
    fn test_fail_open_when_callback_returns_none() {
        let html = r"<p>a \(x\) b <em>\[y\]</em> \(z\)</p>";
        let mut tree = parse(html);

        let report = replace_in_tree(&mut tree, &math(), &OpaqueTags::default(), |_| None);

        assert_eq!(report.matches, 3);
        assert_eq!(report.replaced, 0);
        assert_eq!(serialize_document(&tree), html);
    }

    #[test]
    fn test_unparseable_replacement_falls_back() {
        let html = r"<p>see \(x\) here</p>";
        let mut tree = parse(html);

        let report = replace_in_tree(&mut tree, &math(), &OpaqueTags::default(), |_| {
            Some("<b><i>bad</b>".to_owned())
        });

        assert_eq!(serialize_document(&tree), html);
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn test_empty_replacement_keeps_match() {
        let html = r"<p>a \(x\) b</p>";
        let mut tree = parse(html);

        let report =
            replace_in_tree(&mut tree, &math(), &OpaqueTags::default(), |_| Some(String::new()));

        assert_eq!(serialize_document(&tree), html);
        assert_eq!(report.matches, 1);
        assert_eq!(report.replaced, 0);
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn test_order_preserved_for_many_matches() {
        let mut tree = parse(r"<p>\(1\) \(2\) \(3\) \(4\)</p>");
        let p = tree.children(tree.root())[0];

        replace_in_tree(&mut tree, &math(), &OpaqueTags::default(), |caps| {
            Some(format!("<i>{}</i>", &caps[2]))
        });

        let texts: Vec<_> = tree.children(p).iter().map(|&id| tree.text(id)).collect();
        assert_eq!(texts, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_inserted_nodes_not_rescanned() {
        let mut tree = parse(r"<p>\(x\)</p>");
        let mut calls = 0;

        replace_in_tree(&mut tree, &math(), &OpaqueTags::default(), |_| {
            calls += 1;
            Some(r"<i>\(again\)</i>".to_owned())
        });

        assert_eq!(calls, 1);
        assert_eq!(serialize_document(&tree), r"<p><i>\(again\)</i></p>");
    }

    #[test]
    fn test_root_text_scanned() {
        let mut tree = parse(r"\(x\) lead<p>p</p>");

        replace_in_tree(&mut tree, &math(), &OpaqueTags::default(), render());

        assert_eq!(serialize_document(&tree), "<i>RENDERED</i> lead<p>p</p>");
    }

    #[test]
    fn test_text_and_tail_of_same_node() {
        let mut tree = parse(r"<div><span>\(a\)</span>\[b\]</div>");

        replace_in_tree(&mut tree, &math(), &OpaqueTags::default(), render());

        assert_eq!(
            serialize_document(&tree),
            "<div><span><i>RENDERED</i></span><b>RENDERED</b></div>"
        );
    }

    #[test]
    fn test_scan_tree_matches_replace_targets() {
        let tree = parse(r"<p>\(a\)<code>\(b\)</code>\[c\]</p>");
        let mut seen = Vec::new();

        scan_tree(&tree, &math(), &OpaqueTags::default(), |caps| {
            seen.push(caps[0].to_owned());
        });

        assert_eq!(seen, vec![r"\(a\)", r"\[c\]"]);
    }
}
