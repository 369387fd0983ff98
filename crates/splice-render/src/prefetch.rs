//! Concurrent rendering ahead of splicing.
//!
//! Matches are collected from the untouched tree, rendered in parallel, and the
//! results are looked up while the tree is spliced sequentially.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use rayon::prelude::*;
use regex::{Captures, Regex};
use splice_core::{OpaqueTags, scan_tree};
use splice_tree::Tree;

/// Collect distinct render keys in document order.
pub(crate) fn collect_unique<K, F>(
    tree: &Tree,
    pattern: &Regex,
    opaque: &OpaqueTags,
    key: F,
) -> Vec<K>
where
    K: Eq + Hash + Clone,
    F: Fn(&Captures<'_>) -> Option<K>,
{
    let mut seen = HashSet::new();
    let mut keys = Vec::new();
    scan_tree(tree, pattern, opaque, |caps| {
        if let Some(k) = key(caps)
            && seen.insert(k.clone())
        {
            keys.push(k);
        }
    });
    keys
}

/// Render every key on the rayon pool.
pub(crate) fn render_all<K, F>(keys: Vec<K>, render: F) -> HashMap<K, Option<String>>
where
    K: Eq + Hash + Send,
    F: Fn(&K) -> Option<String> + Sync,
{
    keys.into_par_iter()
        .map(|key| {
            let markup = render(&key);
            (key, markup)
        })
        .collect()
}
