//! Named HTML entity conversion.
//!
//! Renderer output and documents are HTML, but the parser is XML-based and only
//! knows the five XML entities. Named HTML entities are rewritten to their
//! characters before parsing; `amp`, `lt`, `gt`, `quot` and `apos` are left for
//! the XML reader. A `&` that does not start a reference is escaped, as HTML
//! reads it literally.

use std::sync::LazyLock;

use regex::Regex;

/// Either a named entity, a numeric reference, or a bare ampersand.
static ENTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:([a-zA-Z][a-zA-Z0-9]*);|(#[0-9]+;|#[xX][0-9a-fA-F]+;))?")
        .expect("invalid entity regex")
});

/// HTML entities that commonly appear in rendered math and prose.
const NAMED_ENTITIES: &[(&str, char)] = &[
    ("nbsp", '\u{00a0}'),
    ("thinsp", '\u{2009}'),
    ("ensp", '\u{2002}'),
    ("emsp", '\u{2003}'),
    ("zwj", '\u{200d}'),
    ("zwnj", '\u{200c}'),
    ("mdash", '\u{2014}'),
    ("ndash", '\u{2013}'),
    ("minus", '\u{2212}'),
    ("hellip", '\u{2026}'),
    ("middot", '\u{00b7}'),
    ("bull", '\u{2022}'),
    ("lsquo", '\u{2018}'),
    ("rsquo", '\u{2019}'),
    ("ldquo", '\u{201c}'),
    ("rdquo", '\u{201d}'),
    ("laquo", '\u{00ab}'),
    ("raquo", '\u{00bb}'),
    ("times", '\u{00d7}'),
    ("divide", '\u{00f7}'),
    ("plusmn", '\u{00b1}'),
    ("le", '\u{2264}'),
    ("ge", '\u{2265}'),
    ("ne", '\u{2260}'),
    ("equiv", '\u{2261}'),
    ("asymp", '\u{2248}'),
    ("infin", '\u{221e}'),
    ("sum", '\u{2211}'),
    ("prod", '\u{220f}'),
    ("radic", '\u{221a}'),
    ("int", '\u{222b}'),
    ("part", '\u{2202}'),
    ("forall", '\u{2200}'),
    ("exist", '\u{2203}'),
    ("isin", '\u{2208}'),
    ("notin", '\u{2209}'),
    ("sub", '\u{2282}'),
    ("sup", '\u{2283}'),
    ("cap", '\u{2229}'),
    ("cup", '\u{222a}'),
    ("larr", '\u{2190}'),
    ("rarr", '\u{2192}'),
    ("uarr", '\u{2191}'),
    ("darr", '\u{2193}'),
    ("harr", '\u{2194}'),
    ("rArr", '\u{21d2}'),
    ("hArr", '\u{21d4}'),
    ("alpha", '\u{03b1}'),
    ("beta", '\u{03b2}'),
    ("gamma", '\u{03b3}'),
    ("delta", '\u{03b4}'),
    ("epsilon", '\u{03b5}'),
    ("lambda", '\u{03bb}'),
    ("mu", '\u{03bc}'),
    ("pi", '\u{03c0}'),
    ("sigma", '\u{03c3}'),
    ("theta", '\u{03b8}'),
    ("omega", '\u{03c9}'),
    ("Delta", '\u{0394}'),
    ("Sigma", '\u{03a3}'),
    ("Omega", '\u{03a9}'),
    ("deg", '\u{00b0}'),
    ("prime", '\u{2032}'),
    ("copy", '\u{00a9}'),
    ("reg", '\u{00ae}'),
    ("trade", '\u{2122}'),
    ("sect", '\u{00a7}'),
    ("para", '\u{00b6}'),
    ("frac12", '\u{00bd}'),
    ("frac14", '\u{00bc}'),
    ("frac34", '\u{00be}'),
    ("sup2", '\u{00b2}'),
    ("sup3", '\u{00b3}'),
    ("euro", '\u{20ac}'),
    ("pound", '\u{00a3}'),
];

/// Replace named HTML entities with their characters.
///
/// Unknown entities, numeric references and the XML built-ins are left
/// untouched. Bare `&` becomes `&amp;`.
pub fn convert_html_entities(html: &str) -> String {
    if !html.contains('&') {
        return html.to_owned();
    }
    ENTITY_PATTERN
        .replace_all(html, |caps: &regex::Captures| {
            if let Some(name) = caps.get(1) {
                lookup(name.as_str()).map_or_else(|| caps[0].to_owned(), String::from)
            } else if caps.get(2).is_some() {
                caps[0].to_owned()
            } else {
                "&amp;".to_owned()
            }
        })
        .into_owned()
}

fn lookup(name: &str) -> Option<char> {
    NAMED_ENTITIES
        .iter()
        .find(|(entity, _)| *entity == name)
        .map(|&(_, ch)| ch)
}

/// Decode an entity reference body (`lt`, `#x41`, `#65`) reported by the reader.
pub(crate) fn decode_reference(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            let code = if let Some(hex) = s.strip_prefix("#x").or_else(|| s.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), String::from)
        }
        _ => lookup(entity).map_or_else(|| format!("&{entity};"), String::from),
    }
}
