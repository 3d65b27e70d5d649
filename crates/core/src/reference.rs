//! Classification and rewriting of local references.
//!
//! A reference is local when it points into the file system next to the
//! document: no URL scheme, no protocol-relative `//host`, and not a bare
//! `#fragment` or `?query`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// Asset-bearing tags; group 1 is the tag name, group 2 the attribute text.
static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<\s*(a|area|audio|iframe|img|embed|link|script|source|track|video)\s+([^>]+)>")
        .expect("valid tag regex")
});

/// First `href`/`src` attribute; groups 2..=4 hold the double-quoted,
/// single-quoted and bare value.
static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:^|\s)(href|src)(?:\s*=\s*(?:"([^"]*)"+|'([^']*)'+|([^\s"'=<>`]+)))?"#)
        .expect("valid attribute regex")
});

static SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^([a-z][a-z0-9+.-]*:|//)").expect("valid scheme regex"));

static LOCAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^((\.|\.\.)?/)?[^/]+").expect("valid local regex"));

static ANCHOR_OR_QUERY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[?#].+").expect("valid anchor regex"));

/// Returns true when `href` names a file relative to the document or the file system root.
pub fn is_local_dependency(href: &str) -> bool {
    !SCHEME_RE.is_match(href) && LOCAL_RE.is_match(href) && !ANCHOR_OR_QUERY_RE.is_match(href)
}

/// Cuts the `?query` and `#fragment` suffixes, whichever comes first.
///
/// ```
/// use sitcom_core::reference::remove_search_and_anchor;
///
/// assert_eq!(remove_search_and_anchor("path/to?search#hash"), "path/to");
/// assert_eq!(remove_search_and_anchor("path/to#hash?search"), "path/to");
/// ```
pub fn remove_search_and_anchor(href: &str) -> &str {
    match href.find(['?', '#']) {
        Some(end) => &href[..end],
        None => href,
    }
}

/// Returns the registry key for `href`, or `None` when it is not a local file reference.
pub fn local_target(href: &str) -> Option<&str> {
    if !is_local_dependency(href) {
        return None;
    }
    let target = remove_search_and_anchor(href).trim();
    (!target.is_empty()).then_some(target)
}

/// Rewrites the first `href`/`src` value of every asset-bearing tag in `html`.
///
/// Only local values reach `handle`; it receives the value without query or
/// fragment and returns the replacement. Everything else in the tag,
/// including the quote style, is kept as written.
pub fn replace_local_dependency<E, F>(html: &str, mut handle: F) -> Result<String, E>
where
    F: FnMut(&str) -> Result<String, E>,
{
    let mut out = String::with_capacity(html.len());
    let mut last = 0;

    for caps in TAG_RE.captures_iter(html) {
        let Some(attrs) = caps.get(2) else {
            continue;
        };
        let Some(range) = attribute_value(attrs.as_str()) else {
            continue;
        };
        let value = &attrs.as_str()[range.clone()];
        let Some(target) = local_target(value) else {
            continue;
        };

        let replacement = handle(target)?;
        out.push_str(&html[last..attrs.start() + range.start]);
        out.push_str(&replacement);
        last = attrs.start() + range.end;
    }

    out.push_str(&html[last..]);
    Ok(out)
}

/// Byte range of the first `href`/`src` value in `attrs`, surrounding blanks excluded.
fn attribute_value(attrs: &str) -> Option<Range<usize>> {
    let caps = ATTR_RE.captures(attrs)?;
    let value = caps.get(2).or_else(|| caps.get(3)).or_else(|| caps.get(4))?;
    let raw = value.as_str();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let start = value.start() + (raw.len() - raw.trim_start().len());
    Some(start..start + trimmed.len())
}
