/// Extracts a `{#custom-id}` suffix from heading text.
///
/// The marker must close the text (trailing whitespace is ignored) and may hold
/// any characters except `}`. Returns the text before the marker with trailing
/// whitespace removed and the trimmed id. Otherwise returns the original text
/// and `None`.
///
/// # Examples
///
/// ```
/// use sitcom_core::anchor::extract_custom_id;
///
/// let (text, id) = extract_custom_id("My Heading {#my-heading}");
/// assert_eq!(text, "My Heading");
/// assert_eq!(id, Some("my-heading"));
///
/// let (text, id) = extract_custom_id("Plain heading");
/// assert_eq!(text, "Plain heading");
/// assert_eq!(id, None);
/// ```
pub fn extract_custom_id(text: &str) -> (&str, Option<&str>) {
    let trimmed = text.trim_end();
    if !trimmed.ends_with('}') {
        return (text, None);
    }

    if let Some(open) = trimmed.rfind("{#") {
        let inner = &trimmed[open + 2..trimmed.len() - 1];
        if !inner.is_empty() && !inner.contains('}') {
            let before = trimmed[..open].trim_end();
            return (before, Some(inner.trim()));
        }
    }

    (text, None)
}

/// Turns a raw id into an attribute-safe one.
///
/// Every run of characters outside `[A-Za-z0-9_]` becomes a single `-`.
/// Returns `None` when nothing but hyphens is left.
pub fn sanitize_id(raw: &str) -> Option<String> {
    let mut id = String::with_capacity(raw.len());
    let mut in_gap = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            id.push(ch);
            in_gap = false;
        } else if !in_gap {
            id.push('-');
            in_gap = true;
        }
    }

    if id.bytes().all(|b| b == b'-') {
        None
    } else {
        Some(id)
    }
}

/// Picks the id for a heading.
///
/// An explicit `{#id}` marker always wins. Without one, the id is derived from
/// `header_prefix` plus the heading text when `header_ids` is on.
pub fn heading_id(
    text: &str,
    custom: Option<&str>,
    header_ids: bool,
    header_prefix: &str,
) -> Option<String> {
    match custom {
        Some(id) => sanitize_id(id),
        None if header_ids => sanitize_id(&format!("{header_prefix}{text}")),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_custom_id_basic() {
        let (text, id) = extract_custom_id("My Heading {#my-heading}");
        assert_eq!(text, "My Heading");
        assert_eq!(id, Some("my-heading"));
    }

    #[test]
    fn extract_custom_id_with_trailing_space() {
        let (text, id) = extract_custom_id("Title {#custom}  ");
        assert_eq!(text, "Title");
        assert_eq!(id, Some("custom"));
    }

    #[test]
    fn extract_custom_id_keeps_spaces_inside_marker() {
        let (text, id) = extract_custom_id("Title {# two words }");
        assert_eq!(text, "Title");
        assert_eq!(id, Some("two words"));
    }

    #[test]
    fn extract_custom_id_empty_id() {
        let (text, id) = extract_custom_id("Title {#}");
        assert_eq!(text, "Title {#}");
        assert_eq!(id, None);
    }

    #[test]
    fn extract_custom_id_not_at_end() {
        let (text, id) = extract_custom_id("Title {#a} tail");
        assert_eq!(text, "Title {#a} tail");
        assert_eq!(id, None);
    }

    #[test]
    fn sanitize_collapses_runs() {
        assert_eq!(sanitize_id("two words").as_deref(), Some("two-words"));
        assert_eq!(sanitize_id("a -- b").as_deref(), Some("a-b"));
        assert_eq!(sanitize_id("Hello, World!").as_deref(), Some("Hello-World-"));
    }

    #[test]
    fn sanitize_rejects_only_hyphens() {
        assert_eq!(sanitize_id("---"), None);
        assert_eq!(sanitize_id("!?"), None);
        assert_eq!(sanitize_id(""), None);
    }

    #[test]
    fn heading_id_prefers_marker() {
        assert_eq!(
            heading_id("Title", Some("custom"), true, "doc-").as_deref(),
            Some("custom")
        );
        assert_eq!(
            heading_id("Title", None, true, "doc-").as_deref(),
            Some("doc-Title")
        );
        assert_eq!(heading_id("Title", None, false, ""), None);
    }
}
