//! Inline selector micro-syntax for link and image titles.
//!
//! `[text](href "#id.class[name=value]")` turns the title into attributes
//! on the produced tag instead of a tooltip.

use crate::error::SelectorError;

/// Returns true when a title should be read as a selector.
pub fn is_selector(title: &str) -> bool {
    title.starts_with(['#', '.', '['])
}

/// Attributes parsed from a selector string.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectorAttrs {
    /// Value of the `#id` token.
    pub id: Option<String>,
    /// Classes in order of first appearance, without duplicates.
    pub classes: Vec<String>,
    /// Bracketed attributes; `None` marks a boolean attribute.
    pub attrs: Vec<(String, Option<String>)>,
}

impl SelectorAttrs {
    /// Parses `#id`, `.class` and `[name=value]` tokens in any order.
    ///
    /// Whitespace between tokens is ignored. A second id or any text that is
    /// not one of the three forms is an error.
    pub fn parse(selector: &str) -> Result<Self, SelectorError> {
        let mut parsed = Self::default();
        let mut rest = String::new();
        let mut cursor = selector;

        while let Some(ch) = cursor.chars().next() {
            match ch {
                '#' | '.' => {
                    let name_len = word_len(&cursor[1..]);
                    if name_len == 0 {
                        rest.push(ch);
                        cursor = &cursor[1..];
                        continue;
                    }
                    let name = &cursor[1..1 + name_len];
                    if ch == '#' {
                        parsed.set_id(selector, name)?;
                    } else if !parsed.classes.iter().any(|c| c == name) {
                        parsed.classes.push(name.to_string());
                    }
                    cursor = &cursor[1 + name_len..];
                }
                '[' => match cursor.find(']') {
                    Some(close) if parsed.push_attr(&cursor[1..close]) => {
                        cursor = &cursor[close + 1..];
                    }
                    _ => {
                        rest.push(ch);
                        cursor = &cursor[1..];
                    }
                },
                c if c.is_whitespace() => cursor = &cursor[c.len_utf8()..],
                c => {
                    rest.push(c);
                    cursor = &cursor[c.len_utf8()..];
                }
            }
        }

        if !rest.is_empty() {
            return Err(SelectorError::Unparsed {
                selector: selector.to_string(),
                rest,
            });
        }
        Ok(parsed)
    }

    fn set_id(&mut self, selector: &str, id: &str) -> Result<(), SelectorError> {
        if let Some(first) = &self.id {
            return Err(SelectorError::DuplicateId {
                selector: selector.to_string(),
                first: first.clone(),
                second: id.to_string(),
            });
        }
        self.id = Some(id.to_string());
        Ok(())
    }

    /// Records `name`, `name=value` or `name="value"`. Returns false for an empty name.
    fn push_attr(&mut self, body: &str) -> bool {
        let (name, value) = match body.split_once('=') {
            Some((name, value)) => (name.trim(), Some(unquote(value.trim()))),
            None => (body.trim(), None),
        };
        if name.is_empty() {
            return false;
        }
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
        true
    }

    /// Renders the attributes with a leading space, ready to splice after a tag name.
    pub fn to_attr_string(&self) -> String {
        let mut out = String::new();
        if let Some(id) = &self.id {
            out.push_str(&format!(" id=\"{id}\""));
        }
        if !self.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", self.classes.join(" ")));
        }
        for (name, value) in &self.attrs {
            match value {
                Some(value) => out.push_str(&format!(" {name}=\"{value}\"")),
                None => {
                    out.push(' ');
                    out.push_str(name);
                }
            }
        }
        out
    }
}

/// Parses `selector` and renders it as an attribute string.
///
/// ```
/// use sitcom_core::selector::selector_to_attrs;
///
/// assert_eq!(
///     selector_to_attrs("#a.b.c[x=1]").unwrap(),
///     r#" id="a" class="b c" x="1""#
/// );
/// ```
pub fn selector_to_attrs(selector: &str) -> Result<String, SelectorError> {
    SelectorAttrs::parse(selector).map(|attrs| attrs.to_attr_string())
}

fn word_len(s: &str) -> usize {
    s.bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_' || *b == b'-')
        .count()
}

/// Strips one pair of surrounding quotes and entity-escapes inner double quotes.
fn unquote(value: &str) -> String {
    let inner = match value.chars().next() {
        Some(q @ ('"' | '\'')) if value.len() >= 2 && value.ends_with(q) => {
            &value[1..value.len() - 1]
        }
        _ => value,
    };
    inner.replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_classes_and_attrs() {
        let attrs = selector_to_attrs("#a.b.c[x=1]").unwrap();
        assert_eq!(attrs.matches("id=\"a\"").count(), 1);
        assert!(attrs.contains("class=\"b c\""));
        assert!(attrs.contains("x=\"1\""));
    }

    #[test]
    fn order_does_not_matter() {
        assert_eq!(
            selector_to_attrs(".b [x=1] #a .c").unwrap(),
            r#" id="a" class="b c" x="1""#
        );
    }

    #[test]
    fn snapshot_of_mixed_selector() {
        let attrs = selector_to_attrs(".note.wide#intro[data-kind=tip][open]").unwrap();
        insta::assert_snapshot!(attrs.trim_start(), @r#"id="intro" class="note wide" data-kind="tip" open"#);
    }

    #[test]
    fn classes_are_deduplicated() {
        assert_eq!(selector_to_attrs(".a.b.a").unwrap(), r#" class="a b""#);
    }

    #[test]
    fn boolean_and_quoted_attributes() {
        assert_eq!(
            selector_to_attrs(r#"[hidden][title="say "hi""][alt='x']"#).unwrap(),
            r#" hidden title="say &quot;hi&quot;" alt="x""#
        );
    }

    #[test]
    fn bracket_values_keep_dots_and_hashes() {
        assert_eq!(
            selector_to_attrs("[data-src=a.png#frag]").unwrap(),
            r#" data-src="a.png#frag""#
        );
    }

    #[test]
    fn duplicate_id_is_an_error() {
        let err = selector_to_attrs("#a#b").unwrap_err();
        assert!(matches!(err, SelectorError::DuplicateId { ref first, ref second, .. }
            if first == "a" && second == "b"));
    }

    #[test]
    fn leftover_text_is_an_error() {
        let err = selector_to_attrs("bad text").unwrap_err();
        assert_eq!(
            err,
            SelectorError::Unparsed {
                selector: "bad text".into(),
                rest: "badtext".into()
            }
        );
        assert!(selector_to_attrs("#a [=1]").is_err());
        assert!(selector_to_attrs("#").is_err());
    }

    #[test]
    fn detects_selector_titles() {
        assert!(is_selector("#id"));
        assert!(is_selector(".cls"));
        assert!(is_selector("[x]"));
        assert!(!is_selector("A tooltip"));
    }
}
