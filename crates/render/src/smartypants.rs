//! Typographic punctuation for rendered HTML (curly quotes, dashes, ellipsis).

use std::iter::Peekable;
use std::str::Chars;

/// Elements whose content is left untouched.
const VERBATIM: [&str; 4] = ["code", "pre", "script", "style"];

/// Rewrites punctuation in the text parts of `html`.
///
/// Tags are copied as they are, so attribute values (and the asset tokens in
/// them) never change. Content of `code`, `pre`, `script` and `style` elements
/// is skipped.
pub fn smartypants(html: &str) -> String {
    if !html.contains(['"', '\'', '-']) && !html.contains("...") {
        return html.to_string();
    }

    let mut out = String::with_capacity(html.len());
    let mut chars = html.chars().peekable();
    let mut verbatim_depth = 0usize;

    while let Some(c) = chars.next() {
        if c == '<' {
            copy_tag(&mut chars, &mut out, &mut verbatim_depth);
        } else if verbatim_depth > 0 {
            out.push(c);
        } else {
            educate(c, &mut chars, &mut out);
        }
    }

    out
}

/// Copies one tag to `out` and tracks how deep we are inside verbatim elements.
fn copy_tag(chars: &mut Peekable<Chars<'_>>, out: &mut String, verbatim_depth: &mut usize) {
    let start = out.len();
    out.push('<');
    for n in chars.by_ref() {
        out.push(n);
        if n == '>' {
            break;
        }
    }

    let tag = out[start + 1..].to_ascii_lowercase();
    let (closing, name) = match tag.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, tag.as_str()),
    };
    let name = name
        .split(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .next()
        .unwrap_or_default();

    if VERBATIM.contains(&name) {
        if closing {
            *verbatim_depth = verbatim_depth.saturating_sub(1);
        } else {
            *verbatim_depth += 1;
        }
    }
}

fn opens_quote(before: &str) -> bool {
    before.is_empty()
        || before.ends_with(|c: char| c.is_whitespace() || "([{\"'>\u{201c}\u{2018}".contains(c))
}

/// Pushes the typographic form of `c`, consuming the rest of a `--`, `---` or `...` run.
fn educate(c: char, chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    match c {
        '-' if chars.peek() == Some(&'-') => {
            chars.next();
            if chars.peek() == Some(&'-') {
                chars.next();
                out.push('\u{2014}');
            } else {
                out.push('\u{2013}');
            }
        }
        '.' if chars.peek() == Some(&'.') && chars.clone().nth(1) == Some('.') => {
            chars.next();
            chars.next();
            out.push('\u{2026}');
        }
        '"' => out.push(if opens_quote(out) { '\u{201c}' } else { '\u{201d}' }),
        '\'' => out.push(if opens_quote(out) { '\u{2018}' } else { '\u{2019}' }),
        _ => out.push(c),
    }
}
