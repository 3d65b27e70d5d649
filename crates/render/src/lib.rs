#![deny(missing_docs)]
//! sitcom rendering: mdast to HTML with overridable productions.

/// Productions that register local assets and record headings.
pub mod adapter;
/// Rendering state.
pub mod context;
/// Production hooks and their default markup.
pub mod productions;
/// Node-by-node HTML rendering.
pub mod render;
/// Typographic punctuation.
pub mod smartypants;
/// Shared renderer types.
pub mod types;

pub use adapter::AssetProductions;
pub use context::Context;
pub use productions::{BaseProductions, Productions};
pub use smartypants::smartypants;
pub use types::{Heading, HeadingProduction, ImageProduction, LinkProduction};

use markdown::mdast::Node;
use sitcom_core::{MarkdownOptions, MarkupError};

/// Renders tokens to HTML, sending headings, links, images and raw HTML through `productions`.
pub fn render_tokens(
    tokens: &[Node],
    options: &MarkdownOptions,
    productions: &mut dyn Productions,
) -> Result<String, MarkupError> {
    let mut ctx = Context::new(options, productions);
    ctx.collect_definitions(tokens);
    for node in tokens {
        render::render_node(node, &mut ctx)?;
    }
    let html = ctx.finish();

    if options.smartypants {
        Ok(smartypants(&html))
    } else {
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitcom_core::tokenize;

    fn html(source: &str, options: &MarkdownOptions) -> String {
        let tokens = tokenize(source, options).unwrap();
        render_tokens(&tokens, options, &mut BaseProductions).unwrap()
    }

    #[test]
    fn renders_common_blocks() {
        let options = MarkdownOptions::default();
        let out = html(
            "# Hello *world*\n\nSome `code` and **bold**.\n\n- one\n- two\n\n---\n",
            &options,
        );
        insta::assert_snapshot!(out.trim_end(), @r#"
        <h1 id="Hello-world">Hello <em>world</em></h1>
        <p>Some <code>code</code> and <strong>bold</strong>.</p>
        <ul>
        <li>one</li>
        <li>two</li>
        </ul>
        <hr>
        "#);
    }

    #[test]
    fn renders_code_with_language_prefix() {
        let options = MarkdownOptions {
            lang_prefix: "lang-".into(),
            ..Default::default()
        };
        let out = html("```rust\nfn main() {}\n```\n", &options);
        assert_eq!(out, "<pre><code class=\"lang-rust\">fn main() {}\n</code></pre>\n");
    }

    #[test]
    fn renders_gfm_tables_and_tasks() {
        let options = MarkdownOptions::default();
        let out = html("| a | b |\n|:--|--:|\n| 1 | 2 |\n\n- [x] done\n", &options);
        assert!(out.contains("<th align=\"left\">a</th><th align=\"right\">b</th>"));
        assert!(out.contains("<td align=\"left\">1</td><td align=\"right\">2</td>"));
        assert!(out.contains("<li><input type=\"checkbox\" disabled checked> done</li>"));
    }

    #[test]
    fn breaks_and_xhtml_change_line_breaks() {
        let options = MarkdownOptions {
            breaks: true,
            xhtml: true,
            ..Default::default()
        };
        assert_eq!(html("one\ntwo\n", &options), "<p>one<br />\ntwo</p>\n");
    }

    #[test]
    fn header_ids_can_be_disabled() {
        let options = MarkdownOptions {
            header_ids: false,
            ..Default::default()
        };
        assert_eq!(html("## Plain\n", &options), "<h2>Plain</h2>\n");
    }

    #[test]
    fn smartypants_runs_after_rendering() {
        let options = MarkdownOptions {
            smartypants: true,
            ..Default::default()
        };
        assert_eq!(
            html("It's \"fine\" -- `a--b`\n", &options),
            "<p>It\u{2019}s \u{201c}fine\u{201d} \u{2013} <code>a--b</code></p>\n"
        );
    }

    #[test]
    fn inline_html_stays_inline() {
        let options = MarkdownOptions::default();
        assert_eq!(
            html("a <kbd>b</kbd> c\n", &options),
            "<p>a <kbd>b</kbd> c</p>\n"
        );
    }
}
