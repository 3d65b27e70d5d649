//! Overridable production rules for headings, links, images and raw HTML.
//!
//! The renderer walks the tree itself and calls into a [`Productions`]
//! implementation for the four node kinds whose output may be customized.
//! Every hook has a default that produces plain markup, so an implementation
//! only overrides what it needs.

use crate::types::{HeadingProduction, ImageProduction, LinkProduction};
use sitcom_core::{MarkdownOptions, MarkupError, heading_id};

/// Capability interface invoked by the renderer.
pub trait Productions {
    /// Produces a heading element.
    fn heading(
        &mut self,
        heading: HeadingProduction<'_>,
        options: &MarkdownOptions,
    ) -> Result<String, MarkupError> {
        let id = heading_id(heading.raw, None, options.header_ids, &options.header_prefix);
        Ok(heading_tag(heading.level, id.as_deref(), heading.html))
    }

    /// Produces an anchor element.
    fn link(
        &mut self,
        link: LinkProduction<'_>,
        _options: &MarkdownOptions,
    ) -> Result<String, MarkupError> {
        Ok(anchor_tag("", link.href, link.title, link.html))
    }

    /// Produces an image element.
    fn image(
        &mut self,
        image: ImageProduction<'_>,
        options: &MarkdownOptions,
    ) -> Result<String, MarkupError> {
        Ok(image_tag("", image.src, image.title, image.alt, options.xhtml))
    }

    /// Passes raw HTML through.
    fn html(&mut self, html: &str) -> Result<String, MarkupError> {
        Ok(html.to_string())
    }
}

/// Productions with no overrides.
#[derive(Debug, Default, Clone, Copy)]
pub struct BaseProductions;

impl Productions for BaseProductions {}

/// `<hN id="...">html</hN>`
pub fn heading_tag(level: u8, id: Option<&str>, html: &str) -> String {
    match id {
        Some(id) => format!("<h{level} id=\"{}\">{html}</h{level}>", attr(id)),
        None => format!("<h{level}>{html}</h{level}>"),
    }
}

/// `<a{extra} href="..." title="...">html</a>`
///
/// `extra` is spliced verbatim after the tag name and must start with a space when non-empty.
pub fn anchor_tag(extra: &str, href: &str, title: Option<&str>, html: &str) -> String {
    let mut out = format!("<a{extra} href=\"{}\"", attr(href));
    if let Some(title) = title {
        out.push_str(&format!(" title=\"{}\"", attr(title)));
    }
    out.push('>');
    out.push_str(html);
    out.push_str("</a>");
    out
}

/// `<img{extra} src="..." alt="..." title="...">`
pub fn image_tag(extra: &str, src: &str, title: Option<&str>, alt: &str, xhtml: bool) -> String {
    let mut out = format!("<img{extra} src=\"{}\" alt=\"{}\"", attr(src), attr(alt));
    if let Some(title) = title {
        out.push_str(&format!(" title=\"{}\"", attr(title)));
    }
    out.push_str(if xhtml { " />" } else { ">" });
    out
}

fn attr(value: &str) -> std::borrow::Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_heading_derives_prefixed_id() {
        let options = MarkdownOptions {
            header_prefix: "doc-".into(),
            ..Default::default()
        };
        let html = BaseProductions
            .heading(
                HeadingProduction {
                    level: 2,
                    html: "Getting <em>started</em>",
                    raw: "Getting started",
                },
                &options,
            )
            .unwrap();
        assert_eq!(html, r#"<h2 id="doc-Getting-started">Getting <em>started</em></h2>"#);
    }

    #[test]
    fn base_link_and_image_escape_attributes() {
        let options = MarkdownOptions::default();
        let link = BaseProductions
            .link(
                LinkProduction {
                    href: "a.html?x=1&y=\"2\"",
                    title: Some("T"),
                    html: "text",
                },
                &options,
            )
            .unwrap();
        assert_eq!(link, r#"<a href="a.html?x=1&amp;y=&quot;2&quot;" title="T">text</a>"#);

        let image = image_tag(" class=\"wide\"", "a.png", None, "A", true);
        assert_eq!(image, r#"<img class="wide" src="a.png" alt="A" />"#);
    }
}
