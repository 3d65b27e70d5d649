//! Rendering functions for the mdast renderer.

use crate::context::Context;
use crate::types::{HeadingProduction, ImageProduction, LinkProduction, Scope};
use markdown::mdast::{AlignKind, Node};
use sitcom_core::MarkupError;

type RenderResult = Result<(), MarkupError>;

/// Extracts plain text from a list of AST nodes (for heading text).
pub fn extract_text_from_nodes(nodes: &[Node]) -> String {
    let mut text = String::new();
    for node in nodes {
        extract_text_from_node(node, &mut text);
    }
    text.trim().to_string()
}

fn extract_text_from_node(node: &Node, buffer: &mut String) {
    match node {
        Node::Text(t) => buffer.push_str(&t.value),
        Node::InlineCode(code) => buffer.push_str(&code.value),
        Node::Break(_) => buffer.push(' '),
        Node::Image(img) => buffer.push_str(&img.alt),
        other => {
            if let Some(children) = other.children() {
                for child in children {
                    extract_text_from_node(child, buffer);
                }
            }
        }
    }
}

fn render_children(children: &[Node], ctx: &mut Context) -> RenderResult {
    for child in children {
        render_node(child, ctx)?;
    }
    Ok(())
}

fn render_wrapped(tag: &str, children: &[Node], ctx: &mut Context) -> RenderResult {
    ctx.push_raw(&format!("<{tag}>"));
    render_children(children, ctx)?;
    ctx.push_raw(&format!("</{tag}>"));
    Ok(())
}

/// Renders a list node as `<ul>` or `<ol>`.
fn render_list(list: &markdown::mdast::List, ctx: &mut Context) -> RenderResult {
    let tag = if list.ordered { "ol" } else { "ul" };
    match list.start {
        Some(start) if list.ordered && start != 1 => {
            ctx.push_raw(&format!("<{tag} start=\"{start}\">\n"));
        }
        _ => ctx.push_raw(&format!("<{tag}>\n")),
    }
    ctx.enter(Scope::List {
        spread: list.spread,
    });

    render_children(&list.children, ctx)?;

    ctx.exit();
    ctx.push_raw(&format!("</{tag}>"));
    ctx.end_block();
    Ok(())
}

/// Renders a list item node as `<li>`, with a disabled checkbox for task items.
fn render_list_item(item: &markdown::mdast::ListItem, ctx: &mut Context) -> RenderResult {
    ctx.push_raw("<li>");
    if let Some(checked) = item.checked {
        let checked_attr = if checked { " checked" } else { "" };
        let close = if ctx.options().xhtml { " /> " } else { "> " };
        ctx.push_raw(&format!(
            "<input type=\"checkbox\" disabled{checked_attr}{close}"
        ));
    }

    render_children(&item.children, ctx)?;

    // Block children end with a newline; keep `</li>` on the same line as tight text.
    if ctx.current_html.ends_with('\n') && ctx.is_in_tight_list() {
        ctx.current_html.pop();
    }
    ctx.push_raw("</li>");
    ctx.end_block();
    Ok(())
}

/// Helper function to render a table row with proper alignment.
fn render_table_row(
    row: &markdown::mdast::TableRow,
    ctx: &mut Context,
    is_header: bool,
    aligns: &[AlignKind],
) -> RenderResult {
    ctx.push_raw("<tr>");

    for (i, cell) in row.children.iter().enumerate() {
        if let Node::TableCell(c) = cell {
            let tag = if is_header { "th" } else { "td" };

            let align_attr = match aligns.get(i) {
                Some(AlignKind::Left) => " align=\"left\"",
                Some(AlignKind::Right) => " align=\"right\"",
                Some(AlignKind::Center) => " align=\"center\"",
                Some(AlignKind::None) | None => "",
            };

            ctx.push_raw(&format!("<{tag}{align_attr}>"));
            render_phrasing(&c.children, ctx)?;
            ctx.push_raw(&format!("</{tag}>"));
        }
    }

    ctx.push_raw("</tr>\n");
    Ok(())
}

/// Renders a table node as `<table>` with `<thead>` and optional `<tbody>`.
fn render_table(table: &markdown::mdast::Table, ctx: &mut Context) -> RenderResult {
    ctx.push_raw("<table>\n<thead>\n");
    if let Some(Node::TableRow(row)) = table.children.first() {
        render_table_row(row, ctx, true, &table.align)?;
    }
    ctx.push_raw("</thead>\n");

    if table.children.len() > 1 {
        ctx.push_raw("<tbody>\n");
        for row in table.children.iter().skip(1) {
            if let Node::TableRow(r) = row {
                render_table_row(r, ctx, false, &table.align)?;
            }
        }
        ctx.push_raw("</tbody>\n");
    }

    ctx.push_raw("</table>");
    ctx.end_block();
    Ok(())
}

/// Renders a paragraph node, suppressing `<p>` wrappers in tight lists.
fn render_paragraph(para: &markdown::mdast::Paragraph, ctx: &mut Context) -> RenderResult {
    let in_tight_list = ctx.is_in_tight_list();
    if !in_tight_list {
        ctx.push_raw("<p>");
    }

    ctx.enter(Scope::Phrasing);
    let rendered = render_children(&para.children, ctx);
    ctx.exit();
    rendered?;

    if !in_tight_list {
        ctx.push_raw("</p>");
        ctx.end_block();
    }
    Ok(())
}

/// Renders inline content of a non-paragraph block (heading, table cell).
fn render_phrasing(children: &[Node], ctx: &mut Context) -> RenderResult {
    ctx.enter(Scope::Phrasing);
    let rendered = render_children(children, ctx);
    ctx.exit();
    rendered
}

/// Renders a heading through the heading production.
fn render_heading(heading: &markdown::mdast::Heading, ctx: &mut Context) -> RenderResult {
    let raw = extract_text_from_nodes(&heading.children);
    let html = ctx.capture(|ctx| render_phrasing(&heading.children, ctx))?;
    let options = ctx.options();

    let produced = ctx.productions().heading(
        HeadingProduction {
            level: heading.depth,
            html: &html,
            raw: &raw,
        },
        options,
    )?;
    ctx.push_raw(&produced);
    ctx.end_block();
    Ok(())
}

fn render_link_to(
    href: &str,
    title: Option<&str>,
    children: &[Node],
    ctx: &mut Context,
) -> RenderResult {
    let html = ctx.capture(|ctx| render_children(children, ctx))?;
    let options = ctx.options();
    let produced = ctx
        .productions()
        .link(LinkProduction { href, title, html: &html }, options)?;
    ctx.push_raw(&produced);
    Ok(())
}

fn render_image_of(src: &str, title: Option<&str>, alt: &str, ctx: &mut Context) -> RenderResult {
    let options = ctx.options();
    let produced = ctx
        .productions()
        .image(ImageProduction { src, title, alt }, options)?;
    ctx.push_raw(&produced);
    Ok(())
}

/// Renders a reference-style link against the collected definitions.
fn render_link_reference(
    reference: &markdown::mdast::LinkReference,
    ctx: &mut Context,
) -> RenderResult {
    match ctx.definition(&reference.identifier) {
        Some(def) => render_link_to(&def.url, def.title.as_deref(), &reference.children, ctx),
        None => render_children(&reference.children, ctx),
    }
}

/// Renders a reference-style image against the collected definitions.
fn render_image_reference(
    reference: &markdown::mdast::ImageReference,
    ctx: &mut Context,
) -> RenderResult {
    match ctx.definition(&reference.identifier) {
        Some(def) => render_image_of(&def.url, def.title.as_deref(), &reference.alt, ctx),
        None => {
            ctx.push_text(&reference.alt);
            Ok(())
        }
    }
}

/// Renders a fenced or indented code block.
fn render_code(code: &markdown::mdast::Code, ctx: &mut Context) {
    ctx.push_raw("<pre><code");
    if let Some(lang) = &code.lang {
        let class = format!("{}{}", ctx.options().lang_prefix, lang);
        ctx.push_raw(" class=\"");
        ctx.push_attr_value(&class);
        ctx.push_raw("\"");
    }
    ctx.push_raw(">");
    ctx.push_text(&code.value);
    if !code.value.is_empty() {
        ctx.push_raw("\n");
    }
    ctx.push_raw("</code></pre>");
    ctx.end_block();
}

/// Renders text, turning soft line breaks into `<br>` when `breaks` is set.
fn render_text(value: &str, ctx: &mut Context) {
    if !ctx.options().breaks {
        ctx.push_text(value);
        return;
    }
    let mut lines = value.split('\n').peekable();
    while let Some(line) = lines.next() {
        ctx.push_text(line);
        if lines.peek().is_some() {
            ctx.push_break();
            ctx.push_raw("\n");
        }
    }
}

/// Recursively renders an AST node to HTML, updating the context state.
pub fn render_node(node: &Node, ctx: &mut Context) -> RenderResult {
    match node {
        Node::Root(root) => render_children(&root.children, ctx)?,
        Node::Text(text) => render_text(&text.value, ctx),
        Node::Paragraph(para) => render_paragraph(para, ctx)?,
        Node::Heading(heading) => render_heading(heading, ctx)?,
        Node::Link(link) => render_link_to(&link.url, link.title.as_deref(), &link.children, ctx)?,
        Node::LinkReference(reference) => render_link_reference(reference, ctx)?,
        Node::Image(img) => render_image_of(&img.url, img.title.as_deref(), &img.alt, ctx)?,
        Node::ImageReference(reference) => render_image_reference(reference, ctx)?,
        Node::Html(html) => {
            let produced = ctx.productions().html(&html.value)?;
            ctx.push_raw(&produced);
            if !ctx.is_in_phrasing() && !produced.ends_with('\n') {
                ctx.end_block();
            }
        }
        Node::Strong(strong) => render_wrapped("strong", &strong.children, ctx)?,
        Node::Emphasis(emphasis) => render_wrapped("em", &emphasis.children, ctx)?,
        Node::Delete(delete) => render_wrapped("del", &delete.children, ctx)?,
        Node::InlineCode(code) => {
            ctx.push_raw("<code>");
            ctx.push_text(&code.value);
            ctx.push_raw("</code>");
        }
        Node::Break(_) => {
            ctx.push_break();
            ctx.push_raw("\n");
        }
        Node::List(list) => render_list(list, ctx)?,
        Node::ListItem(item) => render_list_item(item, ctx)?,
        Node::Code(code) => render_code(code, ctx),
        Node::Blockquote(quote) => {
            ctx.push_raw("<blockquote>\n");
            render_children(&quote.children, ctx)?;
            ctx.push_raw("</blockquote>");
            ctx.end_block();
        }
        Node::ThematicBreak(_) => {
            ctx.push_raw(if ctx.options().xhtml { "<hr />" } else { "<hr>" });
            ctx.end_block();
        }
        Node::Table(table) => render_table(table, ctx)?,
        Node::Definition(_) => {}
        Node::TableRow(_) | Node::TableCell(_) => {}
        _ => {
            log::warn!("Unhandled markdown node type: {:?}", node);
        }
    }
    Ok(())
}
