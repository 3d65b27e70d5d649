//! Rendering context for the mdast renderer.

use crate::productions::Productions;
use crate::types::Scope;
use markdown::mdast::{Definition, Node};
use sitcom_core::MarkdownOptions;
use std::collections::HashMap;

/// Link reference definition collected before rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkDefinition {
    /// Destination.
    pub url: String,
    /// Optional title.
    pub title: Option<String>,
}

/// Manages the current rendering state.
///
/// Tracks the scope stack while the tree is walked, the HTML produced so far,
/// and the link definitions reference-style links resolve against.
pub struct Context<'a> {
    /// Current HTML buffer.
    pub current_html: String,

    stack: Vec<Scope>,
    options: &'a MarkdownOptions,
    productions: &'a mut dyn Productions,
    definitions: HashMap<String, LinkDefinition>,
}

impl<'a> Context<'a> {
    /// Creates a new context that sends overridable nodes to `productions`.
    pub fn new(options: &'a MarkdownOptions, productions: &'a mut dyn Productions) -> Self {
        Self {
            current_html: String::with_capacity(4096),
            stack: vec![Scope::Root],
            options,
            productions,
            definitions: HashMap::new(),
        }
    }

    /// Markdown options in effect.
    pub fn options(&self) -> &'a MarkdownOptions {
        self.options
    }

    /// The production hooks.
    pub fn productions(&mut self) -> &mut dyn Productions {
        &mut *self.productions
    }

    /// Writes a raw string to the current HTML buffer without escaping (for safe HTML tags).
    pub fn push_raw(&mut self, s: &str) {
        self.current_html.push_str(s);
    }

    /// Writes text content to the buffer with HTML escaping.
    pub fn push_text(&mut self, s: &str) {
        html_escape::encode_text_to_string(s, &mut self.current_html);
    }

    /// Writes HTML-escaped attribute value to the current HTML buffer.
    pub fn push_attr_value(&mut self, s: &str) {
        html_escape::encode_double_quoted_attribute_to_string(s, &mut self.current_html);
    }

    /// Writes the tag for a line break in the configured flavor.
    pub fn push_break(&mut self) {
        let tag = if self.options.xhtml { "<br />" } else { "<br>" };
        self.current_html.push_str(tag);
    }

    /// Ends a block-level element.
    pub fn end_block(&mut self) {
        self.current_html.push('\n');
    }

    /// Returns true if inside a tight (non-spread) list.
    ///
    /// Used to suppress `<p>` wrappers around list item content.
    pub fn is_in_tight_list(&self) -> bool {
        self.stack
            .iter()
            .rev()
            .find(|scope| matches!(scope, Scope::List { .. }))
            .is_some_and(|scope| matches!(scope, Scope::List { spread: false }))
    }

    /// Returns true while rendering inline content.
    ///
    /// Raw HTML found here is phrasing HTML and must not end a block.
    pub fn is_in_phrasing(&self) -> bool {
        self.stack.iter().any(|scope| matches!(scope, Scope::Phrasing))
    }

    /// Enters a new scope by pushing it onto the stack.
    pub fn enter(&mut self, scope: Scope) {
        self.stack.push(scope);
    }

    /// Exits the current scope by popping from the stack.
    pub fn exit(&mut self) -> Option<Scope> {
        self.stack.pop()
    }

    /// Runs `render` against an empty buffer and returns what it wrote.
    pub fn capture<E>(
        &mut self,
        render: impl FnOnce(&mut Self) -> Result<(), E>,
    ) -> Result<String, E> {
        let saved = std::mem::take(&mut self.current_html);
        let result = render(self);
        let captured = std::mem::replace(&mut self.current_html, saved);
        result.map(|()| captured)
    }

    /// Collects every link definition in `nodes`, first definition wins.
    pub fn collect_definitions(&mut self, nodes: &[Node]) {
        for node in nodes {
            match node {
                Node::Definition(Definition {
                    identifier,
                    url,
                    title,
                    ..
                }) => {
                    self.definitions
                        .entry(identifier.to_lowercase())
                        .or_insert_with(|| LinkDefinition {
                            url: url.clone(),
                            title: title.clone(),
                        });
                }
                other => {
                    if let Some(children) = other.children() {
                        self.collect_definitions(children);
                    }
                }
            }
        }
    }

    /// Looks up a definition by identifier.
    pub fn definition(&self, identifier: &str) -> Option<LinkDefinition> {
        self.definitions.get(&identifier.to_lowercase()).cloned()
    }

    /// Consumes the context and returns the rendered HTML.
    pub fn finish(self) -> String {
        self.current_html
    }
}
