//! Markdown tokenizing and the options shared with the renderer.

use crate::{MarkupError, SourceLocation};
use markdown::mdast::Node;
use markdown::message::{Message, Place};
use serde::{Deserialize, Serialize};

/// Token stream handed to plugins: the top-level nodes of a document.
pub type Tokens = Vec<Node>;

/// Markdown engine options.
///
/// Plugins may adjust these through `set_options` before rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkdownOptions {
    /// Enable GitHub Flavored Markdown constructs.
    pub gfm: bool,
    /// Derive heading ids from heading text when no `{#id}` marker is present.
    pub header_ids: bool,
    /// Prefix for derived heading ids.
    pub header_prefix: String,
    /// Class prefix for fenced code languages.
    pub lang_prefix: String,
    /// Apply smart quotes, dashes and ellipses to rendered HTML.
    pub smartypants: bool,
    /// Emit self-closing void tags (`<br />`).
    pub xhtml: bool,
    /// Render soft line breaks as `<br>`.
    pub breaks: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            header_ids: true,
            header_prefix: String::new(),
            lang_prefix: "language-".to_string(),
            smartypants: false,
            xhtml: false,
            breaks: false,
        }
    }
}

impl MarkdownOptions {
    /// Convert to markdown-rs `ParseOptions`.
    ///
    /// Raw HTML is always parsed so local references inside it can be found.
    pub fn to_markdown(&self) -> markdown::ParseOptions {
        let mut constructs = markdown::Constructs {
            html_flow: true,
            html_text: true,
            frontmatter: false,
            ..Default::default()
        };

        if self.gfm {
            constructs.gfm_autolink_literal = true;
            constructs.gfm_strikethrough = true;
            constructs.gfm_table = true;
            constructs.gfm_task_list_item = true;
        }

        markdown::ParseOptions {
            constructs,
            ..markdown::ParseOptions::default()
        }
    }
}

/// Tokenizes markdown text into its top-level nodes.
pub fn tokenize(input: &str, options: &MarkdownOptions) -> Result<Tokens, MarkupError> {
    let root = markdown::to_mdast(input, &options.to_markdown()).map_err(|err| {
        MarkupError::Parse {
            message: err.to_string(),
            location: message_location(&err),
        }
    })?;

    match root {
        Node::Root(root) => Ok(root.children),
        other => Ok(vec![other]),
    }
}

fn message_location(message: &Message) -> SourceLocation {
    match &message.place {
        Some(place) => match place.as_ref() {
            Place::Point(point) => SourceLocation::new(point.line, point.column),
            Place::Position(position) => {
                SourceLocation::new(position.start.line, position.start.column)
            }
        },
        None => SourceLocation::new(1, 1),
    }
}
