//! Type definitions for the mdast renderer.

use serde::{Deserialize, Serialize};

/// One entry of a document's flat heading outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level (1-6).
    pub level: u8,
    /// Visible heading text with any `{#id}` marker removed.
    pub title: String,
    /// Sanitized id, when one was given or derived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Input to the heading production.
#[derive(Debug, Clone, Copy)]
pub struct HeadingProduction<'a> {
    /// Heading level (1-6).
    pub level: u8,
    /// Rendered inner HTML.
    pub html: &'a str,
    /// Plain text of the heading, as written.
    pub raw: &'a str,
}

/// Input to the link production.
#[derive(Debug, Clone, Copy)]
pub struct LinkProduction<'a> {
    /// Link destination as written.
    pub href: &'a str,
    /// Optional title.
    pub title: Option<&'a str>,
    /// Rendered inner HTML.
    pub html: &'a str,
}

/// Input to the image production.
#[derive(Debug, Clone, Copy)]
pub struct ImageProduction<'a> {
    /// Image source as written.
    pub src: &'a str,
    /// Optional title.
    pub title: Option<&'a str>,
    /// Alternative text.
    pub alt: &'a str,
}

/// Represents the type of scope currently being rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum Scope {
    /// Document root - not inside any specific block element.
    Root,
    /// Inside phrasing content: a paragraph, heading or table cell.
    Phrasing,
    /// Inside a list element (`<ul>` or `<ol>`).
    List {
        /// Whether items are separated by blank lines.
        spread: bool,
    },
}
