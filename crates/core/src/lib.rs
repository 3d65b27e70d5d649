#![deny(missing_docs)]
//! sitcom core: asset registry, placeholders, local references, selectors and heading ids.

/// Heading id helpers (`{#id}` markers, id sanitizing).
pub mod anchor;
/// Asset registry with master propagation.
pub mod dependency;
/// Core error types.
pub mod error;
/// Markdown tokenizing and engine options.
pub mod parse;
/// Lexical path helpers.
pub mod paths;
/// Placeholder tokens and their per-run memo table.
pub mod placeholder;
/// Local reference classification and raw HTML rewriting.
pub mod reference;
/// Inline selector micro-syntax.
pub mod selector;

pub use anchor::{extract_custom_id, heading_id, sanitize_id};
pub use dependency::{AssetData, AssetEntry, Dependency, EntryExt, SharedEntry};
pub use error::{MarkupError, SelectorError, SourceLocation};
pub use parse::{MarkdownOptions, Tokens, tokenize};
pub use placeholder::{Placeholder, Placeholders};
pub use reference::{
    is_local_dependency, local_target, remove_search_and_anchor, replace_local_dependency,
};
pub use selector::{SelectorAttrs, is_selector, selector_to_attrs};
