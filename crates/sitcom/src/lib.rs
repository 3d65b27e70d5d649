#![deny(missing_docs)]
//! Bundle markdown documents into HTML pages.
//!
//! Documents are rendered with placeholder tokens standing in for every local
//! reference. Once a bundle knows where its page goes, the tokens are replaced
//! with paths relative to that page and the referenced files are copied next
//! to it. Linked markdown documents become pages of their own.

/// Bundles and the generate / relocate / write passes.
pub mod bundle;
/// Per-document compilation state.
pub mod chunk;
/// Preview output.
pub mod console;
/// Error types.
pub mod error;
mod fs;
/// Entry specifications and mappings.
pub mod input;
/// Page layout templates.
pub mod layout;
/// Output options and output file resolution.
pub mod output;
/// Tokenize and transform plugins.
pub mod plugin;
/// Asset placement and token substitution.
pub mod relocate;
/// Compilation sessions.
pub mod sitcom;
/// Intro and outro wrapping.
pub mod wrap;

pub use bundle::{
    AssetReport, AssetStatus, Bundle, Generated, InputOptions, Relocated, WriteReport,
};
pub use chunk::Chunk;
pub use console::Console;
pub use error::{BoxError, Error, PluginError, Result};
pub use input::{Input, InputMapping};
pub use layout::Layout;
pub use output::OutputOptions;
pub use plugin::{Outcome, Plugin, PluginList, Stage};
pub use relocate::Relocation;
pub use sitcom::{Sitcom, SitcomOptions};
pub use sitcom_core::{MarkdownOptions, Tokens};
pub use sitcom_render::Heading;
pub use wrap::{Wrap, WrapData, WrapValue};
