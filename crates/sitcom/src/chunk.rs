//! One markdown document driven through tokenize, render and the plugin chain.

use crate::error::Result;
use crate::fs;
use crate::plugin::{PluginExecutor, PluginList};
use sitcom_core::{Dependency, MarkdownOptions, Tokens, tokenize};
use sitcom_render::{AssetProductions, Heading, render_tokens};
use std::path::{Path, PathBuf};

/// Compilation state of one source file.
#[derive(Debug)]
pub struct Chunk {
    filename: PathBuf,
    declare: Option<PathBuf>,
    dependency: Dependency,
    executor: PluginExecutor,
    options: MarkdownOptions,
    tokens: Tokens,
    /// Headings in encounter order, not nested.
    pub headings: Vec<Heading>,
    /// Rendered HTML, still holding placeholder tokens.
    pub result: String,
}

impl Chunk {
    /// Creates a chunk whose registry masters into `master`.
    pub fn new(
        filename: impl Into<PathBuf>,
        declare: Option<PathBuf>,
        plugins: PluginList,
        master: &Dependency,
    ) -> Self {
        Self {
            filename: filename.into(),
            declare,
            dependency: Dependency::child_of(master),
            executor: PluginExecutor::new(plugins),
            options: MarkdownOptions::default(),
            tokens: Tokens::new(),
            headings: Vec::new(),
            result: String::new(),
        }
    }

    /// Source file.
    pub fn filename(&self) -> &Path {
        &self.filename
    }

    /// The chunk's own registry.
    pub fn dependency(&self) -> &Dependency {
        &self.dependency
    }

    /// Options as left by the plugins.
    pub fn options(&self) -> &MarkdownOptions {
        &self.options
    }

    /// Tokens after the tokenize stage.
    pub fn tokens(&self) -> &Tokens {
        &self.tokens
    }

    /// Reads the source (followed by the declaration text) and runs the tokenize stage.
    pub async fn tokenize(&mut self, options: &MarkdownOptions) -> Result<()> {
        let mut content = fs::read_to_string(&self.filename).await?;
        if let Some(declare) = &self.declare {
            content.push_str(&fs::read_to_string(declare).await?);
        }

        self.options = options.clone();
        let tokens = tokenize(&content, &self.options)?;
        self.tokens = self.executor.tokenize(tokens, &mut self.options).await?;
        log::debug!(
            "tokenized {} ({} nodes)",
            self.filename.display(),
            self.tokens.len()
        );
        Ok(())
    }

    /// Renders the tokens and runs the transform stage.
    ///
    /// Local references are registered relative to the source file's directory.
    pub async fn transform(&mut self) -> Result<()> {
        let base_dir = self.filename.parent().unwrap_or(Path::new("."));
        let mut productions = AssetProductions::new(&self.dependency, base_dir);
        let html = render_tokens(&self.tokens, &self.options, &mut productions)?;
        self.headings = productions.into_headings();

        self.result = self.executor.transform(html, &mut self.options).await?;
        log::debug!(
            "transformed {} ({} assets)",
            self.filename.display(),
            self.dependency.size()
        );
        Ok(())
    }
}
