//! Ordered plugin chain run over a document's tokens and rendered HTML.
//!
//! For each stage the executor visits plugins strictly in list order. Every
//! plugin first sees the document's markdown options through
//! [`Plugin::set_options`], then its stage hook runs. A hook may pass, hand
//! back a new value for the stage, or hand back a pending future that is
//! awaited and judged the same way. Anything else stops the chain.

use crate::error::{BoxError, PluginError};
use futures::future::LocalBoxFuture;
use sitcom_core::{MarkdownOptions, Tokens};
use std::fmt;
use std::future::Future;
use std::rc::Rc;

/// Pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Runs over the token stream after tokenizing.
    Tokenize,
    /// Runs over the HTML after rendering.
    Transform,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Tokenize => f.write_str("tokenize"),
            Stage::Transform => f.write_str("transform"),
        }
    }
}

/// What a hook hands back.
pub enum Outcome {
    /// Keep the current value.
    Pass,
    /// Replacement token stream (tokenize stage).
    Tokens(Tokens),
    /// Replacement HTML (transform stage).
    Html(String),
    /// Value still being computed.
    Pending(LocalBoxFuture<'static, Result<Outcome, BoxError>>),
}

impl Outcome {
    /// Wraps a future producing the outcome.
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<Outcome, BoxError>> + 'static,
    {
        Outcome::Pending(Box::pin(future))
    }

    /// A pending outcome that fails with `error`.
    pub fn rejected(error: impl Into<BoxError>) -> Self {
        let error = error.into();
        Outcome::pending(async move { Err(error) })
    }

    fn stage(&self) -> Option<Stage> {
        match self {
            Outcome::Tokens(_) => Some(Stage::Tokenize),
            Outcome::Html(_) => Some(Stage::Transform),
            Outcome::Pass | Outcome::Pending(_) => None,
        }
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => f.write_str("Pass"),
            Outcome::Tokens(tokens) => write!(f, "Tokens({})", tokens.len()),
            Outcome::Html(html) => write!(f, "Html({} bytes)", html.len()),
            Outcome::Pending(_) => f.write_str("Pending"),
        }
    }
}

/// A document plugin. Every hook is optional.
pub trait Plugin {
    /// Name used in error messages.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Adjusts the markdown options; called before every hook of this plugin.
    fn set_options(&self, _options: &mut MarkdownOptions) {}

    /// Tokenize-stage hook.
    fn tokenize(&self, _tokens: &Tokens) -> Outcome {
        Outcome::Pass
    }

    /// Transform-stage hook.
    fn transform(&self, _html: &str) -> Outcome {
        Outcome::Pass
    }
}

/// Shared, ordered plugin list.
#[derive(Clone, Default)]
pub struct PluginList(Vec<Rc<dyn Plugin>>);

impl PluginList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a plugin.
    pub fn push(&mut self, plugin: impl Plugin + 'static) {
        self.0.push(Rc::new(plugin));
    }

    /// Number of plugins.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no plugin is attached.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn iter(&self) -> impl Iterator<Item = &Rc<dyn Plugin>> {
        self.0.iter()
    }
}

impl fmt::Debug for PluginList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.0.iter().map(|plugin| display_name(plugin.as_ref())))
            .finish()
    }
}

impl<P: Plugin + 'static> FromIterator<P> for PluginList {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|plugin| Rc::new(plugin) as Rc<dyn Plugin>)
                .collect(),
        )
    }
}

fn display_name(plugin: &dyn Plugin) -> String {
    plugin.name().unwrap_or("anonymous").to_string()
}

/// Runs a plugin list over one document.
#[derive(Debug, Clone, Default)]
pub struct PluginExecutor {
    plugins: PluginList,
}

impl PluginExecutor {
    /// Creates an executor over `plugins`.
    pub fn new(plugins: PluginList) -> Self {
        Self { plugins }
    }

    /// Runs the tokenize stage.
    pub async fn tokenize(
        &self,
        mut tokens: Tokens,
        options: &mut MarkdownOptions,
    ) -> Result<Tokens, PluginError> {
        for plugin in self.plugins.iter() {
            plugin.set_options(options);
            let outcome = plugin.tokenize(&tokens);
            if let Some(Outcome::Tokens(next)) =
                settle(plugin.as_ref(), Stage::Tokenize, outcome).await?
            {
                tokens = next;
            }
        }
        Ok(tokens)
    }

    /// Runs the transform stage.
    pub async fn transform(
        &self,
        mut html: String,
        options: &mut MarkdownOptions,
    ) -> Result<String, PluginError> {
        for plugin in self.plugins.iter() {
            plugin.set_options(options);
            let outcome = plugin.transform(&html);
            if let Some(Outcome::Html(next)) =
                settle(plugin.as_ref(), Stage::Transform, outcome).await?
            {
                html = next;
            }
        }
        Ok(html)
    }
}

/// Awaits pending outcomes until a value or a pass remains.
///
/// Returns `None` for a pass, or the accepted value for `stage`.
async fn settle(
    plugin: &dyn Plugin,
    stage: Stage,
    mut outcome: Outcome,
) -> Result<Option<Outcome>, PluginError> {
    loop {
        match outcome {
            Outcome::Pass => return Ok(None),
            Outcome::Pending(future) => {
                outcome = future.await.map_err(|source| PluginError::Rejected {
                    plugin: display_name(plugin),
                    stage,
                    source,
                })?;
            }
            accepted if accepted.stage() == Some(stage) => return Ok(Some(accepted)),
            _ => {
                return Err(PluginError::BadOutcome {
                    plugin: display_name(plugin),
                    stage,
                });
            }
        }
    }
}
