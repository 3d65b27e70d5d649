use crate::plugin::Stage;
use sitcom_core::MarkupError;
use std::path::PathBuf;
use thiserror::Error;

/// Boxed error a plugin may reject with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Plugin protocol failures.
#[derive(Debug, Error)]
pub enum PluginError {
    /// A hook produced a value of the wrong kind for its stage.
    #[error("Bad {stage} for plugin {plugin}")]
    BadOutcome {
        /// Plugin name, or `anonymous`
        plugin: String,
        /// Stage being run
        stage: Stage,
    },
    /// A pending hook result resolved to an error.
    #[error("plugin {plugin} failed during {stage}: {source}")]
    Rejected {
        /// Plugin name, or `anonymous`
        plugin: String,
        /// Stage being run
        stage: Stage,
        /// The rejection
        #[source]
        source: BoxError,
    },
}

/// Errors that abort a compilation.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or missing options.
    #[error("configuration error: {0}")]
    Config(String),
    /// Tokenizing or rendering a document failed.
    #[error(transparent)]
    Markup(#[from] MarkupError),
    /// A plugin broke the pipeline.
    #[error(transparent)]
    Plugin(#[from] PluginError),
    /// Layout or content template failed to render.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
    /// Reading or writing a file failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// A markdown document links back to a document still being compiled.
    #[error("circular markdown reference to {}", path.display())]
    Cycle {
        /// Source re-entered
        path: PathBuf,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for compilation steps.
pub type Result<T, E = Error> = std::result::Result<T, E>;
