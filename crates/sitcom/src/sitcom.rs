//! Compilation session and its options.

use crate::bundle::{Bundle, InputOptions};
use crate::console::Console;
use crate::error::{Error, Result};
use crate::input::{Input, InputMapping};
use crate::output::OutputOptions;
use crate::plugin::PluginList;
use serde::Deserialize;
use sitcom_core::paths::resolve;
use sitcom_core::{Dependency, MarkdownOptions, Placeholders};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Everything needed to compile an entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SitcomOptions {
    /// Entry path, list of entries, or mapping name. Required.
    pub input: Option<Input>,
    /// Working root; defaults to the current directory.
    pub root: Option<PathBuf>,
    /// Markdown appended to every document, usually link definitions.
    pub declare: Option<PathBuf>,
    /// Entry names expanding to files.
    pub mapping: InputMapping,
    /// Suppresses advisories.
    pub silent: Option<bool>,
    /// Markdown engine options.
    pub marked: MarkdownOptions,
    /// Output options.
    pub output: OutputOptions,
    /// Plugins run for every document.
    #[serde(skip)]
    pub plugins: PluginList,
}

struct Session {
    dependency: Dependency,
    console: Console,
    silent: Cell<bool>,
    in_flight: RefCell<HashSet<PathBuf>>,
    finished: RefCell<HashSet<PathBuf>>,
}

/// One compilation run.
///
/// Owns the placeholder table and the registry every bundle of the run
/// masters into, and tracks which documents are being or have been compiled.
/// Clones share the session.
#[derive(Clone)]
pub struct Sitcom {
    inner: Rc<Session>,
}

impl Default for Sitcom {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Sitcom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sitcom")
            .field("dependency", &self.inner.dependency)
            .field("silent", &self.inner.silent.get())
            .finish()
    }
}

impl Sitcom {
    /// Creates a session printing previews to standard output.
    pub fn new() -> Self {
        Self::with_console(Console::stdout())
    }

    /// Creates a session printing previews to `console`.
    pub fn with_console(console: Console) -> Self {
        Self {
            inner: Rc::new(Session {
                dependency: Dependency::new(Placeholders::new()),
                console,
                silent: Cell::new(false),
                in_flight: RefCell::default(),
                finished: RefCell::default(),
            }),
        }
    }

    /// Registry at the top of every chain in this run.
    pub fn dependency(&self) -> &Dependency {
        &self.inner.dependency
    }

    /// Preview sink.
    pub fn console(&self) -> &Console {
        &self.inner.console
    }

    /// True when advisories are suppressed.
    pub fn is_silent(&self) -> bool {
        self.inner.silent.get()
    }

    /// Turns advisories off or on.
    pub fn set_silent(&self, silent: bool) {
        self.inner.silent.set(silent);
    }

    /// Validates `options` and returns the entry bundle, tokenized.
    pub async fn make(&self, options: SitcomOptions) -> Result<Bundle> {
        let SitcomOptions {
            input,
            root,
            declare,
            mapping,
            silent,
            marked,
            output,
            plugins,
        } = options;

        let input = input
            .filter(|input| !input.is_empty())
            .ok_or_else(|| Error::Config("\"input\" is required".into()))?;

        if let Some(silent) = silent {
            self.set_silent(silent);
        }

        let cwd = std::env::current_dir().map_err(|err| Error::io(".", err))?;
        let root = match root {
            Some(root) => resolve(&cwd, root),
            None => cwd,
        };

        let input = InputOptions {
            input,
            root,
            declare,
            mapping,
            plugins,
        };
        Bundle::make(self.clone(), input, output, marked, self.dependency(), None).await
    }

    /// Marks `source` as being compiled; fails if it already is.
    pub(crate) fn enter(&self, source: &Path) -> Result<()> {
        if self.inner.in_flight.borrow_mut().insert(source.to_path_buf()) {
            Ok(())
        } else {
            Err(Error::Cycle {
                path: source.to_path_buf(),
            })
        }
    }

    /// Marks `source` as compiled.
    pub(crate) fn leave(&self, source: &Path) {
        self.inner.in_flight.borrow_mut().remove(source);
        self.inner.finished.borrow_mut().insert(source.to_path_buf());
    }

    pub(crate) fn is_finished(&self, source: &Path) -> bool {
        self.inner.finished.borrow().contains(source)
    }
}
