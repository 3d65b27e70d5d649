//! Bundles: documents compiled together into one output file.
//!
//! A bundle runs in three steps:
//!
//! 1. [`Bundle::generate`] transforms and wraps every document, compiles the
//!    markdown documents they link to as nested bundles, and merges the result
//!    into the layout. The HTML still holds placeholder tokens.
//! 2. [`Bundle::relocate`] places every asset in the output tree and replaces
//!    the tokens with paths.
//! 3. [`Bundle::write`] runs both, writes the page (or prints it when there is
//!    no output file) and, for the entry bundle, copies the assets.

use crate::chunk::Chunk;
use crate::error::{Error, Result};
use crate::fs;
use crate::input::{Input, InputMapping, input_files};
use crate::layout::Layout;
use crate::output::{OutputOptions, resolve_output_file};
use crate::plugin::PluginList;
use crate::relocate::Relocation;
use crate::sitcom::Sitcom;
use crate::wrap::wrap_result;
use futures::future::join_all;
use sitcom_core::paths::{normalize_path, relative_path, resolve};
use sitcom_core::{Dependency, EntryExt, MarkdownOptions};
use sitcom_render::Heading;
use std::path::{Path, PathBuf};

/// Input side of a bundle.
#[derive(Debug, Clone)]
pub struct InputOptions {
    /// Entry specification.
    pub input: Input,
    /// Absolute working root.
    pub root: PathBuf,
    /// Declaration file appended to every document.
    pub declare: Option<PathBuf>,
    /// Entry names expanding to files.
    pub mapping: InputMapping,
    /// Plugins run for every document.
    pub plugins: PluginList,
}

/// Output of [`Bundle::generate`]: HTML with tokens still in place.
#[derive(Debug)]
pub struct Generated {
    /// Page HTML holding placeholder tokens.
    pub html: String,
    /// Headings of all documents, in order.
    pub headings: Vec<Heading>,
    /// The bundle's registry.
    pub dependency: Dependency,
    /// Output geometry the tokens resolve against.
    pub relocation: Relocation,
}

/// Output of [`Bundle::relocate`]: final HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocated {
    /// Page HTML with every token replaced.
    pub html: String,
    /// Where it is written; `None` prints it.
    pub outfile: Option<PathBuf>,
}

/// What happened to one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetStatus {
    /// Copied (or already in place).
    Ok,
    /// The source file does not exist.
    NotFound,
    /// The source lies outside the working root and was left alone.
    NotInWorkingDirectory,
    /// Copying failed.
    Failed(String),
}

/// Advisory for one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReport {
    /// Source path.
    pub from: PathBuf,
    /// Destination, when inside the working root.
    pub to: Option<PathBuf>,
    /// Outcome.
    pub status: AssetStatus,
}

/// Result of [`Bundle::write`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    /// The page written, `None` when printed.
    pub outfile: Option<PathBuf>,
    /// Asset advisories, in registration order. Empty for nested bundles and previews.
    pub assets: Vec<AssetReport>,
    /// Advisory lines logged for the page and its assets. Empty when silent.
    pub advisories: Vec<String>,
}

impl WriteReport {
    /// Status of the asset copied from `from`.
    pub fn status_of(&self, from: &Path) -> Option<&AssetStatus> {
        self.assets
            .iter()
            .find(|report| report.from == from)
            .map(|report| &report.status)
    }
}

/// One compilation unit producing one page.
#[derive(Debug)]
pub struct Bundle {
    sitcom: Sitcom,
    input: InputOptions,
    output: OutputOptions,
    marked: MarkdownOptions,
    dependency: Dependency,
    chunks: Vec<Chunk>,
    target: Option<PathBuf>,
    outfile: Option<PathBuf>,
}

impl Bundle {
    /// Creates the bundle and tokenizes its documents in order.
    ///
    /// `target` fixes the output file of a nested bundle.
    pub(crate) async fn make(
        sitcom: Sitcom,
        input: InputOptions,
        output: OutputOptions,
        marked: MarkdownOptions,
        master: &Dependency,
        target: Option<PathBuf>,
    ) -> Result<Self> {
        let dependency = Dependency::child_of(master);
        let declaration = input
            .declare
            .as_ref()
            .map(|declare| resolve(&input.root, declare));

        let mut chunks: Vec<Chunk> = input_files(&input.input, &input.mapping, &input.root)
            .into_iter()
            .map(|file| Chunk::new(file, declaration.clone(), input.plugins.clone(), &dependency))
            .collect();

        for chunk in &mut chunks {
            chunk.tokenize(&marked).await?;
        }

        Ok(Self {
            sitcom,
            input,
            output,
            marked,
            dependency,
            chunks,
            target,
            outfile: None,
        })
    }

    /// The bundle's registry.
    pub fn dependency(&self) -> &Dependency {
        &self.dependency
    }

    /// The documents, in input order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// The output file, known after [`Bundle::generate`].
    pub fn outfile(&self) -> Option<&Path> {
        self.outfile.as_deref()
    }

    /// True for bundles compiled from a link in another document.
    pub fn is_nested(&self) -> bool {
        self.target.is_some()
    }

    /// First pass: renders every document and merges them into the layout.
    pub async fn generate(&mut self) -> Result<Generated> {
        let root = self.input.root.clone();
        self.outfile = match &self.target {
            Some(target) => Some(target.clone()),
            None => resolve_output_file(&self.input.input, &self.output, &root),
        };

        let layout = Layout::load(self.output.layout.as_deref(), &root).await?;
        let plan = Relocation::new(
            &root,
            self.output.dist_dir(&root),
            layout.dir().map(Path::to_path_buf),
            self.outfile.clone(),
        );

        let total = self.chunks.len();
        let mut headings = Vec::new();
        let mut partials = Vec::with_capacity(total);

        for index in 0..total {
            let chunk = &mut self.chunks[index];
            let source = chunk.filename().to_path_buf();
            self.sitcom.enter(&source)?;
            chunk.transform().await?;

            let wrapped = wrap_result(
                &chunk.result,
                &chunk.headings,
                self.output.intro.as_ref(),
                self.output.outro.as_ref(),
                &mut self.output.data,
                index + 1,
                total,
            );
            chunk.result = wrapped.result;
            chunk.headings = wrapped.headings;

            partials.push(chunk.result.clone());
            headings.extend(chunk.headings.iter().cloned());

            let registry = chunk.dependency().clone();
            self.resolve_marked(&registry, &plan, &source).await?;
            self.sitcom.leave(&source);
        }

        let html = layout.render(
            &partials.join("\n"),
            &headings,
            &self.output.data,
            &self.dependency,
            &root,
        )?;

        Ok(Generated {
            html,
            headings,
            dependency: self.dependency.clone(),
            relocation: plan,
        })
    }

    /// Second pass: places every asset and replaces its token.
    pub fn relocate(&self, generated: &Generated) -> Relocated {
        let html = crate::relocate::relocate(
            &generated.html,
            &generated.dependency,
            &generated.relocation,
        );
        Relocated {
            html,
            outfile: generated.relocation.outfile().map(Path::to_path_buf),
        }
    }

    /// Generates, relocates and emits the page.
    ///
    /// Without an output file the page is printed and nothing is copied.
    /// Asset problems are reported, never fatal.
    pub async fn write(&mut self) -> Result<WriteReport> {
        let generated = self.generate().await?;
        let relocated = self.relocate(&generated);

        let Some(outfile) = relocated.outfile else {
            self.sitcom
                .console()
                .print_code(&relocated.html)
                .map_err(|err| Error::io("<console>", err))?;
            return Ok(WriteReport::default());
        };

        fs::write(&outfile, &relocated.html).await?;
        let mut advisories: Vec<String> = self
            .chunks
            .iter()
            .filter_map(|chunk| {
                self.advise(&AssetReport {
                    from: chunk.filename().to_path_buf(),
                    to: Some(outfile.clone()),
                    status: AssetStatus::Ok,
                })
            })
            .collect();

        let assets = if self.is_nested() {
            Vec::new()
        } else {
            self.materialize(&self.dependency.root()).await
        };
        advisories.extend(assets.iter().filter_map(|report| self.advise(report)));

        Ok(WriteReport {
            outfile: Some(outfile),
            assets,
            advisories,
        })
    }

    /// Schedules the markdown documents `registry` links to as nested bundles.
    ///
    /// Each entry is switched to its `.html` counterpart and placed. Outside a
    /// preview the source is compiled right away, unless it is `current`
    /// linking to itself or was compiled before.
    async fn resolve_marked(
        &self,
        registry: &Dependency,
        plan: &Relocation,
        current: &Path,
    ) -> Result<()> {
        for (_, entry) in registry.snapshot() {
            if entry.read().is_marked || !entry.is_markdown() {
                continue;
            }

            let source = normalize_path(&entry.from_path());
            {
                let mut asset = entry.borrow_mut();
                asset.from = source.with_extension("html");
                asset.is_marked = true;
                plan.place(&mut asset);
            }

            if plan.is_preview() || source.as_path() == current {
                continue;
            }

            let outfile = entry
                .read()
                .to
                .clone()
                .unwrap_or_else(|| source.with_extension("html"));
            self.compile_nested(source, outfile).await?;
        }
        Ok(())
    }

    async fn compile_nested(&self, source: PathBuf, outfile: PathBuf) -> Result<()> {
        if self.sitcom.is_finished(&source) {
            return Ok(());
        }
        log::debug!("nested bundle {} -> {}", source.display(), outfile.display());

        let input = InputOptions {
            input: Input::One(source.to_string_lossy().into_owned()),
            ..self.input.clone()
        };
        let mut nested = Bundle::make(
            self.sitcom.clone(),
            input,
            self.output.clone(),
            self.marked.clone(),
            &self.dependency,
            Some(outfile),
        )
        .await?;

        Box::pin(nested.write()).await?;
        Ok(())
    }

    /// Copies every static asset of `registry` to its destination, concurrently.
    async fn materialize(&self, registry: &Dependency) -> Vec<AssetReport> {
        let copies = registry
            .snapshot()
            .into_iter()
            .filter(|(_, entry)| !entry.read().is_marked)
            .map(|(_, entry)| {
                let (from, to) = {
                    let asset = entry.read();
                    (asset.from.clone(), asset.to.clone())
                };
                async move {
                    let status = copy_asset(&from, to.as_deref()).await;
                    AssetReport { from, to, status }
                }
            });

        join_all(copies).await
    }

    /// Logs the advisory line for `report` and returns it, unless silent.
    fn advise(&self, report: &AssetReport) -> Option<String> {
        if self.sitcom.is_silent() {
            return None;
        }
        let root = &self.input.root;
        let from = relative_path(root, &report.from).display().to_string();
        let to = report
            .to
            .as_ref()
            .map(|to| relative_path(root, to).display().to_string())
            .unwrap_or_default();

        let line = match &report.status {
            AssetStatus::Ok => format!("{from} => {to}    ok"),
            AssetStatus::NotFound => format!("{from} => {to}    not found"),
            AssetStatus::NotInWorkingDirectory => format!("{from}    not in working directory"),
            AssetStatus::Failed(message) => format!("{from} => {to}    failed: {message}"),
        };
        match report.status {
            AssetStatus::Ok => log::info!("{line}"),
            _ => log::warn!("{line}"),
        }
        Some(line)
    }
}

async fn copy_asset(from: &Path, to: Option<&Path>) -> AssetStatus {
    let Some(to) = to else {
        return AssetStatus::NotInWorkingDirectory;
    };
    if !fs::is_file(from).await {
        return AssetStatus::NotFound;
    }
    if from == to {
        return AssetStatus::Ok;
    }
    match fs::copy(from, to).await {
        Ok(()) => AssetStatus::Ok,
        Err(err) => AssetStatus::Failed(err.to_string()),
    }
}
