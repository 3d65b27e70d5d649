//! Output options and output file resolution.

use crate::input::Input;
use crate::wrap::Wrap;
use serde::Deserialize;
use serde_json::{Map, Value};
use sitcom_core::paths::{relative_path, resolve};
use std::path::{Path, PathBuf};

/// Where and how a bundle is written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputOptions {
    /// Inserted before every document.
    pub intro: Option<Wrap>,
    /// Inserted after every document.
    pub outro: Option<Wrap>,
    /// Output file, relative to `dist` when both are set.
    pub file: Option<PathBuf>,
    /// Output root directory.
    pub dist: Option<PathBuf>,
    /// Layout directory (holding `index.html`) or template file.
    pub layout: Option<PathBuf>,
    /// Template data.
    pub data: Map<String, Value>,
}

impl OutputOptions {
    /// The output root: `dist` resolved against `root`, or `root` itself.
    pub fn dist_dir(&self, root: &Path) -> PathBuf {
        match &self.dist {
            Some(dist) => resolve(root, dist),
            None => root.to_path_buf(),
        }
    }
}

/// Decides the output file of a bundle, if it has one.
///
/// * `file` and `dist`: `dist/file`
/// * `file` only: `root/file`
/// * `dist` only and a single entry: the entry's path below `dist`, with an `.html` extension
/// * otherwise none, and the bundle prints to the console
pub fn resolve_output_file(input: &Input, output: &OutputOptions, root: &Path) -> Option<PathBuf> {
    match (&output.file, &output.dist) {
        (Some(file), Some(_)) => Some(resolve(&output.dist_dir(root), file)),
        (Some(file), None) => Some(resolve(root, file)),
        (None, Some(_)) => {
            let entry = input.as_scalar()?;
            let relative = relative_path(root, &resolve(root, entry));
            Some(resolve(&output.dist_dir(root), relative.with_extension("html")))
        }
        (None, None) => None,
    }
}
