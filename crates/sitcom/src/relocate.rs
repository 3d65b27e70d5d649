//! Second pass: placing assets in the output tree and substituting tokens.
//!
//! Rendering leaves a placeholder token wherever a local asset is referenced.
//! Once the output file of a bundle is fixed, every registry entry gets its
//! `via` (path below the output root) and `to` (destination), and each token
//! is replaced with a real path.

use sitcom_core::paths::{is_within, normalize_path, relative_path, resolve, to_url_path};
use sitcom_core::{AssetEntry, Dependency};
use std::path::{Path, PathBuf};

/// Output tree geometry for one bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    root: PathBuf,
    dist: PathBuf,
    layout_dir: Option<PathBuf>,
    outfile: Option<PathBuf>,
}

impl Relocation {
    /// Creates the geometry; `outfile` is `None` when printing to the console.
    pub fn new(
        root: impl Into<PathBuf>,
        dist: impl Into<PathBuf>,
        layout_dir: Option<PathBuf>,
        outfile: Option<PathBuf>,
    ) -> Self {
        Self {
            root: root.into(),
            dist: dist.into(),
            layout_dir,
            outfile,
        }
    }

    /// The working root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The output file, if any.
    pub fn outfile(&self) -> Option<&Path> {
        self.outfile.as_deref()
    }

    /// True when no output file exists and HTML goes to the console.
    pub fn is_preview(&self) -> bool {
        self.outfile.is_none()
    }

    /// Computes `via` and `to` for `entry`.
    ///
    /// Sources outside the working root get neither.
    pub fn place(&self, entry: &mut AssetEntry) {
        let from = normalize_path(&entry.from);

        if !is_within(&self.root, &from) {
            entry.via = None;
            entry.to = None;
            entry.from = from;
            return;
        }

        let base = match &self.layout_dir {
            Some(dir) if *dir != self.root && is_within(dir, &from) => dir,
            _ => &self.root,
        };
        let via = format!("./{}", to_url_path(&relative_path(base, &from)));

        entry.to = Some(resolve(&self.dist, &via));
        entry.via = Some(via);
        entry.from = from;
    }

    /// The text a placed entry's token is replaced with.
    pub fn replacement(&self, entry: &AssetEntry) -> String {
        match (&self.outfile, &entry.to, &entry.via) {
            (Some(outfile), to, _) => {
                let target = to.as_ref().unwrap_or(&entry.from);
                let dir = outfile.parent().unwrap_or(self.root.as_path());
                to_url_path(&relative_path(dir, target))
            }
            (None, _, Some(via)) => via.clone(),
            (None, _, None) => to_url_path(&entry.from),
        }
    }
}

/// Places every entry of `registry` and replaces its token in `html`.
pub fn relocate(html: &str, registry: &Dependency, plan: &Relocation) -> String {
    let mut html = html.to_string();
    registry.for_each(|token, entry| {
        let replacement = {
            let mut entry = entry.borrow_mut();
            plan.place(&mut entry);
            plan.replacement(&entry)
        };
        if html.contains(token.as_str()) {
            log::debug!("relocate {token} -> {replacement}");
            html = token.substitute(&html, &replacement);
        }
    });
    html
}
