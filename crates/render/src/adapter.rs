//! Production hooks that register local assets and record the heading outline.
//!
//! Every local `href`/`src` met while rendering a document is resolved against
//! the document's directory, registered in the document's asset registry, and
//! replaced by the registry's placeholder token. Link and image titles written
//! in selector form (`#id.class[name=value]`) become attributes on the tag.

use crate::productions::{Productions, anchor_tag, heading_tag, image_tag};
use crate::types::{Heading, HeadingProduction, ImageProduction, LinkProduction};
use sitcom_core::paths::resolve;
use sitcom_core::{
    Dependency, MarkdownOptions, MarkupError, extract_custom_id, heading_id, is_selector,
    local_target, replace_local_dependency, selector_to_attrs,
};
use std::path::{Path, PathBuf};

/// Asset-registering productions for one document.
pub struct AssetProductions<'a> {
    dependency: &'a Dependency,
    base_dir: PathBuf,
    headings: Vec<Heading>,
}

impl<'a> AssetProductions<'a> {
    /// Creates productions registering into `dependency`, resolving references against `base_dir`.
    pub fn new(dependency: &'a Dependency, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            dependency,
            base_dir: base_dir.into(),
            headings: Vec::new(),
        }
    }

    /// Headings recorded so far, in encounter order.
    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    /// Consumes the productions and returns the heading outline.
    pub fn into_headings(self) -> Vec<Heading> {
        self.headings
    }

    /// Registers `href` when it is local and returns the text to emit in its place.
    pub fn add_to_imports(&self, href: &str) -> String {
        match local_target(href) {
            Some(target) => register(self.dependency, &self.base_dir, target),
            None => href.to_string(),
        }
    }
}

/// Resolves `target` against `base_dir`, registers it, and returns the token text.
pub fn register(dependency: &Dependency, base_dir: &Path, target: &str) -> String {
    let path = resolve(base_dir, target);
    dependency.register(&path.to_string_lossy()).to_string()
}

/// Removes a trailing `{#...}` marker from rendered heading HTML.
fn strip_marker(html: &str) -> &str {
    let trimmed = html.trim_end();
    match trimmed.rfind("{#") {
        Some(open) if trimmed.ends_with('}') => trimmed[..open].trim_end(),
        _ => html,
    }
}

/// Splits a title into selector attributes and the title left to render.
fn title_attrs(title: Option<&str>) -> Result<(String, Option<&str>), MarkupError> {
    match title {
        Some(title) if is_selector(title) => Ok((selector_to_attrs(title)?, None)),
        other => Ok((String::new(), other)),
    }
}

impl Productions for AssetProductions<'_> {
    fn heading(
        &mut self,
        heading: HeadingProduction<'_>,
        options: &MarkdownOptions,
    ) -> Result<String, MarkupError> {
        let (title, custom) = extract_custom_id(heading.raw);
        let id = heading_id(title, custom, options.header_ids, &options.header_prefix);
        let html = if custom.is_some() {
            strip_marker(heading.html)
        } else {
            heading.html
        };

        self.headings.push(Heading {
            level: heading.level,
            title: title.trim_end().to_string(),
            id: id.clone(),
        });

        Ok(heading_tag(heading.level, id.as_deref(), html))
    }

    fn link(
        &mut self,
        link: LinkProduction<'_>,
        _options: &MarkdownOptions,
    ) -> Result<String, MarkupError> {
        let href = self.add_to_imports(link.href);
        let (attrs, title) = title_attrs(link.title)?;
        Ok(anchor_tag(&attrs, &href, title, link.html))
    }

    fn image(
        &mut self,
        image: ImageProduction<'_>,
        options: &MarkdownOptions,
    ) -> Result<String, MarkupError> {
        let src = self.add_to_imports(image.src);
        let (attrs, title) = title_attrs(image.title)?;
        Ok(image_tag(&attrs, &src, title, image.alt, options.xhtml))
    }

    fn html(&mut self, html: &str) -> Result<String, MarkupError> {
        let dependency = self.dependency;
        let base_dir = self.base_dir.as_path();
        replace_local_dependency(html, |target| {
            Ok::<_, MarkupError>(register(dependency, base_dir, target))
        })
    }
}
