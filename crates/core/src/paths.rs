//! Lexical path helpers. None of these touch the file system.

use std::path::{Component, Path, PathBuf};

/// Canonicalise `.` and `..` path segments.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            Component::CurDir => {}
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Joins `target` onto `base` unless it is already absolute, then normalizes.
pub fn resolve(base: &Path, target: impl AsRef<Path>) -> PathBuf {
    normalize_path(&base.join(target))
}

/// Relative path from directory `from` to `to`.
///
/// Both paths should be absolute and normalized. An empty result is `.`.
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from_components: Vec<_> = from.components().collect();
    let to_components: Vec<_> = to.components().collect();

    let mut common = 0usize;
    while common < from_components.len()
        && common < to_components.len()
        && from_components[common] == to_components[common]
    {
        common += 1;
    }

    let mut result = PathBuf::new();
    for component in from_components.iter().skip(common) {
        match component {
            Component::RootDir | Component::Prefix(_) | Component::CurDir => {}
            _ => result.push(".."),
        }
    }
    for component in to_components.iter().skip(common) {
        if !matches!(component, Component::CurDir) {
            result.push(component.as_os_str());
        }
    }

    if result.as_os_str().is_empty() {
        result.push(".");
    }
    result
}

/// Renders a path with `/` separators for use in HTML.
pub fn to_url_path(path: &Path) -> String {
    path.components()
        .map(|component| match component {
            Component::RootDir => String::new(),
            other => other.as_os_str().to_string_lossy().into_owned(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// True when `path` is `root` or lies below it.
pub fn is_within(root: &Path, path: &Path) -> bool {
    path.starts_with(root)
}
