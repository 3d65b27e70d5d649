//! Entry specification and its resolution to concrete source files.

use serde::Deserialize;
use sitcom_core::paths::resolve;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One entry path, or a list of entries (nested lists are flattened).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Input {
    /// A single path or mapping name.
    One(String),
    /// Several entries.
    Many(Vec<Input>),
}

/// Named entries, each expanding to one or more files.
pub type InputMapping = BTreeMap<String, Input>;

impl Input {
    /// True when nothing is named.
    pub fn is_empty(&self) -> bool {
        match self {
            Input::One(path) => path.trim().is_empty(),
            Input::Many(list) => list.iter().all(Input::is_empty),
        }
    }

    /// The entry text when this is a single entry.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Input::One(path) => Some(path),
            Input::Many(_) => None,
        }
    }

    fn append(&self, root: &Path, files: &mut Vec<PathBuf>) {
        match self {
            Input::One(path) => files.push(resolve(root, path)),
            Input::Many(list) => list.iter().for_each(|input| input.append(root, files)),
        }
    }
}

impl From<&str> for Input {
    fn from(path: &str) -> Self {
        Input::One(path.to_string())
    }
}

impl From<String> for Input {
    fn from(path: String) -> Self {
        Input::One(path)
    }
}

impl<T: Into<Input>> From<Vec<T>> for Input {
    fn from(list: Vec<T>) -> Self {
        Input::Many(list.into_iter().map(Into::into).collect())
    }
}

/// Expands `input` into absolute source files, in order.
///
/// A scalar entry naming a key of `mapping` expands to that key's files.
pub fn input_files(input: &Input, mapping: &InputMapping, root: &Path) -> Vec<PathBuf> {
    let source = match input {
        Input::One(name) => mapping.get(name).unwrap_or(input),
        Input::Many(_) => input,
    };

    let mut files = Vec::new();
    source.append(root, &mut files);
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_and_nested_lists_resolve_against_root() {
        let root = Path::new("/site");
        let input = Input::Many(vec!["a.md".into(), Input::from(vec!["b/c.md", "../d.md"])]);
        assert_eq!(
            input_files(&input, &InputMapping::new(), root),
            vec![
                PathBuf::from("/site/a.md"),
                PathBuf::from("/site/b/c.md"),
                PathBuf::from("/d.md"),
            ]
        );
    }

    #[test]
    fn mapping_names_expand() {
        let mut mapping = InputMapping::new();
        mapping.insert("guide".into(), Input::from(vec!["intro.md", "usage.md"]));
        let files = input_files(&"guide".into(), &mapping, Path::new("/site"));
        assert_eq!(
            files,
            vec![PathBuf::from("/site/intro.md"), PathBuf::from("/site/usage.md")]
        );
    }

    #[test]
    fn deserializes_strings_and_lists() {
        let input: Input = serde_json::from_str(r#"["a.md", ["b.md"]]"#).unwrap();
        assert_eq!(input, Input::from(vec![Input::from("a.md"), Input::from(vec!["b.md"])]));
        assert!(Input::from(Vec::<String>::new()).is_empty());
        assert!(!Input::from("a.md").is_empty());
    }
}
