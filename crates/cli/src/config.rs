//! Config file loading.

use anyhow::{Context, Result, bail};
use serde_json::Value;
use sitcom::SitcomOptions;
use std::path::{Path, PathBuf};

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG: &str = ".sitcomrc.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn of(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            other => bail!("unsupported config extension \"{other}\""),
        }
    }

    fn parse(self, text: &str) -> Result<Value> {
        Ok(match self {
            Format::Json => serde_json::from_str(text)?,
            Format::Yaml => serde_yaml::from_str(text)?,
        })
    }
}

/// Reads the config named on the command line, or the default one if present.
///
/// A missing default file yields empty options. A missing explicit file is an error.
pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<SitcomOptions> {
    match explicit {
        Some(path) => read_config(&cwd.join(path)),
        None => {
            let path = cwd.join(DEFAULT_CONFIG);
            if path.is_file() {
                read_config(&path)
            } else {
                Ok(SitcomOptions::default())
            }
        }
    }
}

/// Parses a config file into options.
///
/// A path without an extension tries `.json`, then `.yaml`.
pub fn read_config(path: &Path) -> Result<SitcomOptions> {
    let (path, format) = if path.extension().is_none() {
        candidates(path)
            .into_iter()
            .find(|(candidate, _)| candidate.is_file())
            .with_context(|| format!("no config file found for {}", path.display()))?
    } else {
        (path.to_path_buf(), Format::of(path)?)
    };

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let value = format
        .parse(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))?;

    if !value.is_object() {
        bail!("bad config type \"{}\" in {}", kind(&value), path.display());
    }
    log::debug!("loaded config {}", path.display());
    serde_json::from_value(value).with_context(|| format!("invalid config {}", path.display()))
}

fn candidates(path: &Path) -> [(PathBuf, Format); 2] {
    [
        (path.with_extension("json"), Format::Json),
        (path.with_extension("yaml"), Format::Yaml),
    ]
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitcom::Input;

    #[test]
    fn reads_json_and_yaml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("site.json"),
            r#"{ "input": "index.md", "output": { "dist": "public" } }"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("site.yml"),
            "input:\n  - a.md\n  - b.md\nsilent: true\n",
        )
        .unwrap();

        let json = read_config(&dir.path().join("site.json")).unwrap();
        assert_eq!(json.input, Some(Input::from("index.md")));
        assert_eq!(json.output.dist, Some(PathBuf::from("public")));

        let yaml = read_config(&dir.path().join("site.yml")).unwrap();
        assert_eq!(yaml.input, Some(Input::from(vec!["a.md", "b.md"])));
        assert_eq!(yaml.silent, Some(true));
    }

    #[test]
    fn bare_name_prefers_json_then_yaml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rc.yaml"), "input: from-yaml.md\n").unwrap();
        let options = read_config(&dir.path().join("rc")).unwrap();
        assert_eq!(options.input, Some(Input::from("from-yaml.md")));

        std::fs::write(dir.path().join("rc.json"), r#"{ "input": "from-json.md" }"#).unwrap();
        let options = read_config(&dir.path().join("rc")).unwrap();
        assert_eq!(options.input, Some(Input::from("from-json.md")));
    }

    #[test]
    fn rejects_unknown_extensions_and_non_objects() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rc.toml"), "input = 'a.md'").unwrap();
        std::fs::write(dir.path().join("list.json"), "[1, 2]").unwrap();

        let err = read_config(&dir.path().join("rc.toml")).unwrap_err();
        assert_eq!(err.to_string(), "unsupported config extension \"toml\"");

        let err = read_config(&dir.path().join("list.json")).unwrap_err();
        assert!(err.to_string().starts_with("bad config type \"array\""));
    }

    #[test]
    fn default_config_is_optional_but_explicit_is_not() {
        let dir = tempfile::tempdir().unwrap();
        let options = load(None, dir.path()).unwrap();
        assert!(options.input.is_none());

        assert!(load(Some(Path::new("missing.json")), dir.path()).is_err());

        std::fs::write(dir.path().join(DEFAULT_CONFIG), r#"{ "root": "docs" }"#).unwrap();
        let options = load(None, dir.path()).unwrap();
        assert_eq!(options.root, Some(PathBuf::from("docs")));
    }
}
