//! Page layout: the template merged documents are rendered into.

use crate::error::{Error, Result};
use crate::fs;
use minijinja::syntax::SyntaxConfig;
use minijinja::{Environment, Value};
use serde_json::Map;
use sitcom_core::Dependency;
use sitcom_core::paths::resolve;
use sitcom_core::replace_local_dependency;
use sitcom_render::Heading;
use sitcom_render::adapter::register;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Page used when no layout is configured or the configured one is missing.
pub const DEFAULT_TEMPLATE: &str = r##"<!doctype html>
<html lang="{{ lang }}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{{ title }}</title>
<style>
body{font:16px/1.5 Helvetica,Arial,Verdana,sans-serif;margin:0 auto;padding:1rem;max-width:960px}
nav{position:fixed;top:1rem;right:-4px;border:4px solid rgba(0,0,0,.1);background:#fff;padding:.5rem}
nav a{display:block;text-decoration:none}
pre,code{font-family:Monaco,Courier,monospace}
blockquote{padding:1rem 2rem;margin:2rem 0;border-left:4px solid #ddd;background:#f8f8f8;color:#777}
</style>
</head>
<body>
<nav>
{%- for h in headings %}
<a href="#{{ h.id }}">{{ h.title|escape }}</a>
{%- endfor %}
</nav>
{{ content }}
</body>
</html>
"##;

/// A loaded layout template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    dir: Option<PathBuf>,
    template: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            dir: None,
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl Layout {
    /// Loads `layout`: a directory holding `index.html`, or a template file.
    pub async fn load(layout: Option<&Path>, root: &Path) -> Result<Self> {
        let Some(layout) = layout else {
            return Ok(Self::default());
        };

        let path = resolve(root, layout);
        let (dir, file) = if fs::is_dir(&path).await {
            let file = path.join("index.html");
            (path, file)
        } else {
            let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            (dir, path)
        };

        let template = match fs::read_if_exists(&file).await? {
            Some(template) => template,
            None => {
                log::debug!("layout {} not found, using the default page", file.display());
                DEFAULT_TEMPLATE.to_string()
            }
        };

        Ok(Self {
            dir: Some(dir),
            template,
        })
    }

    /// Directory the layout's own assets are resolved against.
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Raw template text.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Renders the page.
    ///
    /// Local references in the template are registered in `registry`. The
    /// merged `content` is rendered with `data` first, with `{{ name }}`
    /// substitutions only, then the page is rendered with `content`,
    /// `headings` and `data`.
    pub fn render(
        &self,
        content: &str,
        headings: &[Heading],
        data: &Map<String, serde_json::Value>,
        registry: &Dependency,
        root: &Path,
    ) -> Result<String> {
        let base = self.dir.as_deref().unwrap_or(root);
        let template = replace_local_dependency(&self.template, |src| {
            Ok::<_, Error>(register(registry, base, src))
        })?;

        let mut ctx: BTreeMap<String, Value> = data
            .iter()
            .map(|(key, value)| (key.clone(), Value::from_serialize(value)))
            .collect();
        let content = content_environment()?.render_str(content, &ctx)?;

        ctx.insert("content".into(), Value::from_safe_string(content));
        ctx.insert("headings".into(), Value::from_serialize(headings));
        Ok(Environment::new().render_str(&template, &ctx)?)
    }
}

/// Environment for document content: blocks and comments use delimiters that
/// never occur in rendered markdown, so `{%` and `{#` stay plain text.
fn content_environment() -> Result<Environment<'static>> {
    let syntax = SyntaxConfig::builder()
        .block_delimiters("\u{1}%", "%\u{1}")
        .comment_delimiters("\u{1}#", "#\u{1}")
        .build()?;
    let mut env = Environment::new();
    env.set_syntax(syntax);
    Ok(env)
}
