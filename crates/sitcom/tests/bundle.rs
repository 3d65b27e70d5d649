use sitcom::{
    AssetStatus, Console, Error, Input, MarkdownOptions, Outcome, OutputOptions, Plugin,
    PluginError, PluginList, Sitcom, SitcomOptions, Tokens, Wrap,
};
use std::fs;
use std::path::{Path, PathBuf};

fn write(root: &Path, name: &str, contents: &str) -> PathBuf {
    let path = root.join(name);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

fn options(root: &Path, input: &str, output: OutputOptions) -> SitcomOptions {
    SitcomOptions {
        input: Some(Input::from(input)),
        root: Some(root.to_path_buf()),
        silent: Some(true),
        output,
        ..Default::default()
    }
}

fn output(file: Option<&str>, dist: Option<&str>) -> OutputOptions {
    OutputOptions {
        file: file.map(PathBuf::from),
        dist: dist.map(PathBuf::from),
        ..Default::default()
    }
}

#[tokio::test]
async fn linked_markdown_becomes_its_own_page() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "doc.md", "# Doc\n\nRead [the other one](other.md).\n");
    write(root, "other.md", "# Other\n\nBack to [the doc](https://example.com).\n");

    let sitcom = Sitcom::with_console(Console::memory());
    let mut bundle = sitcom
        .make(options(root, "doc.md", output(None, Some("build"))))
        .await
        .unwrap();
    let report = bundle.write().await.unwrap();

    assert_eq!(report.outfile, Some(root.join("build/doc.html")));
    assert!(report.assets.is_empty());

    let page = fs::read_to_string(root.join("build/doc.html")).unwrap();
    assert!(page.contains(r#"<a href="other.html">the other one</a>"#));
    assert!(!page.contains("sitcom-asset-"));

    let other = fs::read_to_string(root.join("build/other.html")).unwrap();
    assert!(other.contains("Other</h1>"));
    assert!(other.contains(r#"href="https://example.com""#));
    assert!(sitcom.console().contents().is_empty());
}

#[tokio::test]
async fn preview_prints_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "a.md", "![x](img.png)\n\nSee [b](b.md).\n");
    write(root, "img.png", "png");

    let sitcom = Sitcom::with_console(Console::memory());
    let mut bundle = sitcom
        .make(options(root, "a.md", OutputOptions::default()))
        .await
        .unwrap();
    let report = bundle.write().await.unwrap();

    assert_eq!(report.outfile, None);
    assert!(report.assets.is_empty());

    let printed = sitcom.console().contents();
    assert!(printed.starts_with("\nPrint content to stdout\n"));
    assert!(printed.contains(r#"src="./img.png""#));
    assert!(printed.contains(r#"href="./b.html""#));
    assert!(!root.join("a.html").exists());
    assert!(!root.join("b.html").exists());
}

#[tokio::test]
async fn assets_are_copied_next_to_the_page() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "doc.md", "![logo](img.png)\n");
    write(root, "img.png", "\u{1}\u{2}\u{3}");

    let sitcom = Sitcom::with_console(Console::memory());
    let mut bundle = sitcom
        .make(options(root, "doc.md", output(Some("out.html"), Some("build"))))
        .await
        .unwrap();
    let report = bundle.write().await.unwrap();

    let page = fs::read_to_string(root.join("build/out.html")).unwrap();
    assert!(page.contains(r#"<img src="img.png" alt="logo">"#));
    assert_eq!(
        fs::read(root.join("build/img.png")).unwrap(),
        fs::read(root.join("img.png")).unwrap()
    );
    assert_eq!(report.status_of(&root.join("img.png")), Some(&AssetStatus::Ok));
    assert!(report.advisories.is_empty());
}

#[tokio::test]
async fn advisories_cover_the_page_and_its_assets() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "doc.md", "![logo](img.png)\n");
    write(root, "img.png", "png");

    let sitcom = Sitcom::with_console(Console::memory());
    let mut bundle = sitcom
        .make(SitcomOptions {
            silent: Some(false),
            ..options(root, "doc.md", output(Some("out.html"), Some("build")))
        })
        .await
        .unwrap();
    let report = bundle.write().await.unwrap();

    assert_eq!(
        report.advisories,
        vec![
            "doc.md => build/out.html    ok".to_string(),
            "img.png => build/img.png    ok".to_string(),
        ]
    );
}

#[tokio::test]
async fn asset_problems_are_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let site = dir.path().join("site");
    write(dir.path(), "outside.png", "png");
    write(&site, "doc.md", "![gone](missing.png) ![far](../outside.png)\n");

    let sitcom = Sitcom::with_console(Console::memory());
    let mut bundle = sitcom
        .make(options(&site, "doc.md", output(Some("doc.html"), None)))
        .await
        .unwrap();
    let report = bundle.write().await.unwrap();

    assert_eq!(
        report.status_of(&site.join("missing.png")),
        Some(&AssetStatus::NotFound)
    );
    assert_eq!(
        report.status_of(&dir.path().join("outside.png")),
        Some(&AssetStatus::NotInWorkingDirectory)
    );

    assert!(report.advisories.is_empty());

    let page = fs::read_to_string(site.join("doc.html")).unwrap();
    assert!(page.contains(r#"src="missing.png""#));
    assert!(page.contains(r#"src="../outside.png""#));
}

#[tokio::test]
async fn asset_problems_are_advised_unless_silent() {
    let dir = tempfile::tempdir().unwrap();
    let site = dir.path().join("site");
    write(dir.path(), "outside.png", "png");
    write(&site, "doc.md", "![gone](missing.png) ![far](../outside.png)\n");

    let sitcom = Sitcom::with_console(Console::memory());
    let mut bundle = sitcom
        .make(SitcomOptions {
            silent: Some(false),
            ..options(&site, "doc.md", output(Some("doc.html"), None))
        })
        .await
        .unwrap();
    let report = bundle.write().await.unwrap();

    assert_eq!(
        report.advisories,
        vec![
            "doc.md => doc.html    ok".to_string(),
            "missing.png => missing.png    not found".to_string(),
            "../outside.png    not in working directory".to_string(),
        ]
    );
}

#[tokio::test]
async fn documents_are_wrapped_and_merged_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "one.md", "# One\n");
    write(root, "two.md", "# Two\n");

    let mut output = output(Some("all.html"), None);
    output.intro = Some(Wrap::from("<section>"));
    output.outro = Some(Wrap::from("</section>"));

    let sitcom = Sitcom::with_console(Console::memory());
    let mut bundle = sitcom
        .make(SitcomOptions {
            input: Some(Input::from(vec!["one.md", "two.md"])),
            root: Some(root.to_path_buf()),
            silent: Some(true),
            output,
            ..Default::default()
        })
        .await
        .unwrap();
    bundle.write().await.unwrap();

    let page = fs::read_to_string(root.join("all.html")).unwrap();
    let one = page.find("<section><h1 id=\"One\">One</h1>").unwrap();
    let two = page.find("<section><h1 id=\"Two\">Two</h1>").unwrap();
    assert!(one < two);
    assert!(page.contains(r##"<a href="#One">One</a>"##));
    assert!(page.contains(r##"<a href="#Two">Two</a>"##));
}

#[tokio::test]
async fn linked_sibling_entry_gets_its_own_page() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "one.md", "See [two](two.md).\n");
    write(root, "two.md", "# Two\n");

    let sitcom = Sitcom::with_console(Console::memory());
    let mut bundle = sitcom
        .make(SitcomOptions {
            input: Some(Input::from(vec!["one.md", "two.md"])),
            ..options(root, "one.md", output(Some("all.html"), Some("build")))
        })
        .await
        .unwrap();
    bundle.write().await.unwrap();

    let page = fs::read_to_string(root.join("build/all.html")).unwrap();
    assert!(page.contains(r#"<p>See <a href="two.html">two</a>.</p>"#));
    assert!(page.contains("Two</h1>"));

    let two = fs::read_to_string(root.join("build/two.html")).unwrap();
    assert!(two.contains("Two</h1>"));
}

#[tokio::test]
async fn self_link_is_relocated_without_recompiling() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "doc.md", "# Doc\n\n[top](doc.md)\n");

    let sitcom = Sitcom::with_console(Console::memory());
    let mut bundle = sitcom
        .make(options(root, "doc.md", output(None, Some("build"))))
        .await
        .unwrap();
    bundle.write().await.unwrap();

    let page = fs::read_to_string(root.join("build/doc.html")).unwrap();
    assert!(page.contains(r#"<a href="doc.html">top</a>"#));
}

#[tokio::test]
async fn markdown_documents_linking_each_other_are_a_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "a.md", "[b](b.md)\n");
    write(root, "b.md", "[a](a.md)\n");

    let sitcom = Sitcom::with_console(Console::memory());
    let mut bundle = sitcom
        .make(options(root, "a.md", output(None, Some("build"))))
        .await
        .unwrap();
    let err = bundle.write().await.unwrap_err();
    match err {
        Error::Cycle { path } => assert_eq!(path, root.join("a.md")),
        other => panic!("expected a cycle, got {other:?}"),
    }
}

struct Passing;
impl Plugin for Passing {
    fn name(&self) -> Option<&str> {
        Some("passing")
    }
}

struct Rejecting;
impl Plugin for Rejecting {
    fn transform(&self, _html: &str) -> Outcome {
        Outcome::rejected("boom")
    }
}

struct WrongKind;
impl Plugin for WrongKind {
    fn name(&self) -> Option<&str> {
        Some("wrong-kind")
    }
    fn tokenize(&self, _tokens: &Tokens) -> Outcome {
        Outcome::Html(String::new())
    }
}

fn with_plugin(root: &Path, plugin: impl Plugin + 'static) -> SitcomOptions {
    let mut plugins = PluginList::new();
    plugins.push(plugin);
    SitcomOptions {
        plugins,
        ..options(root, "doc.md", OutputOptions::default())
    }
}

#[tokio::test]
async fn passing_plugin_leaves_tokens_alone() {
    let dir = tempfile::tempdir().unwrap();
    let source = "# Title\n\n- a\n- b\n";
    write(dir.path(), "doc.md", source);

    let sitcom = Sitcom::with_console(Console::memory());
    let bundle = sitcom.make(with_plugin(dir.path(), Passing)).await.unwrap();

    let expected = sitcom_core::tokenize(source, &MarkdownOptions::default()).unwrap();
    assert_eq!(bundle.chunks()[0].tokens(), &expected);
}

#[tokio::test]
async fn rejected_plugin_aborts_the_write() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "doc.md", "text\n");

    let sitcom = Sitcom::with_console(Console::memory());
    let mut bundle = sitcom.make(with_plugin(dir.path(), Rejecting)).await.unwrap();
    let err = bundle.write().await.unwrap_err();

    assert!(matches!(
        err,
        Error::Plugin(PluginError::Rejected { ref plugin, .. }) if plugin == "anonymous"
    ));
    assert!(sitcom.console().contents().is_empty());
}

#[tokio::test]
async fn wrong_outcome_names_the_plugin() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "doc.md", "text\n");

    let sitcom = Sitcom::with_console(Console::memory());
    let err = sitcom
        .make(with_plugin(dir.path(), WrongKind))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Bad tokenize for plugin wrong-kind");
}
