use std::fs;

use super::*;

const DENGI_TEXT: &str = "\u{feff}電気設備に関する技術基準を定める省令\n目次\n第一章　総則\n附則\n第一章　総則\n（定義）\n第一条　この省令において、電路とは通常の使用状態で電気が通じているところをいう。\n第二条　電路は、大地から絶縁しなければならない。\n";

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn paths_for(root: &Path) -> BuildPaths {
    BuildPaths::from_args(&BuildArgs {
        root: root.to_path_buf(),
        content_dir: PathBuf::from("content"),
        data_dir: PathBuf::from("data"),
        templates_dir: PathBuf::from("templates"),
        images_dir: PathBuf::from("images"),
        output_dir: PathBuf::from("docs"),
        manifest_path: None,
        clean: false,
    })
}

fn seed_site(root: &Path) {
    write(
        &root.join("data/site.json"),
        r#"{"site_name":"テストサイト","description":"試験用","version":"1.0.0"}"#,
    );
    write(
        &root.join("data/terms.json"),
        r#"{"terms":[{"word":"電路","link":"terms/circuit.html"}]}"#,
    );
    write(
        &root.join("templates/base.html"),
        "<html><head><title>{{page_title}} | {{site_name}}</title><link rel=\"stylesheet\" href=\"{{css_path}}\"></head><body>{{content}}</body></html>",
    );
    write(
        &root.join("templates/article.html"),
        "{{extends base.html}}\n{{block content}}\n<article>{{content}}</article>\n{{endblock}}",
    );
    write(
        &root.join("content/guide/grounding.md"),
        "---\ntitle: 接地\n---\n電路の接地について説明する。\n",
    );
    write(&root.join("content/standards/dengi/01.txt"), DENGI_TEXT);
    write(&root.join("images/icons/logo.svg"), "<svg/>");
}

#[test]
fn builds_markdown_statutes_images_and_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    seed_site(root);

    let paths = paths_for(root);
    let manifest = build_site(&paths).unwrap();

    let page = fs::read_to_string(root.join("docs/guide/grounding.html")).unwrap();
    assert!(page.contains("<title>接地 | テストサイト</title>"));
    assert!(page.contains(r#"href="../css/style.css""#));
    assert!(page.contains(
        r#"<article><p><a href="../terms/circuit.html" class="auto-link">電路</a>の接地について"#
    ));

    let statute = fs::read_to_string(root.join("docs/standards/index.html")).unwrap();
    assert!(statute.contains(r#"id="article1""#));
    assert!(statute.contains(r#"href="../coming-soon.html""#));
    assert!(statute.contains("&copy;"));
    assert!(statute.contains("テストサイト"));
    assert!(!statute.contains("電気設備に関する技術基準を定める省令</p>"));

    assert!(root.join("docs/images/icons/logo.svg").is_file());

    assert_eq!(manifest.counts.markdown_files, 1);
    assert_eq!(manifest.counts.statute_pages, 1);
    assert_eq!(manifest.counts.images_copied, 1);
    assert_eq!(manifest.counts.glossary_terms, 1);
    assert_eq!(manifest.counts.templates, 2);
    assert_eq!(manifest.statutes[0].id, "dengi");
    assert_eq!(manifest.statutes[0].counts.articles, 2);
    assert_eq!(manifest.statutes[0].sources.len(), 1);
    assert_eq!(manifest.statutes[0].sources[0].sha256.len(), 64);
    assert!(manifest.errors.is_empty());
    assert!(manifest.warnings.is_empty(), "{:?}", manifest.warnings);
    assert_eq!(manifest.status, "completed");

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&paths.manifest_path).unwrap()).unwrap();
    assert_eq!(written["status"], "completed");
    assert_eq!(written["counts"]["statute_pages"], 1);
}

#[test]
fn missing_site_config_falls_back_to_defaults_with_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(&root.join("content/index.md"), "# トップ\n");

    let manifest = build_site(&paths_for(root)).unwrap();

    let page = fs::read_to_string(root.join("docs/index.html")).unwrap();
    assert_eq!(page, "<h1 id=\"トップ\">トップ</h1>\n");
    assert!(
        manifest
            .warnings
            .iter()
            .any(|warning| warning.contains("site config not found"))
    );
    assert_eq!(manifest.counts.images_copied, 0);
    assert_eq!(manifest.status, "completed_with_warnings");
}

#[test]
fn malformed_glossary_stops_the_build() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(&root.join("data/terms.json"), "{\"terms\": [");

    let err = build_site(&paths_for(root)).unwrap_err();

    assert!(format!("{err:#}").contains("terms.json"));
    assert!(!root.join(".cache/build_manifest.json").exists());
}

#[test]
fn statute_list_uses_configured_file_order_and_dialect() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        &root.join("data/statutes.json"),
        r#"{"statutes":[{"id":"kaishaku","dialect":"arabic","source_dir":"law","files":["b.txt","a.txt"],"output":"law/index.html","title":"解釈"}]}"#,
    );
    write(&root.join("law/a.txt"), "第2条 後半の条文\n");
    write(&root.join("law/b.txt"), "第1章 総則\n第1条 前半の条文\n");

    let manifest = build_site(&paths_for(root)).unwrap();

    let html = fs::read_to_string(root.join("docs/law/index.html")).unwrap();
    let first = html.find(r#"id="article1""#).unwrap();
    let second = html.find(r#"id="article2""#).unwrap();
    assert!(first < second);
    assert_eq!(manifest.statutes[0].counts.articles, 2);
    assert_eq!(manifest.statutes[0].counts.chapters, 1);
    assert!(manifest.statutes[0].sources[0].path.ends_with("b.txt"));
}

#[test]
fn images_are_replaced_not_merged() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(&root.join("docs/images/stale.png"), "old");
    write(&root.join("images/new.png"), "new");

    let manifest = build_site(&paths_for(root)).unwrap();

    assert!(!root.join("docs/images/stale.png").exists());
    assert!(root.join("docs/images/new.png").is_file());
    assert_eq!(manifest.counts.images_copied, 1);
}

#[test]
fn source_files_default_to_sorted_text_files() {
    let dir = tempfile::tempdir().unwrap();
    let source_dir = dir.path().join("dengi");
    write(&source_dir.join("02.txt"), "b");
    write(&source_dir.join("01.txt"), "a");
    write(&source_dir.join("notes.md"), "c");

    let spec = StatuteSpec {
        id: "dengi".to_string(),
        dialect: crate::statute::grammar::DialectKind::Kanji,
        source_dir: source_dir.clone(),
        files: None,
        output: PathBuf::from("standards/index.html"),
        title: "電気設備技術基準".to_string(),
        description: String::new(),
        optional_source: false,
    };

    let files = statute_source_files(&spec).unwrap();

    assert_eq!(files, vec![source_dir.join("01.txt"), source_dir.join("02.txt")]);
}

#[test]
fn missing_glossary_and_templates_are_warnings_but_missing_builtin_sources_are_not() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(&root.join("data/site.json"), r#"{"site_name":"テストサイト"}"#);

    let manifest = build_site(&paths_for(root)).unwrap();

    assert_eq!(manifest.warnings.len(), 2, "{:?}", manifest.warnings);
    assert!(manifest.warnings[0].contains("terms.json"));
    assert!(manifest.warnings[1].contains("no templates found"));
    assert!(
        !manifest
            .warnings
            .iter()
            .any(|warning| warning.contains("dengi") || warning.contains("kaishaku"))
    );
    assert!(manifest.errors.is_empty());
    assert_eq!(manifest.status, "completed_with_warnings");
    assert!(manifest.statutes.is_empty());
}

#[test]
fn configured_statute_with_missing_sources_is_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        &root.join("data/statutes.json"),
        r#"{"statutes":[{"id":"kaishaku","dialect":"arabic","source_dir":"missing","output":"law/index.html","title":"解釈"}]}"#,
    );

    let manifest = build_site(&paths_for(root)).unwrap();

    assert!(
        manifest
            .warnings
            .iter()
            .any(|warning| warning.contains("statute kaishaku") && warning.contains("not found"))
    );
    assert!(manifest.statutes.is_empty());
}

#[test]
fn one_unreadable_page_is_a_warning_and_the_rest_still_render() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    seed_site(root);
    write(&root.join("content/guide/earthing.md"), "# 接地抵抗\n");
    let broken = root.join("content/guide/broken.md");
    fs::write(&broken, [0x23_u8, 0x20, 0xff, 0xfe, 0x0a]).unwrap();

    let manifest = build_site(&paths_for(root)).unwrap();

    assert!(root.join("docs/guide/earthing.html").is_file());
    assert!(root.join("docs/guide/grounding.html").is_file());
    assert!(!root.join("docs/guide/broken.html").exists());

    let page_warnings: Vec<_> = manifest
        .warnings
        .iter()
        .filter(|warning| warning.contains("broken.md"))
        .collect();
    assert_eq!(page_warnings.len(), 1);
    assert_eq!(manifest.counts.markdown_files, 2);
    assert!(manifest.errors.is_empty());
    assert_eq!(manifest.status, "completed_with_warnings");
}
