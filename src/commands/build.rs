use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::cli::BuildArgs;
use crate::linker::{AutoLinker, DEFAULT_OUTPUT_ROOT};
use crate::model::{
    BuildCounts, BuildManifest, SiteConfig, SourceHash, StatuteOutcome, StatuteSpec, StatutesFile,
};
use crate::site::markdown::MarkdownConverter;
use crate::site::template::{RenderContext, TemplateEngine};
use crate::site::{Glossary, load_glossary, load_site_config};
use crate::statute::assemble::PageMeta;
use crate::statute::{StatuteRenderer, read_sources};
use crate::util::{
    ensure_directory, now_utc_string, read_text, sha256_file, utc_compact_string, write_json_pretty,
    write_text,
};

const MANIFEST_VERSION: u32 = 1;
const DEFAULT_TEMPLATE: &str = "article";

#[cfg(test)]
mod tests;

#[derive(Debug, Clone)]
pub struct BuildPaths {
    pub root: PathBuf,
    pub content_dir: PathBuf,
    pub data_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub images_dir: PathBuf,
    pub output_dir: PathBuf,
    pub manifest_path: PathBuf,
}

impl BuildPaths {
    pub fn from_args(args: &BuildArgs) -> Self {
        let root = args.root.clone();
        Self {
            content_dir: root.join(&args.content_dir),
            data_dir: root.join(&args.data_dir),
            templates_dir: root.join(&args.templates_dir),
            images_dir: root.join(&args.images_dir),
            output_dir: root.join(&args.output_dir),
            manifest_path: args
                .manifest_path
                .clone()
                .unwrap_or_else(|| root.join(".cache").join("build_manifest.json")),
            root,
        }
    }

    fn output_root_name(&self) -> String {
        self.output_dir
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(DEFAULT_OUTPUT_ROOT)
            .to_string()
    }
}

#[derive(Debug, Default)]
pub struct BuildReport {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl BuildReport {
    fn warn(&mut self, message: String) {
        warn!(detail = %message, "build warning");
        self.warnings.push(message);
    }

    fn error(&mut self, message: String) {
        error!(detail = %message, "build error");
        self.errors.push(message);
    }
}

struct SiteContext<'a> {
    paths: &'a BuildPaths,
    site: &'a SiteConfig,
    linker: Option<&'a AutoLinker>,
}

pub fn run(args: BuildArgs) -> Result<()> {
    let paths = BuildPaths::from_args(&args);

    if args.clean {
        info!(
            output_dir = %paths.output_dir.display(),
            "clean requested; existing dynamic files are kept and overwritten in place"
        );
    }

    let manifest = build_site(&paths)?;

    if !manifest.errors.is_empty() {
        bail!("build finished with {} error(s)", manifest.errors.len());
    }

    Ok(())
}

pub fn build_site(paths: &BuildPaths) -> Result<BuildManifest> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("build-{}", utc_compact_string(started_ts));

    info!(root = %paths.root.display(), run_id = %run_id, "starting build");

    let mut report = BuildReport::default();
    let mut counts = BuildCounts::default();

    let site_config_path = paths.data_dir.join("site.json");
    let site = match load_site_config(&site_config_path)? {
        Some(site) => site,
        None => {
            report.warn(format!(
                "site config not found at {}; using defaults",
                site_config_path.display()
            ));
            SiteConfig::default()
        }
    };

    let terms_path = paths.data_dir.join("terms.json");
    let linker = match load_glossary(&terms_path, &paths.output_root_name())? {
        Glossary::Missing => {
            report.warn(format!(
                "glossary not found at {}; auto-linking disabled",
                terms_path.display()
            ));
            None
        }
        glossary => glossary.into_linker(),
    };
    counts.glossary_terms = linker.as_ref().map(|linker| linker.terms().len()).unwrap_or(0);

    let mut engine = TemplateEngine::new(site.clone())?;
    counts.templates = engine.load_dir(&paths.templates_dir)?;
    info!(
        path = %paths.templates_dir.display(),
        templates = counts.templates,
        "loaded templates"
    );
    if counts.templates == 0 {
        report.warn(format!(
            "no templates found in {}; pages are written without a layout",
            paths.templates_dir.display()
        ));
    }

    let context = SiteContext {
        paths,
        site: &site,
        linker: linker.as_ref(),
    };

    counts.markdown_files = render_markdown_pages(&context, &engine, &mut report)?;

    let statutes = render_statute_pages(&context, &mut report)?;
    counts.statute_pages = statutes.len();

    match copy_images(&paths.images_dir, &paths.output_dir.join("images")) {
        Ok(copied) => counts.images_copied = copied,
        Err(err) => report.error(format!("failed to copy images: {err:#}")),
    }

    counts.generated_files = counts.markdown_files + counts.statute_pages;

    let status = if !report.errors.is_empty() {
        "completed_with_errors"
    } else if !report.warnings.is_empty() {
        "completed_with_warnings"
    } else {
        "completed"
    };

    let manifest = BuildManifest {
        manifest_version: MANIFEST_VERSION,
        run_id,
        status: status.to_string(),
        started_at,
        finished_at: now_utc_string(),
        output_dir: paths.output_dir.display().to_string(),
        counts,
        statutes,
        warnings: report.warnings,
        errors: report.errors,
    };

    write_json_pretty(&paths.manifest_path, &manifest)?;
    info!(path = %paths.manifest_path.display(), "wrote build manifest");

    info!(
        markdown = manifest.counts.markdown_files,
        statutes = manifest.counts.statute_pages,
        images = manifest.counts.images_copied,
        generated = manifest.counts.generated_files,
        warnings = manifest.warnings.len(),
        errors = manifest.errors.len(),
        "build completed"
    );

    Ok(manifest)
}

fn render_markdown_pages(
    context: &SiteContext<'_>,
    engine: &TemplateEngine,
    report: &mut BuildReport,
) -> Result<usize> {
    let content_dir = &context.paths.content_dir;
    if !content_dir.is_dir() {
        info!(path = %content_dir.display(), "content directory missing; no markdown pages");
        return Ok(0);
    }

    let converter = MarkdownConverter::new()?;
    let mut rendered = 0;

    for entry in WalkDir::new(content_dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                report.warn(format!("failed to walk {}: {err}", content_dir.display()));
                continue;
            }
        };

        if !entry.file_type().is_file() || !has_extension(entry.path(), "md") {
            continue;
        }

        match render_markdown_page(context, engine, &converter, entry.path()) {
            Ok(output) => {
                info!(source = %entry.path().display(), output = %output.display(), "rendered page");
                rendered += 1;
            }
            Err(err) => report.warn(format!("{}: {err:#}", entry.path().display())),
        }
    }

    Ok(rendered)
}

fn render_markdown_page(
    context: &SiteContext<'_>,
    engine: &TemplateEngine,
    converter: &MarkdownConverter,
    source: &Path,
) -> Result<PathBuf> {
    let relative = source
        .strip_prefix(&context.paths.content_dir)
        .with_context(|| format!("{} is outside the content directory", source.display()))?
        .with_extension("html");

    let page = converter.convert(&read_text(source)?);
    let page_path = slash_path(&relative);
    let content = match context.linker {
        Some(linker) => linker.apply(&page.html, &page_path),
        None => page.html,
    };

    let depth = relative.components().count().saturating_sub(1);
    let title = page.front_matter.get_str("title").unwrap_or_else(|| {
        source
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string()
    });
    let template = page
        .front_matter
        .get_str("template")
        .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string());

    let render_context = RenderContext::new(depth)
        .with("page_title", title)
        .with(
            "page_description",
            page.front_matter.get_str("description").unwrap_or_default(),
        )
        .with("content", content)
        .with("breadcrumb", "")
        .with("depth", depth.to_string());

    let output = context.paths.output_dir.join(&relative);
    write_text(&output, &engine.render(&template, &render_context))?;
    Ok(output)
}

fn render_statute_pages(
    context: &SiteContext<'_>,
    report: &mut BuildReport,
) -> Result<Vec<StatuteOutcome>> {
    let specs = load_statute_specs(context.paths)?;
    let mut outcomes = Vec::with_capacity(specs.len());

    for spec in &specs {
        match render_statute(context, spec, report) {
            Ok(Some(outcome)) => outcomes.push(outcome),
            Ok(None) => {}
            Err(err) => report.warn(format!("statute {}: {err:#}", spec.id)),
        }
    }

    Ok(outcomes)
}

fn load_statute_specs(paths: &BuildPaths) -> Result<Vec<StatuteSpec>> {
    let path = paths.data_dir.join("statutes.json");
    if !path.exists() {
        return Ok(StatuteSpec::builtin(&paths.content_dir));
    }

    let raw = read_text(&path)?;
    let file: StatutesFile = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    info!(path = %path.display(), statutes = file.statutes.len(), "loaded statute list");

    Ok(file
        .statutes
        .into_iter()
        .map(|mut spec| {
            spec.source_dir = paths.root.join(&spec.source_dir);
            spec
        })
        .collect())
}

fn render_statute(
    context: &SiteContext<'_>,
    spec: &StatuteSpec,
    report: &mut BuildReport,
) -> Result<Option<StatuteOutcome>> {
    if spec.optional_source && spec.files.is_none() && !spec.source_dir.is_dir() {
        info!(
            statute = %spec.id,
            path = %spec.source_dir.display(),
            "statute source directory missing; skipping"
        );
        return Ok(None);
    }

    let files = statute_source_files(spec)?;
    let (text, read_warnings) = read_sources(&files);
    report.warnings.extend(read_warnings);

    if text.trim().is_empty() {
        report.warn(format!(
            "statute {}: no text found in {}",
            spec.id,
            spec.source_dir.display()
        ));
        return Ok(None);
    }

    let depth = spec.output.components().count().saturating_sub(1);
    let meta = PageMeta::new(&spec.title, &spec.description, &context.site.site_name, depth);

    let renderer = StatuteRenderer::new(spec.dialect)?;
    let page = renderer.render(&text, &meta, context.linker, &slash_path(&spec.output));

    let output = context.paths.output_dir.join(&spec.output);
    write_text(&output, &page.html)?;
    info!(statute = %spec.id, output = %output.display(), "wrote statute page");

    let mut sources = Vec::with_capacity(files.len());
    for path in files.iter().filter(|path| path.is_file()) {
        sources.push(SourceHash {
            path: path.display().to_string(),
            sha256: sha256_file(path)?,
        });
    }

    Ok(Some(StatuteOutcome {
        id: spec.id.clone(),
        output: output.display().to_string(),
        counts: page.counts,
        sources,
    }))
}

fn statute_source_files(spec: &StatuteSpec) -> Result<Vec<PathBuf>> {
    if let Some(files) = &spec.files {
        return Ok(files.iter().map(|file| spec.source_dir.join(file)).collect());
    }

    if !spec.source_dir.is_dir() {
        bail!(
            "statute source directory not found: {}",
            spec.source_dir.display()
        );
    }

    let mut files = Vec::new();
    let entries = fs::read_dir(&spec.source_dir)
        .with_context(|| format!("failed to read {}", spec.source_dir.display()))?;

    for entry in entries {
        let entry = entry
            .with_context(|| format!("failed to read entry in {}", spec.source_dir.display()))?;
        let path = entry.path();

        if path.is_file() && has_extension(&path, "txt") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

fn copy_images(src: &Path, dest: &Path) -> Result<usize> {
    if !src.is_dir() {
        info!(path = %src.display(), "images directory missing; skipping copy");
        return Ok(0);
    }

    if dest.exists() {
        fs::remove_dir_all(dest)
            .with_context(|| format!("failed to remove {}", dest.display()))?;
    }
    ensure_directory(dest)?;

    let mut copied = 0;
    for entry in WalkDir::new(src) {
        let entry = entry.with_context(|| format!("failed to walk {}", src.display()))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .with_context(|| format!("unexpected path {}", entry.path().display()))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            ensure_directory(&target)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
            copied += 1;
        }
    }

    info!(from = %src.display(), to = %dest.display(), files = copied, "copied images");
    Ok(copied)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
