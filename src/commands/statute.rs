use anyhow::{Result, bail};
use tracing::{info, warn};

use crate::cli::StatuteArgs;
use crate::linker::{AutoLinker, DEFAULT_OUTPUT_ROOT};
use crate::model::SiteConfig;
use crate::site::{Glossary, load_glossary, load_site_config};
use crate::statute::assemble::PageMeta;
use crate::statute::{StatuteRenderer, read_sources};
use crate::util::{depth_below, write_text};

pub fn run(args: StatuteArgs) -> Result<()> {
    let output_root_name = args
        .output_root
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(DEFAULT_OUTPUT_ROOT)
        .to_string();

    let site = match &args.site_config {
        Some(path) => load_site_config(path)?.unwrap_or_else(|| {
            warn!(path = %path.display(), "site config missing; using defaults");
            SiteConfig::default()
        }),
        None => SiteConfig::default(),
    };

    let linker: Option<AutoLinker> = match &args.terms {
        Some(path) => match load_glossary(path, &output_root_name)? {
            Glossary::Missing => {
                warn!(path = %path.display(), "glossary not found; auto-linking disabled");
                None
            }
            glossary => glossary.into_linker(),
        },
        None => None,
    };

    let (text, warnings) = read_sources(&args.inputs);
    if text.trim().is_empty() {
        bail!(
            "no statute text could be read from {} input file(s)",
            args.inputs.len()
        );
    }

    let depth = depth_below(&args.output_root, &args.output);
    let page_path = args
        .output
        .strip_prefix(&args.output_root)
        .unwrap_or(&args.output)
        .to_string_lossy()
        .replace('\\', "/");

    let meta = PageMeta::new(&args.title, &args.description, &site.site_name, depth);

    let renderer = StatuteRenderer::new(args.dialect)?;
    let page = renderer.render(&text, &meta, linker.as_ref(), &page_path);
    write_text(&args.output, &page.html)?;

    info!(
        path = %args.output.display(),
        dialect = args.dialect.as_str(),
        articles = page.counts.articles,
        warnings = warnings.len(),
        "wrote statute page"
    );

    Ok(())
}
