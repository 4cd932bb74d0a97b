pub mod markdown;
pub mod template;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::linker::AutoLinker;
use crate::model::{SiteConfig, TermsFile};
use crate::util::read_text;

pub fn load_site_config(path: &Path) -> Result<Option<SiteConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = read_text(path)?;
    let config: SiteConfig = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    info!(path = %path.display(), site_name = %config.site_name, "loaded site config");
    Ok(Some(config))
}

#[derive(Debug)]
pub enum Glossary {
    Missing,
    Disabled,
    Loaded(AutoLinker),
}

impl Glossary {
    pub fn into_linker(self) -> Option<AutoLinker> {
        match self {
            Self::Loaded(linker) => Some(linker),
            Self::Missing | Self::Disabled => None,
        }
    }
}

pub fn load_glossary(path: &Path, output_root: &str) -> Result<Glossary> {
    if !path.exists() {
        return Ok(Glossary::Missing);
    }

    let raw = read_text(path)?;
    let file: TermsFile = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let Some(terms) = file.terms else {
        info!(path = %path.display(), "glossary has no terms; auto-linking disabled");
        return Ok(Glossary::Disabled);
    };

    let linker = AutoLinker::new(terms).with_output_root(output_root);
    if linker.is_empty() {
        info!(path = %path.display(), "glossary has no usable terms; auto-linking disabled");
        return Ok(Glossary::Disabled);
    }

    info!(path = %path.display(), terms = linker.terms().len(), "loaded glossary");
    Ok(Glossary::Loaded(linker))
}
