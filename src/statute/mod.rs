pub mod assemble;
pub mod format;
pub mod grammar;
pub mod node;
pub mod numeral;
pub mod parser;

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::linker::AutoLinker;
use crate::util::read_text;
use assemble::{HtmlAssembler, PageMeta};
use format::ContentFormatter;
use grammar::{Dialect, DialectKind};
use node::{NodeCounts, StructuralNode};
use parser::StatuteParser;

#[derive(Debug)]
pub struct StatutePage {
    pub html: String,
    pub counts: NodeCounts,
}

#[derive(Debug)]
pub struct StatuteRenderer {
    dialect: Dialect,
    assembler: HtmlAssembler,
}

impl StatuteRenderer {
    pub fn new(kind: DialectKind) -> Result<Self> {
        Ok(Self {
            dialect: Dialect::new(kind)?,
            assembler: HtmlAssembler::new(ContentFormatter::new()?),
        })
    }

    pub fn parse(&self, text: &str) -> Vec<StructuralNode> {
        StatuteParser::new(&self.dialect).parse(text)
    }

    pub fn render(
        &self,
        text: &str,
        meta: &PageMeta,
        linker: Option<&AutoLinker>,
        page_path: &str,
    ) -> StatutePage {
        let nodes = self.parse(text);
        let counts = NodeCounts::tally(&nodes);

        info!(
            dialect = self.dialect.kind.as_str(),
            chapters = counts.chapters,
            sections = counts.sections,
            articles = counts.articles,
            "parsed statute text"
        );

        for node in &nodes {
            debug!(kind = node.kind().as_str(), number = %node.number().label, "parsed node");
        }

        let html = match linker {
            Some(linker) => self
                .assembler
                .assemble_with(&nodes, meta, |content| linker.apply(&content, page_path)),
            None => self.assembler.assemble(&nodes, meta),
        };

        StatutePage { html, counts }
    }
}

/// Reads and joins statute source files in the given order. Unreadable files are skipped and
/// reported in the returned warnings.
pub fn read_sources(files: &[PathBuf]) -> (String, Vec<String>) {
    let mut contents = Vec::with_capacity(files.len());
    let mut warnings = Vec::new();

    for path in files {
        match read_text(path) {
            Ok(text) => {
                info!(path = %path.display(), "loaded statute source");
                contents.push(text);
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable statute source");
                warnings.push(format!("{}: {err}", path.display()));
            }
        }
    }

    (contents.join("\n"), warnings)
}
