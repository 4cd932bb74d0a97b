use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::TermsArgs;
use crate::linker::{AutoLinker, DEFAULT_OUTPUT_ROOT};
use crate::site::{Glossary, load_glossary};

pub fn run(args: TermsArgs) -> Result<()> {
    let linker = match load_glossary(&args.path, DEFAULT_OUTPUT_ROOT)? {
        Glossary::Loaded(linker) => linker,
        Glossary::Missing => {
            warn!(path = %args.path.display(), "glossary file not found");
            return Ok(());
        }
        Glossary::Disabled => {
            warn!(path = %args.path.display(), "no glossary terms to list");
            return Ok(());
        }
    };

    if args.json {
        return write_json_terms(&linker);
    }

    write_text_terms(&linker)?;
    info!(terms = linker.terms().len(), "listed glossary terms");
    Ok(())
}

fn write_json_terms(linker: &AutoLinker) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut output, linker.terms())
        .context("failed to serialize glossary terms")?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

fn write_text_terms(linker: &AutoLinker) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());

    for (rank, term) in linker.terms().iter().enumerate() {
        writeln!(
            output,
            "{:>4}. {} ({} chars) -> {}",
            rank + 1,
            term.word,
            term.word.chars().count(),
            term.link
        )?;
    }

    output.flush()?;
    Ok(())
}
