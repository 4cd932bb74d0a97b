use anyhow::{Context, Result};
use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::numeral::NumeralSystem;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialectKind {
    Kanji,
    Arabic,
}

impl DialectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kanji => "kanji",
            Self::Arabic => "arabic",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SectionMode {
    Discard,
    Emit,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TocClose {
    Consume,
    Reprocess,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LineRule {
    TocOpen,
    SectionHeading,
    Preamble,
    Chapter,
    Title,
    Article,
}

pub const LINE_RULES: [LineRule; 6] = [
    LineRule::TocOpen,
    LineRule::SectionHeading,
    LineRule::Preamble,
    LineRule::Chapter,
    LineRule::Title,
    LineRule::Article,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass<'a> {
    Blank,
    PageNumber,
    TocOpen,
    TocClose,
    TocEntry,
    SectionHeading { number: &'a str, title: &'a str },
    Preamble,
    Chapter { number: &'a str, title: &'a str },
    Title(&'a str),
    Article { number: &'a str, text: &'a str },
    Text(&'a str),
}

#[derive(Debug)]
pub struct Dialect {
    pub kind: DialectKind,
    pub system: NumeralSystem,
    pub section_mode: SectionMode,
    pub toc_close_mode: TocClose,
    pub toc_close_occurrence: usize,
    pub keep_blank_lines: bool,
    pub preamble_filter: bool,
    page_number: Regex,
    toc_open: Regex,
    toc_close: Regex,
    section: Regex,
    chapter: Regex,
    title: Regex,
    article: Regex,
}

impl Dialect {
    pub fn new(kind: DialectKind) -> Result<Self> {
        match kind {
            DialectKind::Kanji => Self::kanji(),
            DialectKind::Arabic => Self::arabic(),
        }
    }

    pub fn kanji() -> Result<Self> {
        Ok(Self {
            kind: DialectKind::Kanji,
            system: NumeralSystem::Kanji,
            section_mode: SectionMode::Discard,
            toc_close_mode: TocClose::Consume,
            toc_close_occurrence: 1,
            keep_blank_lines: false,
            preamble_filter: true,
            page_number: page_number_regex()?,
            toc_open: Regex::new(r"^目次$").context("failed to compile kanji toc-open regex")?,
            toc_close: Regex::new(r"^附則.{0,2}$")
                .context("failed to compile kanji toc-close regex")?,
            section: Regex::new(r"^(第[一二三四五六七八九十百]+[節款])\s*(.*)$")
                .context("failed to compile kanji section regex")?,
            chapter: Regex::new(r"^(第[一二三四五六七八九十百]+章)\s+(.+)$")
                .context("failed to compile kanji chapter regex")?,
            title: Regex::new(r"^（(.+)）$").context("failed to compile kanji title regex")?,
            article: Regex::new(
                r"^(第[一二三四五六七八九十百]+条(?:の[一二三四五六七八九十]+)?)\s+(.+)$",
            )
            .context("failed to compile kanji article regex")?,
        })
    }

    pub fn arabic() -> Result<Self> {
        Ok(Self {
            kind: DialectKind::Arabic,
            system: NumeralSystem::Arabic,
            section_mode: SectionMode::Emit,
            toc_close_mode: TocClose::Reprocess,
            toc_close_occurrence: 2,
            keep_blank_lines: true,
            preamble_filter: false,
            page_number: page_number_regex()?,
            toc_open: Regex::new(r"^目\s?次$").context("failed to compile arabic toc-open regex")?,
            toc_close: Regex::new(r"^第1章\s+総則")
                .context("failed to compile arabic toc-close regex")?,
            section: Regex::new(r"^(第\d+節)(?:\s+(.*))?$")
                .context("failed to compile arabic section regex")?,
            chapter: Regex::new(r"^(第\d+章)(?:\s+(.*))?$")
                .context("failed to compile arabic chapter regex")?,
            title: Regex::new(r"^【(.+?)】").context("failed to compile arabic title regex")?,
            article: Regex::new(r"^(第\d+条(?:の\d+)?)(?:\s+(.*))?$")
                .context("failed to compile arabic article regex")?,
        })
    }

    /// Classifies one trimmed line. Inside a table of contents only the closing marker is
    /// recognised; everything else is a TOC entry.
    pub fn classify<'a>(&self, line: &'a str, in_toc: bool) -> LineClass<'a> {
        if line.is_empty() {
            return LineClass::Blank;
        }
        if self.page_number.is_match(line) {
            return LineClass::PageNumber;
        }

        if in_toc {
            if self.toc_close.is_match(line) {
                return LineClass::TocClose;
            }
            return LineClass::TocEntry;
        }

        LINE_RULES
            .iter()
            .find_map(|rule| self.match_rule(*rule, line))
            .unwrap_or(LineClass::Text(line))
    }

    pub fn match_rule<'a>(&self, rule: LineRule, line: &'a str) -> Option<LineClass<'a>> {
        match rule {
            LineRule::TocOpen => self.toc_open.is_match(line).then_some(LineClass::TocOpen),
            LineRule::SectionHeading => {
                let (number, title) = capture_pair(&self.section, line)?;
                Some(LineClass::SectionHeading { number, title })
            }
            LineRule::Preamble => {
                (self.preamble_filter && is_preamble_line(line)).then_some(LineClass::Preamble)
            }
            LineRule::Chapter => {
                let (number, title) = capture_pair(&self.chapter, line)?;
                Some(LineClass::Chapter { number, title })
            }
            LineRule::Title => {
                let captures = self.title.captures(line)?;
                let title = captures.get(1)?.as_str().trim();
                Some(LineClass::Title(title))
            }
            LineRule::Article => {
                let (number, text) = capture_pair(&self.article, line)?;
                Some(LineClass::Article { number, text })
            }
        }
    }
}

fn page_number_regex() -> Result<Regex> {
    Regex::new(r"^\d+$").context("failed to compile page-number regex")
}

fn capture_pair<'a>(pattern: &Regex, line: &'a str) -> Option<(&'a str, &'a str)> {
    let captures = pattern.captures(line)?;
    let first = captures.get(1)?.as_str();
    let second = captures.get(2).map(|m| m.as_str().trim()).unwrap_or("");
    Some((first, second))
}

fn is_preamble_line(line: &str) -> bool {
    if line.contains("省令") && line.chars().count() < 30 && !line.contains('条') {
        return true;
    }

    let head = line.chars().take(5).collect::<String>();
    line.contains("電気事業法") && !head.contains('第')
}
