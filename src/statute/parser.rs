use tracing::debug;

use super::grammar::{Dialect, LineClass, SectionMode, TocClose};
use super::node::StructuralNode;
use super::numeral::NumeralToken;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum ParserState {
    Body,
    TableOfContents,
}

#[derive(Debug)]
struct PendingArticle {
    number: NumeralToken,
    title: Option<String>,
    body_lines: Vec<String>,
    chapter: Option<NumeralToken>,
    section: Option<NumeralToken>,
}

#[derive(Debug)]
pub struct StatuteParser<'d> {
    dialect: &'d Dialect,
}

impl<'d> StatuteParser<'d> {
    pub fn new(dialect: &'d Dialect) -> Self {
        Self { dialect }
    }

    pub fn parse(&self, full_text: &str) -> Vec<StructuralNode> {
        let mut run = ParseRun::new(self.dialect);

        for raw_line in full_text.lines() {
            run.feed(raw_line.trim());
        }

        run.finish()
    }
}

struct ParseRun<'d> {
    dialect: &'d Dialect,
    state: ParserState,
    toc_close_seen: usize,
    pending: Option<PendingArticle>,
    next_title: Option<String>,
    chapter: Option<NumeralToken>,
    section: Option<NumeralToken>,
    nodes: Vec<StructuralNode>,
}

impl<'d> ParseRun<'d> {
    fn new(dialect: &'d Dialect) -> Self {
        Self {
            dialect,
            state: ParserState::Body,
            toc_close_seen: 0,
            pending: None,
            next_title: None,
            chapter: None,
            section: None,
            nodes: Vec::new(),
        }
    }

    fn feed(&mut self, line: &str) {
        let in_toc = self.state == ParserState::TableOfContents;
        let class = self.dialect.classify(line, in_toc);

        match (self.state, class) {
            (_, LineClass::PageNumber) => {}
            (ParserState::TableOfContents, LineClass::TocClose) => {
                self.toc_close_seen += 1;
                if self.toc_close_seen < self.dialect.toc_close_occurrence {
                    return;
                }
                self.state = ParserState::Body;
                if self.dialect.toc_close_mode == TocClose::Reprocess {
                    self.feed(line);
                }
            }
            (ParserState::TableOfContents, _) => {}
            (ParserState::Body, LineClass::Blank) => self.push_blank(),
            (ParserState::Body, LineClass::TocOpen) => {
                debug!(line, "table of contents opened");
                self.state = ParserState::TableOfContents;
                self.toc_close_seen = 0;
            }
            (ParserState::Body, LineClass::SectionHeading { number, title }) => {
                if self.dialect.section_mode == SectionMode::Emit {
                    self.open_section(number, title);
                }
            }
            (ParserState::Body, LineClass::Preamble) => {}
            (ParserState::Body, LineClass::Chapter { number, title }) => {
                self.open_chapter(number, title);
            }
            (ParserState::Body, LineClass::Title(title)) => {
                self.close_article();
                self.next_title = Some(title.to_string());
            }
            (ParserState::Body, LineClass::Article { number, text }) => {
                self.open_article(number, text);
            }
            (ParserState::Body, LineClass::Text(text)) => {
                if let Some(article) = self.pending.as_mut() {
                    article.body_lines.push(text.to_string());
                }
            }
            (ParserState::Body, LineClass::TocClose | LineClass::TocEntry) => {}
        }
    }

    fn push_blank(&mut self) {
        if !self.dialect.keep_blank_lines {
            return;
        }
        if let Some(article) = self.pending.as_mut() {
            if !article.body_lines.is_empty() {
                article.body_lines.push(String::new());
            }
        }
    }

    fn open_chapter(&mut self, number: &str, title: &str) {
        self.close_article();

        let number = NumeralToken::parse(self.dialect.system, number);
        self.chapter = Some(number.clone());
        self.section = None;
        self.next_title = None;
        self.nodes.push(StructuralNode::Chapter {
            number,
            title: title.to_string(),
        });
    }

    fn open_section(&mut self, number: &str, title: &str) {
        self.close_article();

        let number = NumeralToken::parse(self.dialect.system, number);
        self.section = Some(number.clone());
        self.next_title = None;
        self.nodes.push(StructuralNode::Section {
            number,
            title: title.to_string(),
            parent_chapter: self.chapter.clone(),
        });
    }

    fn open_article(&mut self, number: &str, text: &str) {
        self.close_article();

        let mut body_lines = Vec::new();
        if !text.is_empty() {
            body_lines.push(text.to_string());
        }

        self.pending = Some(PendingArticle {
            number: NumeralToken::parse(self.dialect.system, number),
            title: self.next_title.take(),
            body_lines,
            chapter: self.chapter.clone(),
            section: self.section.clone(),
        });
    }

    fn close_article(&mut self) {
        let Some(mut article) = self.pending.take() else {
            return;
        };

        while article
            .body_lines
            .last()
            .map(|line| line.is_empty())
            .unwrap_or(false)
        {
            article.body_lines.pop();
        }

        if article.body_lines.is_empty() {
            debug!(number = %article.number.label, "dropping article without body");
            return;
        }

        self.nodes.push(StructuralNode::Article {
            number: article.number,
            title: article.title,
            body_lines: article.body_lines,
            chapter: article.chapter,
            section: article.section,
        });
    }

    fn finish(mut self) -> Vec<StructuralNode> {
        self.close_article();
        self.nodes
    }
}

#[cfg(test)]
mod tests;
