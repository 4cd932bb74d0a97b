mod tokens;

use std::collections::HashSet;

use tracing::debug;

use crate::model::GlossaryTerm;
use crate::util::{escape_attribute, escape_html, relative_prefix};
use tokens::{AnchorTracker, TokenKind, tokenize};

pub const AUTO_LINK_CLASS: &str = "auto-link";
pub const DEFAULT_OUTPUT_ROOT: &str = "docs";

#[derive(Debug, Clone)]
pub struct AutoLinker {
    terms: Vec<GlossaryTerm>,
    output_root: String,
}

#[derive(Debug)]
struct LinkContext<'a> {
    page: String,
    depth: usize,
    linked: HashSet<&'a str>,
}

impl AutoLinker {
    pub fn new(terms: Vec<GlossaryTerm>) -> Self {
        let mut terms = terms
            .into_iter()
            .filter(|term| !term.word.is_empty() && !term.link.is_empty())
            .collect::<Vec<_>>();
        terms.sort_by(|a, b| b.word.chars().count().cmp(&a.word.chars().count()));

        Self {
            terms,
            output_root: DEFAULT_OUTPUT_ROOT.to_string(),
        }
    }

    pub fn with_output_root(mut self, output_root: impl Into<String>) -> Self {
        self.output_root = output_root.into().trim_matches('/').to_string();
        self
    }

    pub fn terms(&self) -> &[GlossaryTerm] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn apply(&self, html: &str, page_path: &str) -> String {
        if self.terms.is_empty() {
            return html.to_string();
        }

        let page = self.normalize_path(page_path);
        let mut context = LinkContext {
            depth: page_depth(&page),
            page,
            linked: HashSet::new(),
        };

        let mut output = html.to_string();
        for term in &self.terms {
            if context.linked.contains(term.word.as_str()) {
                continue;
            }
            if self.is_same_page(&term.link, &context.page) {
                debug!(word = %term.word, page = %context.page, "skipping self link");
                continue;
            }

            let href = relative_href(&term.link, context.depth);
            if let Some(rewritten) = link_first_occurrence(&output, &escape_html(&term.word), &href)
            {
                output = rewritten;
            }
            context.linked.insert(term.word.as_str());
        }

        output
    }

    fn is_same_page(&self, link: &str, page: &str) -> bool {
        !page.is_empty() && self.normalize_path(link) == page
    }

    /// Normalises separators and strips everything up to and including the output root.
    fn normalize_path(&self, path: &str) -> String {
        let normalized = path.replace('\\', "/");
        let normalized = normalized.trim_start_matches("./").trim_start_matches('/');

        if self.output_root.is_empty() {
            return normalized.to_string();
        }

        let root_prefix = format!("{}/", self.output_root);
        if let Some(rest) = normalized.strip_prefix(&root_prefix) {
            return rest.to_string();
        }

        let root_segment = format!("/{root_prefix}");
        match normalized.find(&root_segment) {
            Some(index) => normalized[index + root_segment.len()..].to_string(),
            None => normalized.to_string(),
        }
    }
}

fn relative_href(link: &str, depth: usize) -> String {
    if link.starts_with('/') || link.starts_with('#') || link.contains("://") {
        return link.to_string();
    }
    format!("{}{}", relative_prefix(depth), link)
}

fn page_depth(normalized_page: &str) -> usize {
    normalized_page
        .split('/')
        .filter(|segment| !segment.is_empty())
        .count()
        .saturating_sub(1)
}

/// Wraps the first text occurrence of `needle` outside any anchor. Returns `None` when nothing
/// changed, including when the word already carries an auto-link from an earlier pass.
fn link_first_occurrence(html: &str, needle: &str, href: &str) -> Option<String> {
    if needle.is_empty() || already_auto_linked(html, needle) {
        return None;
    }

    let mut tracker = AnchorTracker::default();
    for token in tokenize(html) {
        match token.kind {
            TokenKind::Markup => tracker.observe(token.text, AUTO_LINK_CLASS),
            TokenKind::Text => {
                if tracker.inside_anchor() {
                    continue;
                }
                let Some(offset) = token.text.find(needle) else {
                    continue;
                };

                let at = token.start + offset;
                let mut output = String::with_capacity(html.len() + href.len() + 48);
                output.push_str(&html[..at]);
                output.push_str(&format!(
                    r#"<a href="{}" class="{AUTO_LINK_CLASS}">{needle}</a>"#,
                    escape_attribute(href)
                ));
                output.push_str(&html[at + needle.len()..]);
                return Some(output);
            }
        }
    }

    None
}

fn already_auto_linked(html: &str, needle: &str) -> bool {
    let mut tracker = AnchorTracker::default();
    tokenize(html).any(|token| match token.kind {
        TokenKind::Markup => {
            tracker.observe(token.text, AUTO_LINK_CLASS);
            false
        }
        TokenKind::Text => tracker.inside_auto_link() && token.text == needle,
    })
}
