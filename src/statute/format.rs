use anyhow::{Context, Result};
use regex::Regex;

use crate::util::escape_html;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LineCategory {
    MajorItem,
    SubItem,
    DetailItem,
    Note,
    Paragraph,
}

impl LineCategory {
    pub fn css_class(self) -> Option<&'static str> {
        match self {
            Self::MajorItem => Some("item-major"),
            Self::SubItem => Some("item-sub"),
            Self::DetailItem => Some("item-detail"),
            Self::Note => Some("note"),
            Self::Paragraph => None,
        }
    }
}

#[derive(Debug)]
pub struct ContentFormatter {
    major_item: Regex,
    sub_item: Regex,
    detail_letter: Regex,
    detail_digit: Regex,
}

impl ContentFormatter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            major_item: Regex::new(r"^[一二三四五六七八九十]+\s")
                .context("failed to compile major item regex")?,
            sub_item: Regex::new(r"^[イロハニホヘトチリヌルヲワカヨタレソツネナラム]\s")
                .context("failed to compile sub item regex")?,
            detail_letter: Regex::new(
                r"^[(（][イロハニホヘトチリヌルヲワカヨタレソツネナラム][)）]",
            )
            .context("failed to compile lettered detail regex")?,
            detail_digit: Regex::new(r"^[(（][0-9０-９]+[)）]")
                .context("failed to compile numbered detail regex")?,
        })
    }

    pub fn classify(&self, line: &str) -> LineCategory {
        if self.major_item.is_match(line) {
            LineCategory::MajorItem
        } else if self.sub_item.is_match(line) {
            LineCategory::SubItem
        } else if self.detail_letter.is_match(line) || self.detail_digit.is_match(line) {
            LineCategory::DetailItem
        } else if ["(備考)", "（備考）", "※"]
            .iter()
            .any(|marker| line.starts_with(marker))
        {
            LineCategory::Note
        } else {
            LineCategory::Paragraph
        }
    }

    pub fn format<S: AsRef<str>>(&self, body_lines: &[S]) -> String {
        let mut parts = Vec::<String>::new();
        let mut table_rows = Vec::<&str>::new();

        for raw_line in body_lines {
            let line = raw_line.as_ref().trim();

            if line.is_empty() {
                flush_table(&mut table_rows, &mut parts);
                parts.push("<br>".to_string());
                continue;
            }

            if line.contains('\t') {
                table_rows.push(line);
                continue;
            }

            flush_table(&mut table_rows, &mut parts);
            parts.push(self.paragraph(line));
        }

        flush_table(&mut table_rows, &mut parts);
        parts.join("\n")
    }

    fn paragraph(&self, line: &str) -> String {
        let escaped = escape_html(line);
        match self.classify(line).css_class() {
            Some(class) => format!(r#"<p class="{class}">{escaped}</p>"#),
            None => format!("<p>{escaped}</p>"),
        }
    }
}

fn flush_table(rows: &mut Vec<&str>, parts: &mut Vec<String>) {
    if rows.is_empty() {
        return;
    }
    parts.push(render_table(rows));
    rows.clear();
}

fn render_table(rows: &[&str]) -> String {
    let mut html = vec![r#"<div class="table-container"><table class="spec-table">"#.to_string()];

    for (index, row) in rows.iter().enumerate() {
        let tag = if index == 0 { "th" } else { "td" };
        html.push("<tr>".to_string());
        for cell in row.split('\t') {
            html.push(format!("<{tag}>{}</{tag}>", escape_html(cell.trim())));
        }
        html.push("</tr>".to_string());
    }

    html.push("</table></div>".to_string());
    html.join("\n")
}
