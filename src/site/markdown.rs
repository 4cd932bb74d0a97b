use std::collections::{BTreeMap, HashSet};

use anyhow::{Context, Result};
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};
use regex::Regex;
use serde_json::Value;

const FRONT_MATTER_FENCE: &str = "---";

#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrontMatter(BTreeMap<String, Value>);

impl FrontMatter {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MarkdownPage {
    pub front_matter: FrontMatter,
    pub html: String,
}

#[derive(Debug)]
pub struct MarkdownConverter {
    notice: Regex,
    options: Options,
}

impl MarkdownConverter {
    pub fn new() -> Result<Self> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Ok(Self {
            notice: Regex::new(r"(?ms)^:::([\w-]+)[ \t]*\r?\n(.*?)\r?\n:::[ \t]*$")
                .context("failed to compile notice block regex")?,
            options,
        })
    }

    pub fn convert(&self, source: &str) -> MarkdownPage {
        let (front_matter, body) = split_front_matter(source);
        let body = self.expand_notices(body);

        let mut events: Vec<Event<'_>> = Parser::new_ext(&body, self.options).collect();
        assign_heading_ids(&mut events);

        let mut html_out = String::with_capacity(body.len() * 3 / 2);
        html::push_html(&mut html_out, events.into_iter());

        MarkdownPage {
            front_matter,
            html: html_out,
        }
    }

    fn expand_notices(&self, body: &str) -> String {
        self.notice
            .replace_all(body, "<div class=\"notice notice-$1\">\n<p>$2</p>\n</div>")
            .into_owned()
    }
}

pub fn split_front_matter(source: &str) -> (FrontMatter, &str) {
    let Some(rest) = source.strip_prefix(FRONT_MATTER_FENCE) else {
        return (FrontMatter::default(), source);
    };
    let Some(rest) = rest
        .strip_prefix('\n')
        .or_else(|| rest.strip_prefix("\r\n"))
    else {
        return (FrontMatter::default(), source);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FRONT_MATTER_FENCE {
            let front_matter = parse_front_matter(&rest[..offset]);
            return (front_matter, &rest[offset + line.len()..]);
        }
        offset += line.len();
    }

    (FrontMatter::default(), source)
}

/// Gives every heading without an explicit `{#id}` a slug of its text, unique within the page.
fn assign_heading_ids(events: &mut [Event<'_>]) {
    let mut used = events
        .iter()
        .filter_map(|event| match event {
            Event::Start(Tag::Heading { id: Some(id), .. }) => Some(id.to_string()),
            _ => None,
        })
        .collect::<HashSet<_>>();
    let mut index = 0;

    while index < events.len() {
        if !matches!(events[index], Event::Start(Tag::Heading { id: None, .. })) {
            index += 1;
            continue;
        }

        let mut text = String::new();
        let mut end = index + 1;
        while end < events.len() && !matches!(events[end], Event::End(TagEnd::Heading(_))) {
            if let Event::Text(chunk) | Event::Code(chunk) = &events[end] {
                text.push_str(chunk);
            }
            end += 1;
        }

        let slug = unique_slug(slugify(&text), &mut used);
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[index] {
            *id = Some(CowStr::from(slug));
        }
        index = end;
    }
}

fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut separator = false;

    for ch in text.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() || ch == '_' {
            if separator && !slug.is_empty() {
                slug.push('-');
            }
            separator = false;
            slug.push(ch);
        } else if ch.is_whitespace() || ch == '-' {
            separator = true;
        }
    }

    slug
}

fn unique_slug(base: String, used: &mut HashSet<String>) -> String {
    let mut candidate = base.clone();
    let mut counter = 0;
    while candidate.is_empty() || used.contains(&candidate) {
        counter += 1;
        candidate = format!("{base}_{counter}");
    }
    used.insert(candidate.clone());
    candidate
}

fn parse_front_matter(block: &str) -> FrontMatter {
    let mut values = BTreeMap::new();

    for line in block.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };

        let value = strip_quotes(value.trim());
        let parsed = if !value.is_empty() && value.chars().all(|ch| ch.is_ascii_digit()) {
            value
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(value.to_string()))
        } else {
            Value::String(value.to_string())
        };

        values.insert(key.trim().to_string(), parsed);
    }

    FrontMatter(values)
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
