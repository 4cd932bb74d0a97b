use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regex::{Captures, Regex};

use crate::model::SiteConfig;
use crate::util::{current_year, read_text, relative_prefix};

const BASE_TEMPLATE: &str = "base";

#[derive(Debug)]
pub struct TemplateEngine {
    site: SiteConfig,
    templates: HashMap<String, String>,
    extends: Regex,
    block: Regex,
    variable: Regex,
}

#[derive(Debug, Default, Clone)]
pub struct RenderContext {
    pub values: HashMap<String, String>,
    pub depth: usize,
}

impl RenderContext {
    pub fn new(depth: usize) -> Self {
        Self {
            values: HashMap::new(),
            depth,
        }
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }
}

impl TemplateEngine {
    pub fn new(site: SiteConfig) -> Result<Self> {
        Ok(Self {
            site,
            templates: HashMap::new(),
            extends: Regex::new(r"\{\{extends\s+(\w+)\.html\}\}")
                .context("failed to compile template extends regex")?,
            block: Regex::new(r"(?s)\{\{block\s+content\}\}(.*?)\{\{endblock\}\}")
                .context("failed to compile template block regex")?,
            variable: Regex::new(r"\{\{(\w+)\}\}")
                .context("failed to compile template variable regex")?,
        })
    }

    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        if !dir.is_dir() {
            return Ok(0);
        }

        let entries =
            fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
        for entry in entries {
            let entry = entry.with_context(|| format!("failed to read entry in {}", dir.display()))?;
            let path = entry.path();

            let is_html = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("html"))
                .unwrap_or(false);
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            if is_html && path.is_file() {
                self.insert(stem, read_text(&path)?);
            }
        }

        Ok(self.templates.len())
    }

    pub fn insert(&mut self, name: &str, source: impl Into<String>) {
        self.templates.insert(name.to_string(), source.into());
    }

    pub fn render(&self, name: &str, context: &RenderContext) -> String {
        let template = match self
            .templates
            .get(name)
            .or_else(|| self.templates.get(BASE_TEMPLATE))
        {
            Some(template) => template,
            None => return context.values.get("content").cloned().unwrap_or_default(),
        };

        let composed = self.resolve_extends(template);
        self.substitute(&composed, context)
    }

    fn resolve_extends(&self, template: &str) -> String {
        let Some(captures) = self.extends.captures(template) else {
            return template.to_string();
        };
        let Some(parent) = captures.get(1).and_then(|name| self.templates.get(name.as_str()))
        else {
            return template.to_string();
        };

        match self.block.captures(template) {
            Some(block) => {
                let body = block.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                parent.replace("{{content}}", body)
            }
            None => parent.clone(),
        }
    }

    fn substitute(&self, template: &str, context: &RenderContext) -> String {
        let prefix = relative_prefix(context.depth);
        let year = current_year().to_string();

        self.variable
            .replace_all(template, |captures: &Captures<'_>| {
                let name = &captures[1];
                if let Some(value) = context.values.get(name) {
                    return value.clone();
                }
                match name {
                    "site_name" => self.site.site_name.clone(),
                    "site_description" => self.site.description.clone(),
                    "current_year" => year.clone(),
                    "css_path" => format!("{prefix}css/style.css"),
                    "home_path" => format!("{prefix}index.html"),
                    _ => String::new(),
                }
            })
            .into_owned()
    }
}
