use std::collections::HashMap;

use tracing::warn;

use super::format::ContentFormatter;
use super::node::StructuralNode;
use crate::util::{current_year, escape_html, relative_prefix};

const PLACEHOLDER_PAGE: &str = "coming-soon.html";
const TOC_TITLE: &str = "目次";

#[derive(Debug, Clone)]
pub struct PageMeta {
    pub page_title: String,
    pub toc_title: String,
    pub description: String,
    pub site_name: String,
    pub root_prefix: String,
}

impl PageMeta {
    pub fn new(title: &str, description: &str, site_name: &str, depth: usize) -> Self {
        Self {
            page_title: title.to_string(),
            toc_title: TOC_TITLE.to_string(),
            description: description.to_string(),
            site_name: site_name.to_string(),
            root_prefix: relative_prefix(depth),
        }
    }
}

#[derive(Debug)]
pub struct HtmlAssembler {
    formatter: ContentFormatter,
}

impl HtmlAssembler {
    pub fn new(formatter: ContentFormatter) -> Self {
        Self { formatter }
    }

    pub fn assemble(&self, nodes: &[StructuralNode], meta: &PageMeta) -> String {
        self.assemble_with(nodes, meta, |content| content)
    }

    pub fn assemble_with<F>(&self, nodes: &[StructuralNode], meta: &PageMeta, rewrite: F) -> String
    where
        F: FnOnce(String) -> String,
    {
        let anchors = anchor_ids(nodes);
        let sidebar = render_sidebar(nodes, &anchors);
        let content = rewrite(self.render_content(nodes, &anchors, meta));
        wrap_page(meta, &sidebar, &content)
    }

    pub fn render_content(
        &self,
        nodes: &[StructuralNode],
        anchors: &[String],
        meta: &PageMeta,
    ) -> String {
        let mut blocks = Vec::with_capacity(nodes.len());

        for (node, anchor) in nodes.iter().zip(anchors) {
            let block = match node {
                StructuralNode::Chapter { number, title } => format!(
                    r#"
                <article class="article" id="{anchor}">
                    <h2 class="chapter-title">{} {}</h2>
                </article>"#,
                    escape_html(&number.label),
                    escape_html(title)
                ),
                StructuralNode::Section { number, title, .. } => format!(
                    r#"
                <article class="article" id="{anchor}">
                    <h3 class="section-title">{} {}</h3>
                </article>"#,
                    escape_html(&number.label),
                    escape_html(title)
                ),
                StructuralNode::Article {
                    number,
                    title,
                    body_lines,
                    ..
                } => format!(
                    r#"
                <article class="article" id="{anchor}">
                    <h3 class="article-title">
                        <a href="{}{PLACEHOLDER_PAGE}">{}</a>
                    </h3>
                    <div class="article-content">
{}
                    </div>
                </article>"#,
                    meta.root_prefix,
                    article_label(&number.label, title.as_deref()),
                    self.formatter.format(body_lines)
                ),
            };
            blocks.push(block);
        }

        blocks.concat()
    }
}

pub fn anchor_ids(nodes: &[StructuralNode]) -> Vec<String> {
    let mut seen = HashMap::<String, usize>::new();

    nodes
        .iter()
        .map(|node| {
            let base = base_anchor_id(node);
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;

            if *count == 1 {
                return base;
            }

            let unique = format!("{base}-{count}");
            warn!(anchor = %base, renamed = %unique, "duplicate anchor id");
            unique
        })
        .collect()
}

fn base_anchor_id(node: &StructuralNode) -> String {
    match node {
        StructuralNode::Chapter { number, .. } => format!("chapter{}", number.decimal_id()),
        StructuralNode::Section {
            number,
            parent_chapter,
            ..
        } => {
            let chapter = parent_chapter
                .as_ref()
                .map(|chapter| chapter.decimal_id())
                .unwrap_or_default();
            format!("section{}_{}", chapter, number.decimal_id())
        }
        StructuralNode::Article { number, .. } => format!("article{}", number.decimal_id()),
    }
}

pub fn render_sidebar(nodes: &[StructuralNode], anchors: &[String]) -> String {
    nodes
        .iter()
        .zip(anchors)
        .map(|(node, anchor)| match node {
            StructuralNode::Chapter { number, title } => format!(
                r#"                    <li class="sidebar-chapter">{} {}</li>"#,
                escape_html(&number.label),
                escape_html(title)
            ),
            StructuralNode::Section { number, title, .. } => format!(
                r##"                    <li class="sidebar-section"><a href="#{anchor}">{} {}</a></li>"##,
                escape_html(&number.label),
                escape_html(title)
            ),
            StructuralNode::Article { number, title, .. } => format!(
                r##"                    <li><a href="#{anchor}">{}</a></li>"##,
                article_label(&number.label, title.as_deref())
            ),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn article_label(label: &str, title: Option<&str>) -> String {
    match title {
        Some(title) if !title.is_empty() => {
            format!("{}（{}）", escape_html(label), escape_html(title))
        }
        _ => escape_html(label),
    }
}

fn wrap_page(meta: &PageMeta, sidebar: &str, content: &str) -> String {
    let page_title = escape_html(&meta.page_title);
    let toc_title = escape_html(&meta.toc_title);
    let description = escape_html(&meta.description);
    let site_name = escape_html(&meta.site_name);
    let prefix = &meta.root_prefix;
    let year = current_year();

    format!(
        r#"<!DOCTYPE html>
<html lang="ja">

<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="robots" content="noindex, nofollow">
    <title>{page_title} - {site_name}</title>
    <meta name="description" content="{description}">
    <link rel="stylesheet" href="{prefix}css/style.css">
</head>

<body>
    <header class="site-header">
        <a href="{prefix}index.html">
            <span class="home-icon">🏠</span>
            <span>{site_name}</span>
        </a>
    </header>

    <main class="main-content">
        <h1 class="page-title">{page_title}</h1>

        <div class="two-column-layout">
            <aside class="sidebar">
                <h2 class="sidebar-title">{toc_title}</h2>
                <ul class="sidebar-list">
{sidebar}
                </ul>
            </aside>

            <div class="content-area">
{content}
            </div>
        </div>
    </main>

    <footer class="site-footer">
        <p>&copy; {year} {site_name}</p>
    </footer>

    <script>
        document.querySelectorAll('.sidebar-list a').forEach(link => {{
            link.addEventListener('click', function (e) {{
                e.preventDefault();
                const targetId = this.getAttribute('href').substring(1);
                const targetElement = document.getElementById(targetId);
                if (targetElement) {{
                    targetElement.scrollIntoView({{ behavior: 'smooth', block: 'start' }});
                }}
            }});
        }});
    </script>
</body>

</html>
"#
    )
}
