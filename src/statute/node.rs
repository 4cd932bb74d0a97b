use serde::Serialize;

use super::numeral::NumeralToken;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StructuralNode {
    Chapter {
        number: NumeralToken,
        title: String,
    },
    Section {
        number: NumeralToken,
        title: String,
        parent_chapter: Option<NumeralToken>,
    },
    Article {
        number: NumeralToken,
        title: Option<String>,
        body_lines: Vec<String>,
        chapter: Option<NumeralToken>,
        section: Option<NumeralToken>,
    },
}

impl StructuralNode {
    pub fn number(&self) -> &NumeralToken {
        match self {
            Self::Chapter { number, .. }
            | Self::Section { number, .. }
            | Self::Article { number, .. } => number,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Chapter { .. } => NodeKind::Chapter,
            Self::Section { .. } => NodeKind::Section,
            Self::Article { .. } => NodeKind::Article,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Chapter,
    Section,
    Article,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Chapter => "chapter",
            NodeKind::Section => "section",
            NodeKind::Article => "article",
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeCounts {
    pub chapters: usize,
    pub sections: usize,
    pub articles: usize,
}

impl NodeCounts {
    pub fn tally(nodes: &[StructuralNode]) -> Self {
        let mut counts = Self::default();
        for node in nodes {
            match node.kind() {
                NodeKind::Chapter => counts.chapters += 1,
                NodeKind::Section => counts.sections += 1,
                NodeKind::Article => counts.articles += 1,
            }
        }
        counts
    }
}
