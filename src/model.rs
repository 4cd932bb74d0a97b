use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::statute::grammar::DialectKind;
use crate::statute::node::NodeCounts;

pub const DEFAULT_SITE_NAME: &str = "ほあんペディア";
pub const DEFAULT_SITE_DESCRIPTION: &str = "電気保安に関する知識を集約した情報サイト";
pub const DEFAULT_SITE_VERSION: &str = "2.0.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_name")]
    pub site_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: DEFAULT_SITE_NAME.to_string(),
            description: DEFAULT_SITE_DESCRIPTION.to_string(),
            version: Some(DEFAULT_SITE_VERSION.to_string()),
        }
    }
}

fn default_site_name() -> String {
    DEFAULT_SITE_NAME.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryTerm {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub link: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TermsFile {
    pub terms: Option<Vec<GlossaryTerm>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatuteSpec {
    pub id: String,
    pub dialect: DialectKind,
    pub source_dir: PathBuf,
    #[serde(default)]
    pub files: Option<Vec<String>>,
    pub output: PathBuf,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(skip)]
    pub optional_source: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatutesFile {
    pub statutes: Vec<StatuteSpec>,
}

impl StatuteSpec {
    pub fn builtin(content_dir: &std::path::Path) -> Vec<Self> {
        let standards = content_dir.join("standards");
        vec![
            Self {
                id: "dengi".to_string(),
                dialect: DialectKind::Kanji,
                source_dir: standards.join("dengi"),
                files: None,
                output: PathBuf::from("standards/index.html"),
                title: "電気設備技術基準".to_string(),
                description: "電気設備の技術的要件を定めた経済産業省令（平成九年通商産業省令第五十二号）"
                    .to_string(),
                optional_source: true,
            },
            Self {
                id: "kaishaku".to_string(),
                dialect: DialectKind::Arabic,
                source_dir: standards.join("kaishaku"),
                files: None,
                output: PathBuf::from("standards/kaishaku/index.html"),
                title: "電気設備技術基準の解釈".to_string(),
                description: "電気設備に関する技術基準を定める省令に定める技術的要件を満たすと認められる技術的内容"
                    .to_string(),
                optional_source: true,
            },
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceHash {
    pub path: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatuteOutcome {
    pub id: String,
    pub output: String,
    pub counts: NodeCounts,
    pub sources: Vec<SourceHash>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildCounts {
    pub markdown_files: usize,
    pub statute_pages: usize,
    pub images_copied: usize,
    pub generated_files: usize,
    pub glossary_terms: usize,
    pub templates: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub finished_at: String,
    pub output_dir: String,
    pub counts: BuildCounts,
    pub statutes: Vec<StatuteOutcome>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}
