use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::statute::grammar::DialectKind;

#[derive(Parser, Debug)]
#[command(
    name = "hoanpedia",
    version,
    about = "Static site generator for electrical safety knowledge and statute pages"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Build(BuildArgs),
    Statute(StatuteArgs),
    Terms(TermsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    #[arg(long, default_value = "content")]
    pub content_dir: PathBuf,

    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    #[arg(long, default_value = "templates")]
    pub templates_dir: PathBuf,

    #[arg(long, default_value = "images")]
    pub images_dir: PathBuf,

    #[arg(long, default_value = "docs")]
    pub output_dir: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub clean: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatuteArgs {
    #[arg(long = "input", required = true)]
    pub inputs: Vec<PathBuf>,

    #[arg(long)]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value_t = DialectKind::Kanji)]
    pub dialect: DialectKind,

    #[arg(long)]
    pub title: String,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long)]
    pub terms: Option<PathBuf>,

    #[arg(long)]
    pub site_config: Option<PathBuf>,

    #[arg(long, default_value = "docs")]
    pub output_root: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct TermsArgs {
    #[arg(long, default_value = "data/terms.json")]
    pub path: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}
