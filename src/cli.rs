use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CliOptions {
    /// Path to the Firefox places.sqlite store
    pub store: PathBuf,

    /// Optional path to config file (YAML)
    #[arg(long)]
    pub config_path: Option<PathBuf>,

    /// Report file to write (overrides config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip video metadata lookups
    #[arg(long)]
    pub no_enrich: bool,
}

pub fn parse() -> CliOptions {
    CliOptions::parse()
}
