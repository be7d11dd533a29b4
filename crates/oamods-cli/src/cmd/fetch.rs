//! Fetch subcommand - download work records from OpenAlex

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use oamods_core::SharedProgress;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// OpenAlex work IDs (comma-separated); replaces the configured list
    #[arg(long, value_delimiter = ',')]
    pub ids: Vec<String>,

    /// DOIs (comma-separated); replaces the configured list
    #[arg(long, value_delimiter = ',')]
    pub dois: Vec<String>,

    /// Output JSON file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Fetch config from file settings, with command-line lists taking precedence
pub fn fetch_config(args: FetchArgs, config: &Config) -> oamods_openalex::Config {
    let output = args
        .output
        .unwrap_or_else(|| config.output.records_file.clone());
    let mut fetch = config.fetch_config(output);
    if !args.ids.is_empty() || !args.dois.is_empty() {
        fetch.ids = args.ids;
        fetch.dois = args.dois;
    }
    fetch
}

pub fn run(args: FetchArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let fetch = fetch_config(args, config);
    let pb = progress.stage_line("fetch", 0);
    let result = oamods_openalex::run(&fetch, &pb);
    pb.finish_and_clear();

    let summary = result?;
    progress.println(format!(
        "Fetched {} records -> {}",
        summary.records,
        summary.output.display()
    ));
    Ok(())
}
