//! Enrich subcommand - add Swepub subject codes to a MODS file

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use oamods_classify::EnrichSummary;
use oamods_core::SharedProgress;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct EnrichArgs {
    /// Records JSON the XML was built from (default: openalex_records.json)
    pub input: Option<PathBuf>,

    /// MODS XML file to update in place (default: openalex.xml)
    pub xml: Option<PathBuf>,
}

/// Classify every record in `records` and rewrite `xml`
pub fn enrich(
    records: &Path,
    xml: &Path,
    config: &Config,
    progress: &SharedProgress,
) -> Result<EnrichSummary> {
    let client = config.classify_client();
    let pb = progress.stage_line("enrich", 0);
    let result = oamods_classify::enrich_file(records, xml, &client, &pb);
    pb.finish_and_clear();
    result
}

pub fn run(args: EnrichArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let records = args
        .input
        .unwrap_or_else(|| config.output.records_file.clone());
    let xml = args.xml.unwrap_or_else(|| config.default_xml_file());

    let summary = enrich(&records, &xml, config, progress)?;
    progress.println(format!(
        "Classified {} records ({} without abstract, {} failed) -> {}",
        summary.classified,
        summary.no_abstract,
        summary.failed,
        xml.display()
    ));
    Ok(())
}
