//! `oamods run` - fetch, transform and enrich in one pass

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use oamods_core::SharedProgress;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// MODS output file (default: <xml_prefix><YYMMDD>.xml)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// `<prefix><YYMMDD>.xml`
pub fn dated_xml_path(prefix: &str, date: NaiveDate) -> PathBuf {
    PathBuf::from(format!("{prefix}{}.xml", date.format("%y%m%d")))
}

pub fn run(args: RunArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let records_file = config.output.records_file.clone();
    let xml_file = args.output.unwrap_or_else(|| {
        dated_xml_path(&config.output.xml_prefix, chrono::Local::now().date_naive())
    });

    // 1. Fetch
    let fetch = config.fetch_config(records_file.clone());
    let pb = progress.stage_line("fetch", 0);
    let fetched = oamods_openalex::run(&fetch, &pb);
    pb.finish_and_clear();
    let fetched = fetched.context("fetch stage failed")?;

    // 2. Transform
    let tables = config.lookup_tables();
    let transformed = oamods_mods::transform_file(&records_file, &xml_file, &tables)
        .context("transform stage failed")?;

    // 3. Enrich (failures leave the unenriched XML in place)
    let enriched = match super::enrich::enrich(&records_file, &xml_file, config, progress) {
        Ok(summary) => Some(summary),
        Err(e) => {
            log::error!("Enrichment failed: {e:#}");
            None
        }
    };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Stage").fg(Color::Cyan),
            Cell::new("Result").fg(Color::Cyan),
            Cell::new("File").fg(Color::Cyan),
        ]);
    table.add_row(vec![
        Cell::new("fetch"),
        Cell::new(format!("{} records", fetched.records)),
        Cell::new(fetched.output.display()),
    ]);
    table.add_row(vec![
        Cell::new("transform"),
        Cell::new(format!("{} mods", transformed.records)),
        Cell::new(transformed.output.display()),
    ]);
    let enrich_result = match enriched {
        Some(s) => format!(
            "{} classified, {} no abstract, {} failed",
            s.classified, s.no_abstract, s.failed
        ),
        None => "FAILED".to_string(),
    };
    table.add_row(vec![
        Cell::new("enrich"),
        Cell::new(enrich_result),
        Cell::new(xml_file.display()),
    ]);

    progress.println(format!("\n{table}"));
    Ok(())
}
