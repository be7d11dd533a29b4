//! oamods - OpenAlex to MODS pipeline
//!
//! Fetches work records from OpenAlex, converts them to MODS XML and
//! adds Swepub subject classifications.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "oamods")]
#[command(about = "OpenAlex to MODS pipeline with Swepub subject classification")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./oamods.toml or ~/.config/oamods/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch work records from OpenAlex
    Fetch(cmd::fetch::FetchArgs),
    /// Convert fetched records to MODS XML
    Transform(cmd::transform::TransformArgs),
    /// Add subject classifications to a MODS file
    Enrich(cmd::enrich::EnrichArgs),
    /// Fetch, transform and enrich in one pass
    Run(cmd::run::RunArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let progress = Arc::new(oamods_core::ProgressContext::new());

    // TTY: warn unless --debug, spinners show activity
    // non-TTY: info unless --debug
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = if is_tty { !cli.debug } else { false };
    oamods_core::init_logging(quiet, cli.debug, multi);

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Command::Fetch(args) => cmd::fetch::run(args, &config, &progress),
        Command::Transform(args) => cmd::transform::run(args, &config, &progress),
        Command::Enrich(args) => cmd::enrich::run(args, &config, &progress),
        Command::Run(args) => cmd::run::run(args, &config, &progress),
        Command::Config => {
            use comfy_table::{
                Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
            };

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec![
                    Cell::new("Setting").fg(Color::Cyan),
                    Cell::new("Value").fg(Color::Cyan),
                ]);

            table.add_row(vec!["OA base URL", &config.openalex.base_url]);
            table.add_row(vec![
                "OA mailto",
                config.openalex.mailto.as_deref().unwrap_or("not set"),
            ]);
            table.add_row(vec![
                "Work IDs / DOIs",
                &format!(
                    "{} / {}",
                    config.openalex.ids.len(),
                    config.openalex.dois.len()
                ),
            ]);
            table.add_row(vec!["Classify URL", &config.classify.url]);
            table.add_row(vec![
                "Classify levels",
                &format!(
                    "{:?} ({} class)",
                    config.classify.levels, config.classify.classes
                ),
            ]);
            table.add_row(vec![
                "Records file",
                &config.output.records_file.display().to_string(),
            ]);
            table.add_row(vec!["XML prefix", &config.output.xml_prefix]);
            let tables = config.lookup_tables();
            table.add_row(vec![
                "Lookup tables",
                &format!(
                    "{} languages, {} countries",
                    tables.language_count(),
                    tables.country_count()
                ),
            ]);

            eprintln!("\n{table}");
            Ok(())
        }
    }
}
