//! Transform subcommand - records JSON to MODS XML

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use oamods_core::SharedProgress;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Input records JSON; used only together with OUTPUT
    pub input: Option<PathBuf>,

    /// Output MODS XML; without both paths, openalex_records.json and openalex.xml are used
    pub output: Option<PathBuf>,
}

/// Resolve the (input, output) pair.
///
/// Both paths are taken from the command line only when both are given;
/// otherwise both fall back to the defaults.
pub fn resolve_paths(args: TransformArgs, config: &Config) -> (PathBuf, PathBuf) {
    match (args.input, args.output) {
        (Some(input), Some(output)) => (input, output),
        _ => {
            let input = config.output.records_file.clone();
            let output = config.default_xml_file();
            log::info!(
                "No input or output file provided. Using input file '{}' and output file '{}'",
                input.display(),
                output.display()
            );
            (input, output)
        }
    }
}

pub fn run(args: TransformArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let (input, output) = resolve_paths(args, config);
    let tables = config.lookup_tables();
    let summary = oamods_mods::transform_file(&input, &output, &tables)?;
    progress.println(format!(
        "Wrote {} MODS records -> {}",
        summary.records,
        summary.output.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_omitted() {
        let (input, output) = resolve_paths(
            TransformArgs {
                input: None,
                output: None,
            },
            &Config::default(),
        );
        assert_eq!(input, PathBuf::from("openalex_records.json"));
        assert_eq!(output, PathBuf::from("openalex.xml"));
    }

    #[test]
    fn lone_input_uses_both_defaults() {
        let (input, output) = resolve_paths(
            TransformArgs {
                input: Some("mine.json".into()),
                output: None,
            },
            &Config::default(),
        );
        assert_eq!(input, PathBuf::from("openalex_records.json"));
        assert_eq!(output, PathBuf::from("openalex.xml"));
    }

    #[test]
    fn explicit_paths_win() {
        let (input, output) = resolve_paths(
            TransformArgs {
                input: Some("in.json".into()),
                output: Some("out.xml".into()),
            },
            &Config::default(),
        );
        assert_eq!(input, PathBuf::from("in.json"));
        assert_eq!(output, PathBuf::from("out.xml"));
    }

    #[test]
    fn missing_input_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let args = TransformArgs {
            input: Some(dir.path().join("absent.json")),
            output: Some(dir.path().join("out.xml")),
        };
        let progress = std::sync::Arc::new(oamods_core::ProgressContext::with_tty(false));
        let err = run(args, &Config::default(), &progress).unwrap_err();
        assert!(err.to_string().contains("was not found"));
    }
}
