//! Fetch works from the OpenAlex API and persist them as a JSON array.
//!
//! One GET per identifier, IDs first, then DOIs, in the order given. The
//! first failure aborts the whole fetch before anything is written, so a
//! records file on disk is always a complete batch.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use indicatif::ProgressBar;
use serde_json::Value;

use oamods_core::HttpError;

use crate::config::Config;
use crate::work::{WorkRecord, strip_doi_prefix};

/// Error from the fetch stage
#[derive(Debug)]
pub enum FetchError {
    /// A request failed (transport, non-2xx status, or non-JSON body)
    Request { url: String, source: HttpError },
    /// The records file could not be written
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Request { url, source } => write!(f, "GET {url}: {source}"),
            Self::Write { path, source } => write!(f, "cannot write {}: {source}", path.display()),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request { source, .. } => Some(source),
            Self::Write { source, .. } => Some(source),
        }
    }
}

/// Summary of a completed fetch
#[derive(Debug, Clone)]
pub struct FetchSummary {
    pub records: usize,
    pub output: PathBuf,
}

/// Client for the works endpoint
#[derive(Debug, Clone)]
pub struct Fetcher {
    base_url: String,
    user_agent: String,
}

impl Fetcher {
    pub fn new(base_url: &str, user_agent: impl Into<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.base_url, config.user_agent())
    }

    /// `<base>/<id>`
    pub fn work_url(&self, id: &str) -> String {
        format!("{}/{id}", self.base_url)
    }

    /// `<base>/https://doi.org/<doi>`, accepting bare or resolver-prefixed DOIs
    pub fn doi_url(&self, doi: &str) -> String {
        format!("{}/https://doi.org/{}", self.base_url, strip_doi_prefix(doi))
    }

    /// Fetch a single work as raw JSON
    pub fn fetch_one(&self, url: &str) -> Result<Value, FetchError> {
        log::debug!("GET {url}");
        oamods_core::get_json(url, &[("User-Agent", self.user_agent.as_str())]).map_err(|source| {
            FetchError::Request {
                url: url.to_string(),
                source,
            }
        })
    }

    /// Fetch all IDs then all DOIs, in order. Empty identifiers are skipped.
    pub fn fetch_all(
        &self,
        ids: &[String],
        dois: &[String],
        pb: &ProgressBar,
    ) -> Result<Vec<Value>, FetchError> {
        let urls: Vec<(String, &str)> = ids
            .iter()
            .map(|id| (id, self.work_url(id.trim())))
            .chain(dois.iter().map(|doi| (doi, self.doi_url(doi.trim()))))
            .filter_map(|(key, url)| {
                if key.trim().is_empty() {
                    log::warn!("Skipping empty identifier");
                    None
                } else {
                    Some((url, key.as_str()))
                }
            })
            .collect();

        pb.set_length(urls.len() as u64);
        let mut records = Vec::with_capacity(urls.len());
        for (url, key) in &urls {
            pb.set_message(key.to_string());
            records.push(self.fetch_one(url)?);
            pb.inc(1);
        }
        Ok(records)
    }
}

/// Write records as a pretty-printed JSON array (UTF-8)
pub fn save_records(path: &Path, records: &[Value]) -> Result<(), FetchError> {
    let write = || -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.write_all(b"\n")?;
        writer.flush()
    };
    write().map_err(|source| FetchError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a records file written by [`save_records`]
pub fn load_records(path: &Path) -> anyhow::Result<Vec<WorkRecord>> {
    anyhow::ensure!(path.exists(), "input file '{}' was not found", path.display());
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid records JSON in {}", path.display()))
}

/// Fetch everything the config names and save it to `config.output`.
///
/// Nothing is written if any request fails.
pub fn run(config: &Config, pb: &ProgressBar) -> Result<FetchSummary, FetchError> {
    if config.ids.is_empty() && config.dois.is_empty() {
        log::warn!("No OpenAlex IDs or DOIs configured, writing an empty record list");
    }

    let fetcher = Fetcher::from_config(config);
    let records = fetcher.fetch_all(&config.ids, &config.dois, pb)?;
    save_records(&config.output, &records)?;

    log::info!(
        "Records successfully fetched and saved to {} ({} records)",
        config.output.display(),
        records.len()
    );
    Ok(FetchSummary {
        records: records.len(),
        output: config.output.clone(),
    })
}
