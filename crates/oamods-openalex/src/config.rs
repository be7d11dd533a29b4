//! OpenAlex fetch configuration

use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://api.openalex.org/works";
pub const DEFAULT_RECORDS_FILE: &str = "openalex_records.json";

/// Runtime configuration for the fetch stage
#[derive(Debug, Clone)]
pub struct Config {
    /// Works endpoint, without trailing slash
    pub base_url: String,
    /// Contact address sent as `User-Agent: mailto=<address>`
    pub mailto: Option<String>,
    /// OpenAlex work IDs (W...), fetched first
    pub ids: Vec<String>,
    /// Bare DOIs, fetched after the IDs
    pub dois: Vec<String>,
    /// Where the JSON array of records is written
    pub output: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            mailto: None,
            ids: Vec::new(),
            dois: Vec::new(),
            output: PathBuf::from(DEFAULT_RECORDS_FILE),
        }
    }
}

impl Config {
    /// User-Agent header value identifying the caller
    pub fn user_agent(&self) -> String {
        match &self.mailto {
            Some(address) => format!("mailto={address}"),
            None => concat!("oamods/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
