//! Configuration loading from TOML files

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use oamods_classify::{ClassifyClient, DEFAULT_CLASSIFY_URL, DEFAULT_LEVELS};
use oamods_mods::LookupTables;
use oamods_openalex::config::{DEFAULT_BASE_URL, DEFAULT_RECORDS_FILE};

/// Global configuration for oamods
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub openalex: OpenAlexConfig,
    pub classify: ClassifyConfig,
    pub output: OutputConfig,
    pub tables: TablesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenAlexConfig {
    pub base_url: String,
    #[serde(deserialize_with = "deserialize_env_var")]
    pub mailto: Option<String>,
    /// OpenAlex work IDs to fetch
    pub ids: Vec<String>,
    /// DOIs to fetch
    pub dois: Vec<String>,
}

impl Default for OpenAlexConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            mailto: std::env::var("OAMODS_MAILTO").ok(),
            ids: Vec::new(),
            dois: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    pub url: String,
    pub classes: u32,
    /// Specificity levels, tried in order
    pub levels: Vec<u8>,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CLASSIFY_URL.to_string(),
            classes: 1,
            levels: DEFAULT_LEVELS.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Intermediate JSON array of raw work records
    pub records_file: PathBuf,
    /// MODS file stem; `run` appends the date (`openalex251019.xml`)
    pub xml_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            records_file: PathBuf::from(DEFAULT_RECORDS_FILE),
            xml_prefix: "openalex".to_string(),
        }
    }
}

/// Extra lookup entries on top of the built-in tables
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TablesConfig {
    /// ISO 639-1 -> ISO 639-2/B
    pub languages: BTreeMap<String, String>,
    /// ISO 3166-1 alpha-2 -> country name
    pub countries: BTreeMap<String, String>,
}

/// `mailto` may reference the environment (`${OAMODS_MAILTO}`)
fn deserialize_env_var<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| expand_env_var(&s)))
}

/// Substitute every `${VAR}` in `s`; `None` if any variable is unset
fn expand_env_var(s: &str) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let name = &rest[start + 2..start + 2 + len];
        out.push_str(&std::env::var(name).ok()?);
        rest = &rest[start + 3 + len..];
    }
    out.push_str(rest);
    Some(out)
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./oamods.toml (current directory)
    /// 2. ~/.config/oamods/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("oamods.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "oamods") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Built-in lookup tables plus the configured extras
    pub fn lookup_tables(&self) -> LookupTables {
        LookupTables::builtin()
            .with_languages(self.tables.languages.clone())
            .with_countries(self.tables.countries.clone())
    }

    /// Fetch-stage config writing to `output`
    pub fn fetch_config(&self, output: PathBuf) -> oamods_openalex::Config {
        oamods_openalex::Config {
            base_url: self.openalex.base_url.clone(),
            mailto: self.openalex.mailto.clone(),
            ids: self.openalex.ids.clone(),
            dois: self.openalex.dois.clone(),
            output,
        }
    }

    pub fn classify_client(&self) -> ClassifyClient {
        ClassifyClient::new(
            self.classify.url.clone(),
            self.classify.classes,
            self.classify.levels.clone(),
        )
    }

    /// `<prefix>.xml`, the transform default
    pub fn default_xml_file(&self) -> PathBuf {
        PathBuf::from(format!("{}.xml", self.output.xml_prefix))
    }
}
