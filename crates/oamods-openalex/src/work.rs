//! OpenAlex work record, deserialized leniently from the API's JSON.
//!
//! Only the fields the MODS mapping reads are modelled. Every field is
//! optional or defaulted so that sparse records (no source, no biblio,
//! `null` authorships) still load.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::abstract_words::join_index_keys;

const DOI_PREFIX: &str = "https://doi.org/";
const PMID_PREFIX: &str = "https://pubmed.ncbi.nlm.nih.gov/";

/// OpenAlex Work JSON structure
#[derive(Debug, Default, Deserialize)]
pub struct WorkRecord {
    /// OpenAlex ID (e.g., "https://openalex.org/W2741809807")
    #[serde(default)]
    pub id: String,

    /// DOI as URL ("https://doi.org/10.1/x"); sometimes the literal "none"
    #[serde(default)]
    pub doi: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub publication_year: Option<i32>,

    /// ISO 639-1 code, or an object carrying it under `lang`
    #[serde(default)]
    pub language: Option<Value>,

    /// Crossref publication type (journal-article, book-chapter, ...)
    #[serde(default)]
    pub type_crossref: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub authorships: Vec<Authorship>,

    #[serde(default)]
    pub primary_location: Option<Location>,

    #[serde(default)]
    pub biblio: Option<Biblio>,

    /// IDs from other systems
    #[serde(default)]
    pub ids: Option<ExternalIds>,

    /// Abstract as inverted index (word -> positions)
    #[serde(default)]
    pub abstract_inverted_index: Option<Map<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Authorship {
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub institutions: Vec<Institution>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub display_name: Option<String>,
    /// ORCID as URL ("https://orcid.org/0000-...")
    #[serde(default)]
    pub orcid: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Institution {
    #[serde(default)]
    pub display_name: Option<String>,
    /// ISO 3166-1 alpha-2
    #[serde(default)]
    pub country_code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub is_oa: Option<bool>,
    #[serde(default)]
    pub landing_page_url: Option<String>,
    #[serde(default)]
    pub source: Option<Source>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub host_organization_name: Option<String>,
    #[serde(default)]
    pub issn_l: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Biblio {
    #[serde(default)]
    pub volume: Option<String>,
    #[serde(default)]
    pub issue: Option<String>,
    #[serde(default)]
    pub first_page: Option<String>,
    #[serde(default)]
    pub last_page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExternalIds {
    #[serde(default)]
    pub pmid: Option<String>,
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `Some(s)` unless empty or the literal "none" (any case).
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("none"))
}

/// Strip the resolver prefix from a DOI ("https://doi.org/10.1/x" -> "10.1/x").
pub fn strip_doi_prefix(doi: &str) -> &str {
    doi.strip_prefix(DOI_PREFIX).unwrap_or(doi)
}

impl WorkRecord {
    /// Extract short ID from full URL (e.g., "https://openalex.org/W123" -> "W123")
    pub fn short_id(&self) -> &str {
        self.id
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.id)
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Bare DOI, if the record has a usable one
    pub fn doi(&self) -> Option<&str> {
        present(self.doi.as_deref()).map(strip_doi_prefix)
    }

    /// Any non-empty `doi` string, including the literal "none"
    pub fn has_raw_doi(&self) -> bool {
        self.doi.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Bare PubMed ID, if the record has a usable one
    pub fn pmid(&self) -> Option<&str> {
        let pmid = present(self.ids.as_ref().and_then(|ids| ids.pmid.as_deref()))?;
        Some(pmid.strip_prefix(PMID_PREFIX).unwrap_or(pmid))
    }

    /// Two-letter language code from either `"sv"` or `{"lang": "sv"}`
    pub fn language_code(&self) -> Option<&str> {
        let code = match self.language.as_ref()? {
            Value::String(code) => Some(code.as_str()),
            Value::Object(obj) => obj.get("lang").and_then(Value::as_str),
            _ => None,
        };
        code.filter(|code| !code.is_empty())
    }

    pub fn type_crossref(&self) -> &str {
        self.type_crossref.as_deref().unwrap_or("")
    }

    pub fn source(&self) -> Option<&Source> {
        self.primary_location.as_ref()?.source.as_ref()
    }

    /// Open access flag of the primary location
    pub fn is_oa(&self) -> bool {
        self.primary_location
            .as_ref()
            .and_then(|loc| loc.is_oa)
            .unwrap_or(false)
    }

    pub fn landing_page_url(&self) -> &str {
        self.primary_location
            .as_ref()
            .and_then(|loc| loc.landing_page_url.as_deref())
            .unwrap_or("")
    }

    /// ISSN-L of the primary source
    pub fn issn_l(&self) -> Option<&str> {
        self.source()
            .and_then(|s| s.issn_l.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Abstract words for classification, `None` when there is no abstract
    pub fn abstract_text(&self) -> Option<String> {
        self.abstract_inverted_index
            .as_ref()
            .map(join_index_keys)
            .filter(|s| !s.is_empty())
    }
}
