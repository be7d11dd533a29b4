//! Swepub Classify API client

use serde::{Deserialize, Serialize};

use oamods_core::HttpError;

pub const DEFAULT_CLASSIFY_URL: &str = "https://bibliometri.swepub.kb.se/api/v1/classify";

/// Specificity levels tried in order until one yields suggestions
pub const DEFAULT_LEVELS: &[u8] = &[5, 3];

/// Anything that can turn (abstract, title) into a subject code
pub trait Classifier {
    fn classify(&self, abstract_text: &str, title: &str) -> Result<String, ClassifyError>;
}

/// Error classifying a single record
#[derive(Debug)]
pub enum ClassifyError {
    /// Every level answered 200 but without suggestions
    NoSuggestions,
    /// Every level was refused; holds the last status
    Rejected { status: u16 },
    /// Transport failure or undecodable body
    Http(HttpError),
}

impl std::fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSuggestions => write!(f, "no suggestions found in API response"),
            Self::Rejected { status } => write!(f, "classify API answered HTTP {status}"),
            Self::Http(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ClassifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<HttpError> for ClassifyError {
    fn from(e: HttpError) -> Self {
        Self::Http(e)
    }
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    #[serde(rename = "abstract")]
    abstract_text: &'a str,
    keywords: &'a str,
    classes: u32,
    level: u8,
    title: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct Suggestion {
    pub code: String,
    #[serde(rename = "_score")]
    pub score: f64,
}

/// Outcome of one request at one level
#[derive(Debug)]
enum Attempt {
    Code(String),
    Empty,
    Refused(u16),
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    #[serde(default)]
    suggestions: Vec<Suggestion>,
}

/// Highest-scoring suggestion; the first one wins ties
pub fn best_suggestion(suggestions: &[Suggestion]) -> Option<&Suggestion> {
    suggestions
        .iter()
        .reduce(|best, s| if s.score > best.score { s } else { best })
}

/// HTTP client for the classify endpoint
#[derive(Debug, Clone)]
pub struct ClassifyClient {
    url: String,
    classes: u32,
    levels: Vec<u8>,
}

impl ClassifyClient {
    pub fn new(url: impl Into<String>, classes: u32, levels: Vec<u8>) -> Self {
        Self {
            url: url.into(),
            classes,
            levels,
        }
    }

    fn classify_at(
        &self,
        abstract_text: &str,
        title: &str,
        level: u8,
    ) -> Result<Attempt, HttpError> {
        let request = ClassifyRequest {
            abstract_text,
            keywords: "",
            classes: self.classes,
            level,
            title,
        };
        let body = serde_json::to_value(&request).map_err(HttpError::Decode)?;
        let response = oamods_core::post_json(&self.url, &body)?;
        if !response.is_ok() {
            return Ok(Attempt::Refused(response.status));
        }
        let parsed: ClassifyResponse = response.json()?;
        Ok(match best_suggestion(&parsed.suggestions) {
            Some(best) => Attempt::Code(best.code.clone()),
            None => Attempt::Empty,
        })
    }
}

impl Default for ClassifyClient {
    fn default() -> Self {
        Self::new(DEFAULT_CLASSIFY_URL, 1, DEFAULT_LEVELS.to_vec())
    }
}

impl Classifier for ClassifyClient {
    fn classify(&self, abstract_text: &str, title: &str) -> Result<String, ClassifyError> {
        let mut last_status = None;
        for &level in &self.levels {
            match self.classify_at(abstract_text, title, level)? {
                Attempt::Code(code) => {
                    log::debug!("level {level}: best code {code}");
                    return Ok(code);
                }
                Attempt::Empty => {
                    log::debug!("level {level}: no suggestions");
                    last_status = None;
                }
                Attempt::Refused(status) => {
                    log::debug!("level {level}: HTTP {status}");
                    last_status = Some(status);
                }
            }
        }
        Err(match last_status {
            Some(status) => ClassifyError::Rejected { status },
            None => ClassifyError::NoSuggestions,
        })
    }
}
