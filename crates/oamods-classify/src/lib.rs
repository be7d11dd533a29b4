//! oamods Classify - Swepub subject classification for MODS records
//!
//! Each record's abstract words and title are posted to the Swepub
//! Classify API; the best-scoring code becomes a `<subject>` on the
//! matching `<mods>` node.

pub mod client;
pub mod enrich;

// Re-exports for convenience
pub use client::{
    ClassifyClient, ClassifyError, Classifier, DEFAULT_CLASSIFY_URL, DEFAULT_LEVELS,
    best_suggestion,
};
pub use enrich::{EnrichSummary, enrich_collection, enrich_file, subject_element};
