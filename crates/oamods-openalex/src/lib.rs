//! oamods OpenAlex - Fetch work records from the OpenAlex REST API
//!
//! Records are requested one at a time by OpenAlex ID and by DOI, and
//! saved verbatim as a pretty-printed JSON array. The same file is later
//! read back as [`WorkRecord`]s by the transform and enrich stages.
//!
//! # Example
//!
//! ```no_run
//! use oamods_openalex::{Config, run};
//!
//! let config = Config {
//!     dois: vec!["10.1145/3770501.3770517".to_string()],
//!     ..Default::default()
//! };
//!
//! let summary = run(&config, &indicatif::ProgressBar::hidden()).expect("fetch failed");
//! println!("Saved {} records", summary.records);
//! ```

pub mod abstract_words;
pub mod config;
pub mod fetch;
pub mod work;

// Re-exports for convenience
pub use config::Config;
pub use fetch::{FetchError, FetchSummary, Fetcher, load_records, run, save_records};
pub use work::WorkRecord;
