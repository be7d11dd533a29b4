//! oamods MODS - OpenAlex works to MODS 3.7 XML
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use oamods_mods::{LookupTables, transform_file};
//!
//! let tables = LookupTables::builtin();
//! let summary = transform_file(
//!     Path::new("openalex_records.json"),
//!     Path::new("openalex.xml"),
//!     &tables,
//! )
//! .expect("transform failed");
//! println!("Wrote {} records", summary.records);
//! ```

pub mod tables;
pub mod transform;
pub mod xml;

// Re-exports for convenience
pub use tables::LookupTables;
pub use transform::{
    MODS_NS, MODS_SCHEMA_LOCATION, TransformSummary, Transformer, XLINK_NS, XSI_NS,
    transform_file,
};
pub use xml::{Element, Node};
