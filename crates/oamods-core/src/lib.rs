//! oamods Core - Common infrastructure for the OpenAlex-to-MODS pipeline
//!
//! Logging, progress reporting and the shared blocking HTTP facade used by
//! the fetch and classification stages.

pub mod http;
pub mod logging;
pub mod progress;

// Re-exports for convenience
pub use http::{HttpError, HttpResponse, SHARED_RUNTIME, get_json, post_json};
pub use logging::{IndicatifLogger, init_logging};
pub use progress::{ProgressContext, SharedProgress};
