pub mod enrich;
pub mod fetch;
pub mod run;
pub mod transform;
