//! The plan analysis engine: a pure, deterministic function of
//! `(plan, config)` that turns a parsed infrastructure-tool plan document
//! into a format-neutral summary document.

pub mod aggregator;
pub mod analyzer;
pub mod classifier;
pub mod differ;
pub mod document;
pub mod ingest;
pub mod limits;
pub mod model;
pub mod outputs;
pub mod shadow;
pub mod sort;
pub mod table;
pub mod value;

pub use analyzer::Analyzer;
pub use document::Document;
pub use ingest::{generate_summary, NullMetadataProvider, PlanMetadataProvider};
pub use model::PlanSummary;
