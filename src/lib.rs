//! A pure, deterministic engine that turns a parsed infrastructure-as-code
//! execution plan into a format-neutral change summary: deep property
//! diffing, sensitivity/unknown-aware masking, danger classification, and
//! document assembly. It does not execute plans, mutate infrastructure, or
//! talk to any network service.

pub mod config;
pub mod error;
pub mod loader;
pub mod plan;
pub mod render;

pub use config::Config;
pub use error::{PlanError, Result};
pub use plan::{generate_summary, Analyzer, Document, PlanMetadataProvider, PlanSummary};
