//! Error taxonomy for the plan analysis engine (spec §7).
//!
//! Most failure kinds here are recovered from internally — an
//! [`InputShapeError`](PlanError::InputShapeError) causes the offending
//! resource record to be skipped, a [`MetadataUnavailable`](PlanError::MetadataUnavailable)
//! leaves `created_at` at its zero value — so callers will rarely see this
//! type surface. [`PlanError::Config`] is the one fatal variant: it aborts
//! `Analyzer` construction.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("malformed plan record: {0}")]
    InputShapeError(String),

    #[error("plan file metadata unavailable: {0}")]
    MetadataUnavailable(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to parse plan JSON: {0}")]
    JsonParse(String),
}

impl From<serde_json::Error> for PlanError {
    fn from(err: serde_json::Error) -> Self {
        PlanError::JsonParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
