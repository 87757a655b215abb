//! Core entities of the plan analysis engine (spec §3).

use serde::{Deserialize, Serialize};

use crate::plan::value::Value;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Create,
    Update,
    Delete,
    Replace,
    NoOp,
}

impl ChangeKind {
    /// Human verb used throughout the Document Model (spec §6.2, §6.3).
    pub fn verb(&self) -> &'static str {
        match self {
            ChangeKind::Create => "Add",
            ChangeKind::Update => "Modify",
            ChangeKind::Delete => "Remove",
            ChangeKind::Replace => "Replace",
            ChangeKind::NoOp => "No-op",
        }
    }

    /// Indicator glyph (spec §4.6, §6.3) used for output changes (C6):
    /// `Create→"+", Update→"~", Delete→"-"`, else `" "` — `Replace` falls
    /// through to the `else` arm, since spec §4.6 only names three kinds
    /// explicitly and outputs never carry a `Replace` classification in
    /// practice, but the mapping must still be total.
    pub fn indicator(&self) -> &'static str {
        match self {
            ChangeKind::Create => "+",
            ChangeKind::Update => "~",
            ChangeKind::Delete => "-",
            _ => " ",
        }
    }
}

/// Reserved per spec I2 / §9 open question: never produced by this engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReplacementType {
    Never,
    Always,
    Conditional,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// One entry in a resource's property diff (spec §3 `PropertyChange`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyChange {
    pub name: String,
    pub path: Vec<String>,
    pub before: Value,
    pub after: Value,
    pub sensitive: bool,
    pub is_unknown: bool,
    /// `""` or `"after"` per spec §3.
    pub unknown_type: String,
    pub triggers_replacement: bool,
    pub action: String,
    pub size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PropertyChangeAnalysis {
    pub changes: Vec<PropertyChange>,
    pub count: usize,
    pub total_size_bytes: usize,
    pub truncated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceChange {
    pub address: String,
    pub resource_type: String,
    pub name: String,
    pub provider: String,
    pub module_path: String,

    pub change_kind: ChangeKind,
    pub is_destructive: bool,
    pub replacement_type: ReplacementType,
    pub physical_id: String,
    pub planned_id: String,

    pub is_dangerous: bool,
    pub danger_reason: String,
    pub risk_level: RiskLevel,

    pub property_changes: PropertyChangeAnalysis,
    pub has_unknown_values: bool,
    pub unknown_properties: Vec<String>,
    pub top_changes: Vec<String>,
    pub replacement_hints: Vec<String>,

    pub before: Value,
    pub after: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputChange {
    pub name: String,
    pub change_kind: ChangeKind,
    pub sensitive: bool,
    pub is_unknown: bool,
    pub before: Value,
    pub after: Value,
    pub indicator: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChangeStatistics {
    pub to_add: usize,
    pub to_change: usize,
    pub to_destroy: usize,
    pub replacements: usize,
    pub unmodified: usize,
    pub high_risk: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BackendInfo {
    pub backend_type: String,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    pub format_version: String,
    pub tool_version: String,
    pub plan_file_path: String,
    pub workspace: String,
    pub backend: BackendInfo,
    /// RFC3339 timestamp, empty when metadata lookup failed or was skipped.
    pub created_at: String,

    pub statistics: ChangeStatistics,
    pub resource_changes: Vec<ResourceChange>,
    pub output_changes: Vec<OutputChange>,
}
