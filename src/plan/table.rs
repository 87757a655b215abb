//! Table data pipeline (spec §4.9, component C9).
//!
//! Rows carry `Option` fields throughout so the pipeline stays defensive
//! against a caller that builds a `TableRow` by hand and leaves something
//! out (spec §4.9's missing-field defaults), even though the row built from
//! a `ResourceChange` here always populates every field.

use crate::plan::model::{ChangeKind, PropertyChangeAnalysis, ResourceChange};

#[derive(Debug, Clone, Default)]
pub struct TableRow {
    pub action_type: Option<String>,
    pub is_dangerous: Option<bool>,
    pub resource: Option<String>,
    pub resource_type: Option<String>,
    pub id: Option<String>,
    pub replacement: Option<String>,
    pub module: Option<String>,
    pub danger: Option<String>,
    pub property_changes: Option<PropertyChangeAnalysis>,
    /// Populated by [`decorate`], replacing `action_type`/`is_dangerous`.
    pub action: Option<String>,
}

fn row_id(change: &ResourceChange) -> String {
    match change.change_kind {
        ChangeKind::Delete => change.physical_id.clone(),
        ChangeKind::Create => "-".to_string(),
        _ => change.planned_id.clone(),
    }
}

fn action_type_for(change: &ResourceChange) -> &'static str {
    change.change_kind.verb()
}

/// Flattens resources into rows, filtering no-ops (spec §4.9 step 1-2).
pub fn build_rows(changes: &[ResourceChange]) -> Vec<TableRow> {
    changes
        .iter()
        .filter(|c| c.change_kind != ChangeKind::NoOp)
        .map(|c| TableRow {
            action_type: Some(action_type_for(c).to_string()),
            is_dangerous: Some(c.is_dangerous),
            resource: Some(c.address.clone()),
            resource_type: Some(c.resource_type.clone()),
            id: Some(row_id(c)),
            replacement: Some(
                if matches!(c.replacement_type, crate::plan::model::ReplacementType::Always) {
                    "Always".to_string()
                } else {
                    "Never".to_string()
                },
            ),
            module: Some(c.module_path.clone()),
            danger: Some(if c.is_dangerous {
                c.danger_reason.clone()
            } else {
                String::new()
            }),
            property_changes: Some(c.property_changes.clone()),
            action: None,
        })
        .collect()
}

fn action_priority(action_type: Option<&str>) -> u8 {
    match action_type {
        Some("Remove") => 0,
        Some("Replace") => 1,
        Some("Modify") => 2,
        Some("Add") => 3,
        _ => 4,
    }
}

/// Sorts rows by `(¬IsDangerous, action_priority, address ASC)`, stable
/// (spec §4.9 step 3).
pub fn sort_rows(rows: &mut [TableRow]) {
    rows.sort_by(|a, b| {
        let dangerous_a = a.is_dangerous.unwrap_or(false);
        let dangerous_b = b.is_dangerous.unwrap_or(false);
        // ¬IsDangerous ascending means dangerous (true) sorts first.
        dangerous_b
            .cmp(&dangerous_a)
            .then_with(|| {
                action_priority(a.action_type.as_deref())
                    .cmp(&action_priority(b.action_type.as_deref()))
            })
            .then_with(|| {
                let resource_a = a.resource.clone().unwrap_or_default();
                let resource_b = b.resource.clone().unwrap_or_default();
                resource_a.cmp(&resource_b)
            })
    });
}

/// Decorates dangerous rows with a warning glyph and collapses
/// `action_type`/`is_dangerous` into `action` (spec §4.9 step 4).
pub fn decorate(rows: &mut [TableRow]) {
    for row in rows.iter_mut() {
        let action_type = row.action_type.clone().unwrap_or_default();
        let is_dangerous = row.is_dangerous.unwrap_or(false);
        row.action = Some(if is_dangerous {
            format!("\u{26a0}\u{fe0f} {}", action_type)
        } else {
            action_type
        });
        row.action_type = None;
        row.is_dangerous = None;
    }
}

/// Runs the full pipeline (spec §4.9).
pub fn build_table(changes: &[ResourceChange]) -> Vec<TableRow> {
    let mut rows = build_rows(changes);
    sort_rows(&mut rows);
    decorate(&mut rows);
    rows
}
