//! Document builder (spec §4.10, component C10).
//!
//! Assembles a format-neutral tree from the analyzed plan so any renderer
//! (Markdown, plain text, HTML, ...) can walk the same structure. This
//! engine ships only the minimal text renderer; richer backends live above
//! this crate.

use crate::config::Config;
use crate::plan::aggregator;
use crate::plan::model::{PlanSummary, PropertyChangeAnalysis, ResourceChange};
use crate::plan::table::{self, TableRow};
use crate::plan::value::Value;

#[derive(Debug, Clone)]
pub enum Content {
    Text(String),
    Table {
        title: String,
        columns: Vec<String>,
        rows: Vec<Vec<Content>>,
    },
    Section {
        title: String,
        content: Vec<Content>,
    },
    CollapsibleValue {
        summary: String,
        detail: String,
        initially_expanded: bool,
    },
}

#[derive(Debug, Clone)]
pub struct Document {
    pub title: String,
    pub content: Vec<Content>,
}

fn display_value(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => s.clone(),
        Value::List(items) => format!(
            "[{}]",
            items.iter().map(display_value).collect::<Vec<_>>().join(", ")
        ),
        Value::Map(_) => "{...}".to_string(),
    }
}

fn backend_cell(summary: &PlanSummary) -> String {
    if summary.backend.location.is_empty() || summary.backend.location == "-" {
        summary.backend.backend_type.clone()
    } else {
        format!("{} ({})", summary.backend.backend_type, summary.backend.location)
    }
}

fn plan_information_table(summary: &PlanSummary) -> Content {
    Content::Table {
        title: "Plan Information".to_string(),
        columns: vec![
            "Plan File".to_string(),
            "Version".to_string(),
            "Workspace".to_string(),
            "Backend".to_string(),
            "Created".to_string(),
        ],
        rows: vec![vec![
            Content::Text(summary.plan_file_path.clone()),
            Content::Text(summary.tool_version.clone()),
            Content::Text(summary.workspace.clone()),
            Content::Text(backend_cell(summary)),
            Content::Text(summary.created_at.clone()),
        ]],
    }
}

/// Column order per the Document Model surface: `Total Changes, Added,
/// Removed, Modified, Replacements, High Risk, Unmodified`.
fn summary_statistics_table(summary: &PlanSummary) -> Content {
    let stats = &summary.statistics;
    Content::Table {
        title: "Summary Statistics".to_string(),
        columns: vec![
            "Total Changes".to_string(),
            "Added".to_string(),
            "Removed".to_string(),
            "Modified".to_string(),
            "Replacements".to_string(),
            "High Risk".to_string(),
            "Unmodified".to_string(),
        ],
        rows: vec![vec![
            Content::Text(stats.total.to_string()),
            Content::Text(stats.to_add.to_string()),
            Content::Text(stats.to_destroy.to_string()),
            Content::Text(stats.to_change.to_string()),
            Content::Text(stats.replacements.to_string()),
            Content::Text(stats.high_risk.to_string()),
            Content::Text(stats.unmodified.to_string()),
        ]],
    }
}

const RESOURCE_COLUMNS: &[&str] = &[
    "Action",
    "Resource",
    "Type",
    "ID",
    "Replacement",
    "Module",
    "Danger",
    "Property Changes",
];

/// Expansion policy per spec §4.10: `expand_all` wins outright; otherwise
/// `auto_expand_dangerous` starts a cell open when it carries a sensitive
/// change or belongs to a dangerous resource.
fn initially_expanded(config: &Config, analysis: &PropertyChangeAnalysis, is_dangerous: bool) -> bool {
    if config.expand_all {
        return true;
    }
    config.plan.expandable_sections.auto_expand_dangerous
        && (analysis.changes.iter().any(|c| c.sensitive) || is_dangerous)
}

fn property_changes_cell(analysis: &PropertyChangeAnalysis, config: &Config, is_dangerous: bool) -> Content {
    let sensitive_count = analysis.changes.iter().filter(|c| c.sensitive).count();
    let mut summary = format!("{} properties changed", analysis.count);
    if sensitive_count > 0 {
        summary.push_str(&format!(" ⚠️ ({} sensitive)", sensitive_count));
    }
    if analysis.truncated {
        summary.push_str(" [truncated]");
    }

    let detail = analysis
        .changes
        .iter()
        .map(|c| {
            let before = if c.sensitive {
                "(sensitive value)".to_string()
            } else {
                display_value(&c.before)
            };
            let after = if c.is_unknown {
                "(known after apply)".to_string()
            } else if c.sensitive {
                "(sensitive value)".to_string()
            } else {
                display_value(&c.after)
            };
            match c.action.as_str() {
                "add" => format!("+ {} = {}", c.name, after),
                "remove" => format!("- {} = {}", c.name, before),
                _ => format!("~ {} = {} \u{2192} {}", c.name, before, after),
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    Content::CollapsibleValue {
        summary,
        detail,
        initially_expanded: initially_expanded(config, analysis, is_dangerous),
    }
}

fn row_to_cells(row: &TableRow, config: &Config) -> Vec<Content> {
    // `decorate` clears `is_dangerous` after folding it into `action`/`danger`;
    // a non-empty `danger` reason is the only surviving signal by this point.
    let is_dangerous = row.danger.as_deref().is_some_and(|d| !d.is_empty());
    vec![
        Content::Text(row.action.clone().unwrap_or_default()),
        Content::Text(row.resource.clone().unwrap_or_default()),
        Content::Text(row.resource_type.clone().unwrap_or_default()),
        Content::Text(row.id.clone().unwrap_or_default()),
        Content::Text(row.replacement.clone().unwrap_or_default()),
        Content::Text(row.module.clone().unwrap_or_default()),
        Content::Text(row.danger.clone().unwrap_or_default()),
        row.property_changes
            .as_ref()
            .map(|analysis| property_changes_cell(analysis, config, is_dangerous))
            .unwrap_or_else(|| Content::Text(String::new())),
    ]
}

fn resource_table(title: &str, changes: &[ResourceChange], config: &Config) -> Content {
    let rows = table::build_table(changes)
        .iter()
        .map(|row| row_to_cells(row, config))
        .collect();
    Content::Table {
        title: title.to_string(),
        columns: RESOURCE_COLUMNS.iter().map(|s| s.to_string()).collect(),
        rows,
    }
}

fn resource_changes_section(summary: &PlanSummary, config: &Config) -> Content {
    let changes = &summary.resource_changes;
    if aggregator::grouping_active(changes, &config.plan.grouping) {
        let groups = aggregator::group_by_provider(changes);
        let sections = groups
            .into_iter()
            .map(|(provider, group)| Content::Section {
                title: provider,
                content: vec![resource_table("Resource Changes", &group, config)],
            })
            .collect();
        Content::Section {
            title: "Resource Changes".to_string(),
            content: sections,
        }
    } else {
        resource_table("Resource Changes", changes, config)
    }
}

/// Columns per the Document Model surface: `Name, Action, Current, Planned,
/// Sensitive`.
fn outputs_table(summary: &PlanSummary) -> Option<Content> {
    let any_relevant = summary
        .output_changes
        .iter()
        .any(|o| o.change_kind != crate::plan::model::ChangeKind::NoOp || o.sensitive || o.is_unknown);
    if !any_relevant {
        return None;
    }
    let rows = summary
        .output_changes
        .iter()
        .map(|o| {
            vec![
                Content::Text(o.name.clone()),
                Content::Text(o.indicator.clone()),
                Content::Text(display_value(&o.before)),
                Content::Text(display_value(&o.after)),
                Content::Text(o.sensitive.to_string()),
            ]
        })
        .collect();
    Some(Content::Table {
        title: "Outputs".to_string(),
        columns: vec![
            "Name".to_string(),
            "Action".to_string(),
            "Current".to_string(),
            "Planned".to_string(),
            "Sensitive".to_string(),
        ],
        rows,
    })
}

/// Builds the full document (spec §4.10). The Resource Changes section is
/// omitted entirely when every change is a no-op (spec P5).
pub fn build(summary: &PlanSummary, config: &Config) -> Document {
    let mut content = vec![plan_information_table(summary), summary_statistics_table(summary)];
    let any_changed = summary
        .resource_changes
        .iter()
        .any(|c| c.change_kind != crate::plan::model::ChangeKind::NoOp);
    if any_changed {
        content.push(resource_changes_section(summary, config));
    }
    if let Some(outputs) = outputs_table(summary) {
        content.push(outputs);
    }
    Document {
        title: "Terraform Plan Summary".to_string(),
        content,
    }
}
