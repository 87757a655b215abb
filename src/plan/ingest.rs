//! Plan ingestion (spec §6.1).
//!
//! Consumes an already-parsed plan JSON document and projects it into the
//! normalized inputs C5/C6 expect. A malformed resource record is skipped
//! (`InputShapeError`, logged and recovered per spec §7) rather than
//! failing the whole plan; `ConfigError` from `Analyzer::new` is the only
//! failure surfaced to the caller.

use serde_json::Value as Json;

use crate::config::Config;
use crate::error::Result;
use crate::plan::analyzer::{Analyzer, ResourceChangeInput};
use crate::plan::model::{BackendInfo, PlanSummary};
use crate::plan::outputs::{self, OutputChangeInput};
use crate::plan::value::Value;

/// External collaborators the core calls out to (spec §6.1). Both may fail
/// or be partial; failures are recovered in-band, never propagated.
pub trait PlanMetadataProvider {
    fn workspace_backend(&self, plan: &Json) -> (String, BackendInfo);
    fn plan_file_metadata(&self, plan_file_path: &str) -> Option<String>;
}

/// A no-op provider: empty workspace/backend, no timestamp. Useful for
/// callers that have no filesystem or configuration context to offer.
pub struct NullMetadataProvider;

impl PlanMetadataProvider for NullMetadataProvider {
    fn workspace_backend(&self, _plan: &Json) -> (String, BackendInfo) {
        (String::new(), BackendInfo::default())
    }

    fn plan_file_metadata(&self, _plan_file_path: &str) -> Option<String> {
        None
    }
}

fn as_str_or_default(v: &Json, key: &str) -> String {
    v.get(key).and_then(|x| x.as_str()).unwrap_or_default().to_string()
}

fn normalize_replace_path(elem: &Json) -> Option<Vec<String>> {
    match elem {
        Json::String(s) => Some(vec![s.clone()]),
        Json::Array(items) => Some(
            items
                .iter()
                .map(|x| match x {
                    Json::String(s) => s.clone(),
                    Json::Number(n) => n.to_string(),
                    _ => String::new(),
                })
                .collect(),
        ),
        _ => None,
    }
}

fn replace_paths_of(change: &Json) -> Vec<Vec<String>> {
    change
        .get("replace_paths")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(normalize_replace_path).collect())
        .unwrap_or_default()
}

fn actions_of(change: &Json) -> Vec<String> {
    change
        .get("actions")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|x| x.as_str().map(|s| s.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

fn shadow_of(change: &Json, key: &str) -> Option<Value> {
    change.get(key).map(Value::from)
}

/// Builds one normalized input record from a raw `ResourceChangeIn` entry.
/// Returns `None` (an `InputShapeError`, logged) when `change` is missing.
fn parse_resource_change(entry: &Json) -> Option<ResourceChangeInput> {
    let address = as_str_or_default(entry, "address");
    let Some(change) = entry.get("change") else {
        tracing::warn!(address = %address, "resource change record missing `change`; skipping");
        return None;
    };

    Some(ResourceChangeInput {
        address: address.clone(),
        resource_type: as_str_or_default(entry, "type"),
        name: as_str_or_default(entry, "name"),
        actions: actions_of(change),
        before: change.get("before").map(Value::from).unwrap_or(Value::Null),
        after: change.get("after").map(Value::from).unwrap_or(Value::Null),
        before_sensitive: shadow_of(change, "before_sensitive"),
        after_sensitive: shadow_of(change, "after_sensitive"),
        after_unknown: shadow_of(change, "after_unknown"),
        replace_paths: replace_paths_of(change),
    })
}

fn parse_resource_changes(plan: &Json) -> Vec<ResourceChangeInput> {
    plan.get("resource_changes")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(parse_resource_change).collect())
        .unwrap_or_default()
}

fn parse_output_changes(plan: &Json) -> Vec<OutputChangeInput> {
    let Some(map) = plan.get("output_changes").and_then(|v| v.as_object()) else {
        return Vec::new();
    };
    map.iter()
        .map(|(name, change)| OutputChangeInput {
            name: name.clone(),
            actions: actions_of(change),
            before: change.get("before").map(Value::from).unwrap_or(Value::Null),
            after: change.get("after").map(Value::from).unwrap_or(Value::Null),
            before_sensitive: change
                .get("before_sensitive")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            after_sensitive: change
                .get("after_sensitive")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            after_unknown: change
                .get("after_unknown")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        })
        .collect()
}

/// The core's single entry point (spec §6.1): `generate_summary(plan,
/// plan_file_path, config) → PlanSummary`.
pub fn generate_summary(
    plan: &Json,
    plan_file_path: &str,
    config: Config,
    metadata: &dyn PlanMetadataProvider,
) -> Result<PlanSummary> {
    let analyzer = Analyzer::new(config)?;

    let (workspace, backend) = metadata.workspace_backend(plan);
    let created_at = metadata.plan_file_metadata(plan_file_path).unwrap_or_default();

    let resource_changes: Vec<_> = parse_resource_changes(plan)
        .iter()
        .map(|raw| analyzer.analyze_resource(raw))
        .collect();

    let output_changes = parse_output_changes(plan)
        .iter()
        .map(outputs::analyze_output)
        .collect();

    let statistics = crate::plan::aggregator::statistics(&resource_changes);

    Ok(PlanSummary {
        format_version: as_str_or_default(plan, "format_version"),
        tool_version: as_str_or_default(plan, "terraform_version"),
        plan_file_path: plan_file_path.to_string(),
        workspace,
        backend,
        created_at,
        statistics,
        resource_changes,
        output_changes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn p10_empty_plan_is_not_an_error() {
        let plan = json!({"format_version": "1.2", "terraform_version": "1.7.0"});
        let summary =
            generate_summary(&plan, "plan.json", Config::default(), &NullMetadataProvider).unwrap();
        assert!(summary.resource_changes.is_empty());
        assert_eq!(summary.statistics.total, 0);
    }

    #[test]
    fn malformed_resource_record_is_skipped_not_fatal() {
        let plan = json!({
            "resource_changes": [
                {"address": "aws_instance.bad"},
                {
                    "address": "aws_instance.good",
                    "type": "aws_instance",
                    "name": "good",
                    "change": {"actions": ["create"], "before": null, "after": {"id": "i-1"}}
                }
            ]
        });
        let summary =
            generate_summary(&plan, "plan.json", Config::default(), &NullMetadataProvider).unwrap();
        assert_eq!(summary.resource_changes.len(), 1);
        assert_eq!(summary.resource_changes[0].address, "aws_instance.good");
    }

    #[test]
    fn fatal_config_error_surfaces_to_caller() {
        let mut config = Config::default();
        config.plan.performance_limits.max_properties_per_resource = 0;
        let plan = json!({});
        assert!(generate_summary(&plan, "plan.json", config, &NullMetadataProvider).is_err());
    }

    #[test]
    fn replace_paths_normalize_strings_and_mixed_lists() {
        let plan = json!({
            "resource_changes": [{
                "address": "aws_instance.x",
                "type": "aws_instance",
                "name": "x",
                "change": {
                    "actions": ["update"],
                    "before": {"network_interface": [{"subnet_id": "a"}]},
                    "after": {"network_interface": [{"subnet_id": "b"}]},
                    "replace_paths": [["network_interface", 0, "subnet_id"]]
                }
            }]
        });
        let summary =
            generate_summary(&plan, "plan.json", Config::default(), &NullMetadataProvider).unwrap();
        assert_eq!(summary.resource_changes[0].change_kind, crate::plan::model::ChangeKind::Update);
        assert_eq!(
            summary.resource_changes[0].replacement_hints,
            vec!["network_interface.[0].subnet_id".to_string()]
        );
    }
}
