//! Resource analyzer (spec §4.5, component C5).
//!
//! Orchestrates the differ (C3) and classifier (C4) per resource, computes
//! identity fields, and maintains the provider-name cache (§4.5a): the hot
//! key set is one entry per distinct resource type in a plan, so a plain
//! `RwLock`-guarded map gives read-parallel, write-safe semantics without
//! needing a sharded or lock-free structure (spec §5, §9).

use std::collections::HashMap;
use std::sync::RwLock;

use crate::config::Config;
use crate::plan::classifier;
use crate::plan::differ::{self, DiffContext};
use crate::plan::model::{PropertyChangeAnalysis, ResourceChange};
use crate::plan::value::Value;

const DETAIL_TOP_CHANGES: usize = 3;

/// A normalized per-resource change record — the output of ingestion (§6.1),
/// ready for the analyzer.
#[derive(Debug, Clone)]
pub struct ResourceChangeInput {
    pub address: String,
    pub resource_type: String,
    pub name: String,
    pub actions: Vec<String>,
    pub before: Value,
    pub after: Value,
    pub before_sensitive: Option<Value>,
    pub after_sensitive: Option<Value>,
    pub after_unknown: Option<Value>,
    pub replace_paths: Vec<Vec<String>>,
}

pub struct Analyzer {
    config: Config,
    provider_cache: RwLock<HashMap<String, String>>,
}

impl Analyzer {
    pub fn new(config: Config) -> crate::error::Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            provider_cache: RwLock::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Provider derivation is pure (split at first `_`) but memoized so
    /// repeated types in large plans avoid re-splitting (spec §4.5a).
    fn provider_for(&self, resource_type: &str) -> String {
        if let Some(provider) = self.provider_cache.read().unwrap().get(resource_type) {
            return provider.clone();
        }
        let provider = resource_type
            .split_once('_')
            .map(|(prefix, _)| prefix.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        self.provider_cache
            .write()
            .unwrap()
            .insert(resource_type.to_string(), provider.clone());
        provider
    }

    fn module_path(address: &str) -> String {
        let segments: Vec<&str> = address.split('.').collect();
        let mut parts = Vec::new();
        let mut i = 0;
        while i + 1 < segments.len() {
            if segments[i] == "module" {
                parts.push(segments[i + 1]);
                i += 2;
            } else {
                i += 1;
            }
        }
        if parts.is_empty() {
            "-".to_string()
        } else {
            parts.join("/")
        }
    }

    fn extract_id(v: &Value) -> String {
        match v.as_map().and_then(|m| m.get("id")) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Int(i)) => i.to_string(),
            Some(Value::Float(f)) => f.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => "-".to_string(),
        }
    }

    /// Analyzes one resource change (spec §4.5 algorithm).
    pub fn analyze_resource(&self, raw: &ResourceChangeInput) -> ResourceChange {
        let change_kind = classifier::classify(&raw.actions);
        let provider = self.provider_for(&raw.resource_type);
        let module_path = Self::module_path(&raw.address);
        let physical_id = Self::extract_id(&raw.before);
        let planned_id = if change_kind == crate::plan::model::ChangeKind::Delete {
            "N/A".to_string()
        } else {
            Self::extract_id(&raw.after)
        };

        let ctx = DiffContext {
            before_sens: raw.before_sensitive.as_ref(),
            after_sens: raw.after_sensitive.as_ref(),
            after_unknown: raw.after_unknown.as_ref(),
            replace_paths: &raw.replace_paths,
        };
        let property_changes: PropertyChangeAnalysis = differ::diff(
            &raw.before,
            &raw.after,
            &ctx,
            &self.config.plan.performance_limits,
        );

        if property_changes.truncated {
            tracing::debug!(
                address = %raw.address,
                "property budget exhausted; analysis truncated"
            );
        }

        let has_unknown_values = property_changes.changes.iter().any(|c| c.is_unknown);
        let unknown_properties = property_changes
            .changes
            .iter()
            .filter(|c| c.is_unknown)
            .map(|c| c.name.clone())
            .collect();

        let danger = classifier::assess_danger(
            &raw.resource_type,
            change_kind,
            &property_changes.changes,
            &self.config,
        );

        let top_changes = if self.config.plan.show_context {
            classifier::top_changes(&raw.before, &raw.after, DETAIL_TOP_CHANGES)
        } else {
            Vec::new()
        };

        let replacement_hints = classifier::replacement_hints(&raw.replace_paths);

        ResourceChange {
            address: raw.address.clone(),
            resource_type: raw.resource_type.clone(),
            name: raw.name.clone(),
            provider,
            module_path,
            change_kind,
            is_destructive: classifier::is_destructive(change_kind),
            replacement_type: classifier::replacement_type(change_kind),
            physical_id,
            planned_id,
            is_dangerous: danger.is_dangerous,
            danger_reason: danger.danger_reason,
            risk_level: danger.risk_level,
            property_changes,
            has_unknown_values,
            unknown_properties,
            top_changes,
            replacement_hints,
            before: raw.before.clone(),
            after: raw.after.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(address: &str, resource_type: &str, actions: &[&str]) -> ResourceChangeInput {
        ResourceChangeInput {
            address: address.to_string(),
            resource_type: resource_type.to_string(),
            name: address.rsplit('.').next().unwrap_or(address).to_string(),
            actions: actions.iter().map(|s| s.to_string()).collect(),
            before: Value::Null,
            after: Value::Null,
            before_sensitive: None,
            after_sensitive: None,
            after_unknown: None,
            replace_paths: Vec::new(),
        }
    }

    #[test]
    fn provider_derived_from_type_prefix() {
        let analyzer = Analyzer::new(Config::default()).unwrap();
        let raw = input("aws_instance.example", "aws_instance", &["create"]);
        let rc = analyzer.analyze_resource(&raw);
        assert_eq!(rc.provider, "aws");
    }

    #[test]
    fn provider_unknown_without_underscore() {
        let analyzer = Analyzer::new(Config::default()).unwrap();
        let raw = input("weird.example", "weird", &["create"]);
        let rc = analyzer.analyze_resource(&raw);
        assert_eq!(rc.provider, "unknown");
    }

    #[test]
    fn module_path_extracted_from_address() {
        assert_eq!(
            Analyzer::module_path("module.x.module.y.aws_instance.name"),
            "x/y"
        );
        assert_eq!(Analyzer::module_path("aws_instance.name"), "-");
    }

    #[test]
    fn delete_planned_id_is_na() {
        let analyzer = Analyzer::new(Config::default()).unwrap();
        let mut raw = input("aws_instance.example", "aws_instance", &["delete"]);
        raw.before = Value::from(&json!({"id": "i-123"}));
        let rc = analyzer.analyze_resource(&raw);
        assert_eq!(rc.physical_id, "i-123");
        assert_eq!(rc.planned_id, "N/A");
    }

    #[test]
    fn create_physical_id_defaults_to_dash() {
        let analyzer = Analyzer::new(Config::default()).unwrap();
        let mut raw = input("aws_instance.example", "aws_instance", &["create"]);
        raw.after = Value::from(&json!({"id": null}));
        let rc = analyzer.analyze_resource(&raw);
        assert_eq!(rc.physical_id, "-");
        assert_eq!(rc.planned_id, "-");
    }
}
