//! Resource classifier (spec §4.4, component C4).

use crate::config::Config;
use crate::plan::model::{ChangeKind, PropertyChange, ReplacementType, RiskLevel};
use crate::plan::value::{self, Value};

/// Change kind from the raw action list (spec §4.4).
pub fn classify(actions: &[String]) -> ChangeKind {
    let has = |a: &str| actions.iter().any(|x| x == a);
    let solo = |a: &str| actions.len() == 1 && actions[0] == a;

    if actions.is_empty() || solo("no-op") {
        ChangeKind::NoOp
    } else if solo("create") {
        ChangeKind::Create
    } else if solo("read") || solo("update") {
        ChangeKind::Update
    } else if solo("delete") {
        ChangeKind::Delete
    } else if has("delete") && has("create") {
        ChangeKind::Replace
    } else {
        ChangeKind::NoOp
    }
}

pub fn is_destructive(kind: ChangeKind) -> bool {
    matches!(kind, ChangeKind::Delete | ChangeKind::Replace)
}

/// Spec I2: `Always` iff `Replace`, `Never` otherwise. `Conditional` is
/// reserved and never produced.
pub fn replacement_type(kind: ChangeKind) -> ReplacementType {
    if kind == ChangeKind::Replace {
        ReplacementType::Always
    } else {
        ReplacementType::Never
    }
}

/// Dotted rendering of a replace path (spec §4.4): numeric segments render
/// as `[N]` joined to the preceding segment with `.`.
pub fn render_replacement_hint(segments: &[String]) -> String {
    let mut rendered = String::new();
    for seg in segments {
        if seg.parse::<usize>().is_ok() {
            rendered.push_str(&format!("[{}]", seg));
        } else {
            if !rendered.is_empty() {
                rendered.push('.');
            }
            rendered.push_str(seg);
        }
    }
    rendered
}

pub fn replacement_hints(replace_paths: &[Vec<String>]) -> Vec<String> {
    replace_paths.iter().map(|p| render_replacement_hint(p)).collect()
}

fn sensitive_property_phrase(name: &str) -> String {
    let lower = name.to_lowercase();
    if lower.contains("password") || lower.contains("secret") {
        "Credential change".to_string()
    } else if lower.contains("key") || lower.contains("token") {
        "Authentication key change".to_string()
    } else if lower.contains("userdata") || lower.contains("user_data") {
        "User data modification".to_string()
    } else if lower.contains("security") || lower.contains("policy") {
        "Security configuration change".to_string()
    } else {
        format!("Sensitive property change: {}", name)
    }
}

fn replace_category_phrase(resource_type: &str) -> &'static str {
    let t = resource_type;
    if t.contains("rds") || t.contains("database") {
        "Database replacement"
    } else if t.contains("instance") || t.contains("vm") || t.contains("virtual_machine") {
        "Compute instance replacement"
    } else if t.contains("bucket") || t.contains("storage") {
        "Storage replacement"
    } else if t.contains("security_group") || t.contains("firewall") {
        "Security rule replacement"
    } else if t.contains("network") || t.contains("vpc") {
        "Network infrastructure replacement"
    } else {
        "Sensitive resource replacement"
    }
}

/// Findings that feed both `is_dangerous` and `danger_reason` (spec §4.4).
pub struct DangerFindings {
    pub is_dangerous: bool,
    pub danger_reason: String,
    pub risk_level: RiskLevel,
}

pub fn assess_danger(
    resource_type: &str,
    kind: ChangeKind,
    changes: &[PropertyChange],
    config: &Config,
) -> DangerFindings {
    let is_sensitive_type = config.is_sensitive_resource(resource_type);
    let sensitive_config_names = config.sensitive_properties_for(resource_type);

    let sensitive_changed: Vec<&PropertyChange> = changes
        .iter()
        .filter(|c| {
            c.sensitive
                || sensitive_config_names
                    .iter()
                    .any(|n| n.eq_ignore_ascii_case(&c.name))
        })
        .collect();

    let mut reasons: Vec<String> = Vec::new();

    if kind == ChangeKind::Delete {
        reasons.push(if is_sensitive_type {
            "Sensitive resource deletion".to_string()
        } else {
            "Resource deletion".to_string()
        });
    }

    if kind == ChangeKind::Replace && is_sensitive_type {
        reasons.push(replace_category_phrase(resource_type).to_string());
    }

    if !sensitive_changed.is_empty() && matches!(kind, ChangeKind::Update | ChangeKind::Replace) {
        if sensitive_changed.len() == 1 {
            reasons.push(sensitive_property_phrase(&sensitive_changed[0].name));
        } else {
            reasons.push("Multiple sensitive properties changed".to_string());
        }
    }

    let is_dangerous = !reasons.is_empty();
    let danger_reason = reasons.join(" and ");

    let risk_level = match kind {
        ChangeKind::Delete if is_sensitive_type => RiskLevel::Critical,
        ChangeKind::Delete => RiskLevel::High,
        ChangeKind::Replace if is_sensitive_type => RiskLevel::High,
        _ if !sensitive_changed.is_empty()
            && matches!(kind, ChangeKind::Update | ChangeKind::Replace) =>
        {
            RiskLevel::High
        }
        ChangeKind::Replace => RiskLevel::Medium,
        ChangeKind::Update if is_sensitive_type => RiskLevel::Medium,
        _ => RiskLevel::Low,
    };

    DangerFindings {
        is_dangerous,
        danger_reason,
        risk_level,
    }
}

/// Top-changes extraction (spec §4.4). Keys are sorted before picking, per
/// spec §9's resolution of the source's map-iteration-order ambiguity.
pub fn top_changes(before: &Value, after: &Value, max: usize) -> Vec<String> {
    let mut result = Vec::new();

    let before_map = before.as_map();
    let after_map = after.as_map();

    let (Some(before_map), Some(after_map)) = (before_map, after_map) else {
        return result;
    };

    let mut differing: Vec<&String> = before_map
        .keys()
        .chain(after_map.keys())
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .filter(|k| {
            let b = before_map.get(*k);
            let a = after_map.get(*k);
            match (b, a) {
                (Some(b), Some(a)) => !value::eq(b, a),
                _ => true,
            }
        })
        .collect();
    differing.sort();

    for key in &differing {
        if result.len() >= max {
            break;
        }
        if after_map.contains_key(key.as_str()) {
            result.push((*key).clone());
        }
    }

    if result.len() < max {
        for key in &differing {
            if result.len() >= max {
                break;
            }
            if !after_map.contains_key(key.as_str()) && before_map.contains_key(key.as_str()) {
                result.push(format!("{} (removed)", key));
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, SensitiveResource};
    use serde_json::json;

    #[test]
    fn classify_basic_actions() {
        assert_eq!(classify(&[]), ChangeKind::NoOp);
        assert_eq!(classify(&["no-op".to_string()]), ChangeKind::NoOp);
        assert_eq!(classify(&["create".to_string()]), ChangeKind::Create);
        assert_eq!(classify(&["update".to_string()]), ChangeKind::Update);
        assert_eq!(classify(&["read".to_string()]), ChangeKind::Update);
        assert_eq!(classify(&["delete".to_string()]), ChangeKind::Delete);
        assert_eq!(
            classify(&["delete".to_string(), "create".to_string()]),
            ChangeKind::Replace
        );
        assert_eq!(
            classify(&["create".to_string(), "delete".to_string()]),
            ChangeKind::Replace
        );
    }

    #[test]
    fn unexpected_combination_is_benign_no_op() {
        assert_eq!(classify(&["read".to_string(), "update".to_string()]), ChangeKind::NoOp);
    }

    #[test]
    fn replacement_hint_rendering() {
        let segments = vec![
            "network_interface".to_string(),
            "0".to_string(),
            "subnet_id".to_string(),
        ];
        assert_eq!(
            render_replacement_hint(&segments),
            "network_interface.[0].subnet_id"
        );
    }

    #[test]
    fn s3_dangerous_delete_non_sensitive() {
        let config = Config::default();
        let findings = assess_danger("aws_s3_bucket", ChangeKind::Delete, &[], &config);
        assert!(findings.is_dangerous);
        assert_eq!(findings.danger_reason, "Resource deletion");
        assert_eq!(findings.risk_level, RiskLevel::High);
    }

    #[test]
    fn s2_sensitive_replace_rds() {
        let mut config = Config::default();
        config.sensitive_resources.push(SensitiveResource {
            resource_type: "aws_rds_instance".to_string(),
        });
        let findings = assess_danger("aws_rds_instance", ChangeKind::Replace, &[], &config);
        assert!(findings.is_dangerous);
        assert_eq!(findings.danger_reason, "Database replacement");
        assert_eq!(findings.risk_level, RiskLevel::High);
    }

    #[test]
    fn critical_for_sensitive_delete() {
        let mut config = Config::default();
        config.sensitive_resources.push(SensitiveResource {
            resource_type: "aws_rds_instance".to_string(),
        });
        let findings = assess_danger("aws_rds_instance", ChangeKind::Delete, &[], &config);
        assert_eq!(findings.risk_level, RiskLevel::Critical);
        assert_eq!(findings.danger_reason, "Sensitive resource deletion");
    }

    #[test]
    fn top_changes_sorted_and_bounded() {
        let before = Value::from(&json!({"a": 1, "b": 2, "c": 3, "d": 4}));
        let after = Value::from(&json!({"a": 9, "b": 9, "c": 9, "d": 4}));
        let changes = top_changes(&before, &after, 3);
        assert_eq!(changes, vec!["a", "b", "c"]);
    }

    #[test]
    fn top_changes_marks_removed_keys() {
        let before = Value::from(&json!({"a": 1}));
        let after = Value::from(&json!({}));
        let changes = top_changes(&before, &after, 3);
        assert_eq!(changes, vec!["a (removed)"]);
    }
}
