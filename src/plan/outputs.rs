//! Output change analyzer (spec §4.6, component C6).

use crate::plan::classifier;
use crate::plan::model::{ChangeKind, OutputChange};
use crate::plan::value::Value;

const SENSITIVE_MASK: &str = "(sensitive value)";
const UNKNOWN_MASK: &str = "(known after apply)";

/// A normalized top-level output record, ready for analysis.
#[derive(Debug, Clone)]
pub struct OutputChangeInput {
    pub name: String,
    pub actions: Vec<String>,
    pub before: Value,
    pub after: Value,
    pub before_sensitive: bool,
    pub after_sensitive: bool,
    pub after_unknown: bool,
}

pub fn analyze_output(raw: &OutputChangeInput) -> OutputChange {
    let change_kind = classifier::classify(&raw.actions);
    let sensitive = raw.before_sensitive || raw.after_sensitive;
    let is_unknown = raw.after_unknown;

    let mut before = raw.before.clone();
    let mut after = raw.after.clone();

    if sensitive {
        if before.is_scalar() {
            before = Value::String(SENSITIVE_MASK.to_string());
        }
        if after.is_scalar() {
            after = Value::String(SENSITIVE_MASK.to_string());
        }
    }

    // Unknown takes precedence over the sensitive mask on the after side.
    if is_unknown {
        after = Value::String(UNKNOWN_MASK.to_string());
    }

    OutputChange {
        name: raw.name.clone(),
        change_kind,
        sensitive,
        is_unknown,
        before,
        after,
        indicator: change_kind.indicator().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base(name: &str, actions: &[&str]) -> OutputChangeInput {
        OutputChangeInput {
            name: name.to_string(),
            actions: actions.iter().map(|s| s.to_string()).collect(),
            before: Value::Null,
            after: Value::Null,
            before_sensitive: false,
            after_sensitive: false,
            after_unknown: false,
        }
    }

    #[test]
    fn indicator_per_change_kind() {
        let mut out = base("a", &["create"]);
        assert_eq!(analyze_output(&out).indicator, "+");
        out.actions = vec!["delete".to_string()];
        assert_eq!(analyze_output(&out).indicator, "-");
        out.actions = vec!["update".to_string()];
        assert_eq!(analyze_output(&out).indicator, "~");
        out.actions = vec![];
        assert_eq!(analyze_output(&out).indicator, " ");
    }

    #[test]
    fn replace_indicator_falls_through_to_blank() {
        let out = base("a", &["delete", "create"]);
        assert_eq!(analyze_output(&out).indicator, " ");
    }

    #[test]
    fn sensitive_scalar_masked() {
        let mut out = base("password", &["update"]);
        out.before = Value::from(&json!("old"));
        out.after = Value::from(&json!("new"));
        out.after_sensitive = true;
        let result = analyze_output(&out);
        assert!(result.sensitive);
        assert_eq!(result.before.as_str(), Some("(sensitive value)"));
        assert_eq!(result.after.as_str(), Some("(sensitive value)"));
    }

    #[test]
    fn unknown_preferred_over_sensitive_mask() {
        let mut out = base("secret_id", &["create"]);
        out.after_sensitive = true;
        out.after_unknown = true;
        out.after = Value::Null;
        let result = analyze_output(&out);
        assert_eq!(result.after.as_str(), Some("(known after apply)"));
    }

    #[test]
    fn non_scalar_shapes_do_not_count_as_sensitive_flag_sources() {
        // Only top-level bools count per spec §4.6.
        let out = base("complex", &["update"]);
        let result = analyze_output(&out);
        assert!(!result.sensitive);
    }
}
