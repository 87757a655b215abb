//! Sensitivity / unknown shadow tree walker (spec §4.2, component C2).
//!
//! `sensitive` and `unknown` shadow trees mirror the shape of a plan value
//! but carry booleans instead of data. Descending past a scalar `true`
//! collapses the whole remaining subtree to `true` (the upstream tool's way
//! of saying "this entire nested value is sensitive/unknown"). A missing or
//! mis-typed node resolves to `false` rather than erroring — spec invariant
//! I8.

use crate::plan::value::Value;

/// A path segment: either a map key or a decimal list index, both as string.
pub type Path<'a> = &'a [String];

fn child<'a>(shadow: &'a Value, key: &str) -> Option<&'a Value> {
    match shadow {
        Value::Map(m) => m.get(key),
        _ => None,
    }
}

fn index<'a>(shadow: &'a Value, idx: usize) -> Option<&'a Value> {
    match shadow {
        Value::List(l) => l.get(idx),
        _ => None,
    }
}

fn descend<'a>(shadow: Option<&'a Value>, path: Path) -> bool {
    let Some(shadow) = shadow else { return false };

    // A scalar `true` anywhere along the path collapses the whole subtree.
    if let Value::Bool(true) = shadow {
        return true;
    }

    let Some((head, rest)) = path.split_first() else {
        return matches!(shadow, Value::Bool(true));
    };

    let next = if let Ok(i) = head.parse::<usize>() {
        index(shadow, i)
    } else {
        child(shadow, head)
    };

    descend(next, rest)
}

/// `is_sensitive(path, S)` — spec §4.2.
pub fn is_sensitive(path: Path, shadow: Option<&Value>) -> bool {
    descend(shadow, path)
}

/// `is_unknown(path, S)` — spec §4.2.
pub fn is_unknown(path: Path, shadow: Option<&Value>) -> bool {
    descend(shadow, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_path_returns_root_bool() {
        let shadow = Value::from(&json!(true));
        assert!(is_sensitive(&[], Some(&shadow)));
        let shadow = Value::from(&json!(false));
        assert!(!is_sensitive(&[], Some(&shadow)));
    }

    #[test]
    fn empty_path_non_bool_root_is_false() {
        let shadow = Value::from(&json!({"a": true}));
        assert!(!is_sensitive(&[], Some(&shadow)));
    }

    #[test]
    fn scalar_true_collapses_subtree() {
        let shadow = Value::from(&json!({"user_data": true}));
        assert!(is_sensitive(&path(&["user_data"]), Some(&shadow)));
        assert!(is_sensitive(&path(&["user_data", "nested"]), Some(&shadow)));
    }

    #[test]
    fn missing_key_is_false() {
        let shadow = Value::from(&json!({"a": true}));
        assert!(!is_sensitive(&path(&["b"]), Some(&shadow)));
    }

    #[test]
    fn out_of_range_index_is_false() {
        let shadow = Value::from(&json!([true]));
        assert!(!is_unknown(&path(&["5"]), Some(&shadow)));
    }

    #[test]
    fn list_index_descends() {
        let shadow = Value::from(&json!([false, true]));
        assert!(is_unknown(&path(&["1"]), Some(&shadow)));
        assert!(!is_unknown(&path(&["0"]), Some(&shadow)));
    }

    #[test]
    fn absent_shadow_is_false() {
        assert!(!is_sensitive(&path(&["anything"]), None));
    }

    #[test]
    fn malformed_shadow_resolves_false() {
        // A string where a map was expected — tolerated, not an error.
        let shadow = Value::from(&json!("not-a-map"));
        assert!(!is_sensitive(&path(&["key"]), Some(&shadow)));
    }
}
