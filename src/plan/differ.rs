//! Deep property differ (spec §4.3, component C3).
//!
//! Walks `(before, after, before_sensitive, after_sensitive, after_unknown)`
//! in lock-step and produces a bounded, ordered list of `PropertyChange`
//! events. A JSON `null` standing in for a whole map or list (the shape a
//! create/delete produces at any nesting level) is treated as the empty
//! container of the same kind, so every key/index on the other side emits a
//! plain add/remove instead of one root-level "update" — this is what makes
//! spec scenario S1 (`before: null`) emit one event per top-level attribute.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::PerformanceLimits;
use crate::plan::limits::BudgetGate;
use crate::plan::model::{PropertyChange, PropertyChangeAnalysis};
use crate::plan::shadow::{self, Path};
use crate::plan::value::{self, Value};

const SENSITIVE_MASK: &str = "(sensitive value)";
const UNKNOWN_MASK: &str = "(known after apply)";

pub struct DiffContext<'a> {
    pub before_sens: Option<&'a Value>,
    pub after_sens: Option<&'a Value>,
    pub after_unknown: Option<&'a Value>,
    pub replace_paths: &'a [Vec<String>],
}

/// Entry point (spec §4.3).
pub fn diff(
    before: &Value,
    after: &Value,
    ctx: &DiffContext,
    limits: &PerformanceLimits,
) -> PropertyChangeAnalysis {
    let mut gate = BudgetGate::new(limits);
    let mut out = Vec::new();
    let mut path = Vec::new();
    handle_child(&mut path, Some(before), Some(after), ctx, &mut gate, &mut out);

    crate::plan::sort::sort_property_changes(&mut out);
    let total_size_bytes = out.iter().map(|c| c.size).sum();

    PropertyChangeAnalysis {
        count: out.len(),
        total_size_bytes,
        truncated: gate.truncated,
        changes: out,
    }
}

fn extract_name(path: &[String]) -> String {
    for seg in path.iter().rev() {
        if seg.parse::<usize>().is_err() {
            return seg.clone();
        }
    }
    String::new()
}

fn path_matches_any(path: &[String], replace_paths: &[Vec<String>]) -> bool {
    replace_paths.iter().any(|r| r.as_slice() == path)
}

fn mask_if_sensitive(v: &Value, sensitive: bool) -> Value {
    if sensitive && v.is_scalar() {
        Value::String(SENSITIVE_MASK.to_string())
    } else {
        v.clone()
    }
}

fn sensitive_at(path: Path, ctx: &DiffContext) -> bool {
    shadow::is_sensitive(path, ctx.before_sens) || shadow::is_sensitive(path, ctx.after_sens)
}

/// Handles one key/index position: unknown override, missing-side
/// add/remove (with empty-string suppression), and dispatch when both
/// sides are present. Also the crate-internal re-entry point used by
/// [`diff`] for the resource root.
fn handle_child(
    path: &mut Vec<String>,
    before: Option<&Value>,
    after: Option<&Value>,
    ctx: &DiffContext,
    gate: &mut BudgetGate,
    out: &mut Vec<PropertyChange>,
) {
    if gate.exhausted() {
        return;
    }

    if shadow::is_unknown(path, ctx.after_unknown) {
        emit_unknown(path, before, ctx, gate, out);
        return;
    }

    match (before, after) {
        (Some(b), None) => {
            if !b.is_empty_string() {
                emit_remove(path, b, ctx, gate, out);
            }
        }
        (None, Some(a)) => {
            if !a.is_empty_string() {
                emit_add(path, a, ctx, gate, out);
            }
        }
        (Some(b), Some(a)) => dispatch(path, b, a, ctx, gate, out),
        (None, None) => {}
    }
}

/// Both sides present: equality short-circuit, same-kind recursion,
/// null-as-empty-container recursion, or a single scalar/mixed-kind update.
fn dispatch(
    path: &mut Vec<String>,
    before: &Value,
    after: &Value,
    ctx: &DiffContext,
    gate: &mut BudgetGate,
    out: &mut Vec<PropertyChange>,
) {
    if value::eq(before, after) {
        return;
    }

    match (before, after) {
        (Value::Map(bm), Value::Map(am)) => diff_maps(path, Some(bm), Some(am), ctx, gate, out),
        (Value::Map(bm), Value::Null) => diff_maps(path, Some(bm), None, ctx, gate, out),
        (Value::Null, Value::Map(am)) => diff_maps(path, None, Some(am), ctx, gate, out),
        (Value::List(bl), Value::List(al)) => diff_lists(path, Some(bl), Some(al), ctx, gate, out),
        (Value::List(bl), Value::Null) => diff_lists(path, Some(bl), None, ctx, gate, out),
        (Value::Null, Value::List(al)) => diff_lists(path, None, Some(al), ctx, gate, out),
        _ => emit_update(path, before, after, ctx, gate, out),
    }
}

fn diff_maps(
    path: &mut Vec<String>,
    before: Option<&BTreeMap<String, Value>>,
    after: Option<&BTreeMap<String, Value>>,
    ctx: &DiffContext,
    gate: &mut BudgetGate,
    out: &mut Vec<PropertyChange>,
) {
    let mut keys: BTreeSet<&String> = BTreeSet::new();
    if let Some(m) = before {
        keys.extend(m.keys());
    }
    if let Some(m) = after {
        keys.extend(m.keys());
    }

    for key in keys {
        if gate.exhausted() {
            return;
        }
        let b = before.and_then(|m| m.get(key));
        let a = after.and_then(|m| m.get(key));
        path.push(key.clone());
        handle_child(path, b, a, ctx, gate, out);
        path.pop();
    }
}

fn diff_lists(
    path: &mut Vec<String>,
    before: Option<&[Value]>,
    after: Option<&[Value]>,
    ctx: &DiffContext,
    gate: &mut BudgetGate,
    out: &mut Vec<PropertyChange>,
) {
    let len = before.map_or(0, |l| l.len()).max(after.map_or(0, |l| l.len()));
    for idx in 0..len {
        if gate.exhausted() {
            return;
        }
        let b = before.and_then(|l| l.get(idx));
        let a = after.and_then(|l| l.get(idx));
        path.push(idx.to_string());
        handle_child(path, b, a, ctx, gate, out);
        path.pop();
    }
}

fn emit_add(
    path: &[String],
    after: &Value,
    ctx: &DiffContext,
    gate: &mut BudgetGate,
    out: &mut Vec<PropertyChange>,
) {
    let sensitive = sensitive_at(path, ctx);
    let after_payload = mask_if_sensitive(after, sensitive);
    let size = value::sizeof(&after_payload);
    if gate.oversized(size) || !gate.accept(size) {
        return;
    }
    out.push(PropertyChange {
        name: extract_name(path),
        path: path.to_vec(),
        before: Value::Null,
        after: after_payload,
        sensitive,
        is_unknown: false,
        unknown_type: String::new(),
        triggers_replacement: path_matches_any(path, ctx.replace_paths),
        action: "add".to_string(),
        size,
    });
}

fn emit_remove(
    path: &[String],
    before: &Value,
    ctx: &DiffContext,
    gate: &mut BudgetGate,
    out: &mut Vec<PropertyChange>,
) {
    let sensitive = sensitive_at(path, ctx);
    let before_payload = mask_if_sensitive(before, sensitive);
    let size = value::sizeof(&before_payload);
    if gate.oversized(size) || !gate.accept(size) {
        return;
    }
    out.push(PropertyChange {
        name: extract_name(path),
        path: path.to_vec(),
        before: before_payload,
        after: Value::Null,
        sensitive,
        is_unknown: false,
        unknown_type: String::new(),
        triggers_replacement: path_matches_any(path, ctx.replace_paths),
        action: "remove".to_string(),
        size,
    });
}

fn emit_update(
    path: &[String],
    before: &Value,
    after: &Value,
    ctx: &DiffContext,
    gate: &mut BudgetGate,
    out: &mut Vec<PropertyChange>,
) {
    let sensitive = sensitive_at(path, ctx);
    let before_payload = mask_if_sensitive(before, sensitive);
    let after_payload = mask_if_sensitive(after, sensitive);
    let size = value::sizeof(&before_payload).max(value::sizeof(&after_payload));
    if gate.oversized(size) || !gate.accept(size) {
        return;
    }
    out.push(PropertyChange {
        name: extract_name(path),
        path: path.to_vec(),
        before: before_payload,
        after: after_payload,
        sensitive,
        is_unknown: false,
        unknown_type: String::new(),
        triggers_replacement: path_matches_any(path, ctx.replace_paths),
        action: "update".to_string(),
        size,
    });
}

fn emit_unknown(
    path: &[String],
    before: Option<&Value>,
    ctx: &DiffContext,
    gate: &mut BudgetGate,
    out: &mut Vec<PropertyChange>,
) {
    let sensitive = sensitive_at(path, ctx);
    let before_value = before.cloned().unwrap_or(Value::Null);
    let before_payload = mask_if_sensitive(&before_value, sensitive);
    let after_payload = Value::String(UNKNOWN_MASK.to_string());
    let size = value::sizeof(&before_payload).max(value::sizeof(&after_payload));
    if gate.oversized(size) || !gate.accept(size) {
        return;
    }
    let action = if before.is_none() { "add" } else { "update" };
    out.push(PropertyChange {
        name: extract_name(path),
        path: path.to_vec(),
        before: before_payload,
        after: after_payload,
        sensitive,
        is_unknown: true,
        unknown_type: "after".to_string(),
        triggers_replacement: path_matches_any(path, ctx.replace_paths),
        action: action.to_string(),
        size,
    });
}
