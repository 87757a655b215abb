//! Plan aggregator (spec §4.7, component C7).

use std::collections::BTreeMap;

use crate::config::Grouping;
use crate::plan::model::{ChangeKind, ChangeStatistics, ResourceChange};

/// One pass over resource changes: statistics per spec invariant I3.
pub fn statistics(changes: &[ResourceChange]) -> ChangeStatistics {
    let mut stats = ChangeStatistics::default();
    for change in changes {
        match change.change_kind {
            ChangeKind::Create => stats.to_add += 1,
            ChangeKind::Update => stats.to_change += 1,
            ChangeKind::Delete => stats.to_destroy += 1,
            ChangeKind::Replace => stats.replacements += 1,
            ChangeKind::NoOp => stats.unmodified += 1,
        }
        if change.is_dangerous {
            stats.high_risk += 1;
        }
    }
    stats.total = stats.to_add + stats.to_change + stats.to_destroy + stats.replacements;
    stats
}

/// Groups non-NoOp changes by provider (spec §4.7). A provider with only
/// NoOp changes does not appear.
pub fn group_by_provider(changes: &[ResourceChange]) -> BTreeMap<String, Vec<ResourceChange>> {
    let mut groups: BTreeMap<String, Vec<ResourceChange>> = BTreeMap::new();
    for change in changes {
        if change.change_kind == ChangeKind::NoOp {
            continue;
        }
        groups
            .entry(change.provider.clone())
            .or_default()
            .push(change.clone());
    }
    groups
}

pub fn changed_count(changes: &[ResourceChange]) -> usize {
    changes
        .iter()
        .filter(|c| c.change_kind != ChangeKind::NoOp)
        .count()
}

/// Whether presentation should group by provider (spec §4.7).
pub fn grouping_active(changes: &[ResourceChange], grouping: &Grouping) -> bool {
    if !grouping.enabled {
        return false;
    }
    if changed_count(changes) < grouping.threshold {
        return false;
    }
    group_by_provider(changes).len() > 1
}
