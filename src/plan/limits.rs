//! Budget & limits (spec §4.11, component C11).
//!
//! The gate is a mutable counter threaded through the differ's recursion
//! (spec §9 design note), not a shared/global limiter — one `BudgetGate` is
//! created per resource by the analyzer (C5).

use crate::config::PerformanceLimits;

pub struct BudgetGate {
    properties_remaining: i64,
    max_property_size: i64,
    max_total_memory: i64,
    total_bytes: i64,
    /// Property-count budget exhausted. Mirrors `PropertyChangeAnalysis::truncated`
    /// directly (spec I6: `truncated == true` implies `count ==
    /// max_properties_per_resource`), so this is set *only* when the
    /// property counter itself hits zero — never by the memory gate below.
    pub truncated: bool,
    /// Total-memory budget exhausted. Also stops traversal early (spec
    /// §4.11 names memory as a budget the differ gates on) but is kept out
    /// of `truncated` so I6 holds even when memory, not property count,
    /// was the reason traversal stopped short. See DESIGN.md's Open
    /// Question entry for this spec tension.
    pub memory_exceeded: bool,
}

impl BudgetGate {
    pub fn new(limits: &PerformanceLimits) -> Self {
        Self {
            properties_remaining: limits.max_properties_per_resource,
            max_property_size: limits.max_property_size,
            max_total_memory: limits.max_total_memory,
            total_bytes: 0,
            truncated: false,
            memory_exceeded: false,
        }
    }

    /// An individual value larger than `max_property_size` is dropped
    /// entirely rather than partially truncated (spec §4.11).
    pub fn oversized(&self, size: usize) -> bool {
        size as i64 > self.max_property_size
    }

    /// Whether the differ must stop accepting further events, for either
    /// budget reason.
    pub fn exhausted(&self) -> bool {
        self.truncated || self.memory_exceeded
    }

    /// Accept one event of the given size, or refuse and mark the
    /// appropriate budget flag. Refusal must be checked promptly — before
    /// allocating more than `max_property_size` bytes for a single
    /// traversal (spec §5).
    pub fn accept(&mut self, size: usize) -> bool {
        if self.properties_remaining <= 0 {
            self.truncated = true;
            return false;
        }
        if self.total_bytes + size as i64 > self.max_total_memory {
            self.memory_exceeded = true;
            return false;
        }
        self.properties_remaining -= 1;
        self.total_bytes += size as i64;
        true
    }
}
