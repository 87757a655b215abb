//! Configuration surface consumed by the core (spec §3, §6.4).
//!
//! File discovery and merging of environment/flags happen above this crate
//! (out of scope per spec §1); this module only owns the shape of the
//! config the engine reads and its hard defaults (spec §4.11).

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SensitiveResource {
    pub resource_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SensitiveProperty {
    pub resource_type: String,
    pub property: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExpandableSections {
    pub enabled: bool,
    pub auto_expand_dangerous: bool,
}

impl Default for ExpandableSections {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_expand_dangerous: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Grouping {
    pub enabled: bool,
    pub threshold: usize,
}

impl Default for Grouping {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: 10,
        }
    }
}

/// Hard defaults from spec §4.11.
pub const DEFAULT_MAX_PROPERTIES_PER_RESOURCE: usize = 100;
pub const DEFAULT_MAX_PROPERTY_SIZE: usize = 1_048_576;
pub const DEFAULT_MAX_TOTAL_MEMORY: usize = 104_857_600;
pub const DEFAULT_MAX_DEPENDENCY_DEPTH: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PerformanceLimits {
    pub max_properties_per_resource: i64,
    pub max_property_size: i64,
    pub max_total_memory: i64,
    pub max_dependency_depth: i64,
}

impl Default for PerformanceLimits {
    fn default() -> Self {
        Self {
            max_properties_per_resource: DEFAULT_MAX_PROPERTIES_PER_RESOURCE as i64,
            max_property_size: DEFAULT_MAX_PROPERTY_SIZE as i64,
            max_total_memory: DEFAULT_MAX_TOTAL_MEMORY as i64,
            max_dependency_depth: DEFAULT_MAX_DEPENDENCY_DEPTH as i64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlanSection {
    pub show_context: bool,
    pub expandable_sections: ExpandableSections,
    pub grouping: Grouping,
    pub performance_limits: PerformanceLimits,
}

impl Default for PlanSection {
    fn default() -> Self {
        Self {
            show_context: true,
            expandable_sections: ExpandableSections::default(),
            grouping: Grouping::default(),
            performance_limits: PerformanceLimits::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub sensitive_resources: Vec<SensitiveResource>,
    pub sensitive_properties: Vec<SensitiveProperty>,
    pub plan: PlanSection,
    pub expand_all: bool,
}

impl Config {
    /// Validates the config per spec §7 (`ConfigError`, fatal).
    ///
    /// The only condition that is fatal at construction time: a configured
    /// performance limit that is `<= 0`.
    pub fn validate(&self) -> Result<(), PlanError> {
        let limits = &self.plan.performance_limits;
        if limits.max_properties_per_resource <= 0 {
            return Err(PlanError::Config(
                "plan.performance_limits.max_properties_per_resource must be > 0".into(),
            ));
        }
        if limits.max_property_size <= 0 {
            return Err(PlanError::Config(
                "plan.performance_limits.max_property_size must be > 0".into(),
            ));
        }
        if limits.max_total_memory <= 0 {
            return Err(PlanError::Config(
                "plan.performance_limits.max_total_memory must be > 0".into(),
            ));
        }
        if limits.max_dependency_depth <= 0 {
            return Err(PlanError::Config(
                "plan.performance_limits.max_dependency_depth must be > 0".into(),
            ));
        }
        Ok(())
    }

    pub fn is_sensitive_resource(&self, resource_type: &str) -> bool {
        self.sensitive_resources
            .iter()
            .any(|r| r.resource_type == resource_type)
    }

    /// Returns the configured-sensitive property names for a resource type.
    pub fn sensitive_properties_for(&self, resource_type: &str) -> Vec<&str> {
        self.sensitive_properties
            .iter()
            .filter(|p| p.resource_type == resource_type)
            .map(|p| p.property.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn zero_limit_is_fatal() {
        let mut config = Config::default();
        config.plan.performance_limits.max_properties_per_resource = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_limit_is_fatal() {
        let mut config = Config::default();
        config.plan.performance_limits.max_property_size = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_fields_ignored() {
        let raw = serde_json::json!({
            "sensitive_resources": [{"resource_type": "aws_db_instance"}],
            "totally_unknown_field": true,
        });
        let config: Config = serde_json::from_value(raw).unwrap();
        assert!(config.is_sensitive_resource("aws_db_instance"));
    }
}
