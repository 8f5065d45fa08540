//! Chart configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What `remove_step` does with the tree links around the removed step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Remove only the step. Its parent keeps listing it and its children
    /// keep pointing at it; visible children stay visible.
    #[default]
    DetachNode,

    /// Remove the step together with all of its descendants and unlink it
    /// from its parent.
    DetachSubtree,
}

impl FromStr for RemovalPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "node" | "detach_node" => Ok(RemovalPolicy::DetachNode),
            "subtree" | "detach_subtree" => Ok(RemovalPolicy::DetachSubtree),
            _ => Err(format!("Invalid removal policy: {s}")),
        }
    }
}

impl RemovalPolicy {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RemovalPolicy::DetachNode => "detach_node",
            RemovalPolicy::DetachSubtree => "detach_subtree",
        }
    }
}

/// Behavior switches of a chart instance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChartConfig {
    /// Policy applied by `remove_step` / `remove_any_step`
    pub removal_policy: RemovalPolicy,

    /// Whether steps may be dragged along the timeline (`reschedule_step`)
    pub movable_steps: bool,

    /// Whether step bars may be resized (`resize_step`)
    pub resizable_steps: bool,

    /// Whether steps may change their visible row (`move_step`)
    pub movable_steps_between_rows: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            removal_policy: RemovalPolicy::default(),
            movable_steps: true,
            resizable_steps: true,
            movable_steps_between_rows: true,
        }
    }
}

/// Partial configuration change; `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub removal_policy: Option<RemovalPolicy>,
    pub movable_steps: Option<bool>,
    pub resizable_steps: Option<bool>,
    pub movable_steps_between_rows: Option<bool>,
}

impl ChartConfig {
    /// Applies `update` and returns the names of the settings that changed.
    pub fn apply(&mut self, update: ConfigUpdate) -> Vec<&'static str> {
        let mut changed = Vec::new();

        if let Some(policy) = update.removal_policy.filter(|p| *p != self.removal_policy) {
            self.removal_policy = policy;
            changed.push("removal_policy");
        }
        if let Some(value) = update.movable_steps.filter(|v| *v != self.movable_steps) {
            self.movable_steps = value;
            changed.push("movable_steps");
        }
        if let Some(value) = update.resizable_steps.filter(|v| *v != self.resizable_steps) {
            self.resizable_steps = value;
            changed.push("resizable_steps");
        }
        if let Some(value) = update
            .movable_steps_between_rows
            .filter(|v| *v != self.movable_steps_between_rows)
        {
            self.movable_steps_between_rows = value;
            changed.push("movable_steps_between_rows");
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removal_policy_parsing() {
        assert_eq!("node".parse::<RemovalPolicy>().unwrap(), RemovalPolicy::DetachNode);
        assert_eq!("Detach-Subtree".parse::<RemovalPolicy>().unwrap(), RemovalPolicy::DetachSubtree);
        assert!("cascade".parse::<RemovalPolicy>().is_err());
        assert_eq!(RemovalPolicy::DetachSubtree.as_str().parse::<RemovalPolicy>().unwrap(), RemovalPolicy::DetachSubtree);
    }

    #[test]
    fn test_default_config() {
        let config = ChartConfig::default();
        assert_eq!(config.removal_policy, RemovalPolicy::DetachNode);
        assert!(config.movable_steps && config.resizable_steps && config.movable_steps_between_rows);
    }

    #[test]
    fn test_apply_reports_changes_only() {
        let mut config = ChartConfig::default();
        let changed = config.apply(ConfigUpdate {
            removal_policy: Some(RemovalPolicy::DetachSubtree),
            movable_steps: Some(true),
            resizable_steps: Some(false),
            movable_steps_between_rows: None,
        });
        assert_eq!(changed, vec!["removal_policy", "resizable_steps"]);
        assert_eq!(config.removal_policy, RemovalPolicy::DetachSubtree);
        assert!(!config.resizable_steps);
        assert!(config.apply(ConfigUpdate::default()).is_empty());
    }

    #[test]
    fn test_config_deserializes_missing_fields_as_defaults() {
        let config: ChartConfig = serde_json::from_str(r#"{"removal_policy":"detach_subtree"}"#).unwrap();
        assert_eq!(config.removal_policy, RemovalPolicy::DetachSubtree);
        assert!(config.movable_steps);
    }
}
