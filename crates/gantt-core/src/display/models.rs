//! Display implementations for domain models.
//!
//! Kept apart from the model definitions; all output is markdown for the
//! terminal renderer.

use std::fmt;

use super::datetime::{HumanDuration, LocalDateTime};
use crate::{
    chart::{ChartConfig, RemovalPolicy},
    models::Step,
};

impl fmt::Display for RemovalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "enabled"
    } else {
        "disabled"
    }
}

impl fmt::Display for ChartConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Chart settings")?;
        writeln!(f)?;
        writeln!(f, "- **removal_policy**: {}", self.removal_policy)?;
        writeln!(f, "- **movable_steps**: {}", on_off(self.movable_steps))?;
        writeln!(f, "- **resizable_steps**: {}", on_off(self.resizable_steps))?;
        writeln!(
            f,
            "- **movable_steps_between_rows**: {}",
            on_off(self.movable_steps_between_rows)
        )
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {}", self.caption)?;
        writeln!(f)?;
        writeln!(f, "- ID: `{}`", self.uid())?;
        writeln!(f, "- Start: {}", LocalDateTime(&self.start))?;
        writeln!(f, "- End: {}", LocalDateTime(&self.end))?;
        writeln!(f, "- Duration: {}", HumanDuration(self.duration()))?;

        if let Some(color) = &self.background_color {
            writeln!(f, "- Color: {color}")?;
        }
        if let Some(parent) = self.parent() {
            writeln!(f, "- Parent: `{}`", parent.short())?;
        }
        if self.has_children() {
            writeln!(f, "- Children: {}", self.children().len())?;
        }
        if let Some(predecessor) = self.predecessor() {
            writeln!(f, "- Predecessor: `{}`", predecessor.short())?;
        }
        writeln!(f)
    }
}
