//! Plain, serializable copy of a chart.
//!
//! A [`ChartSnapshot`] carries no callbacks, so it is `Send` and can cross
//! into blocking database tasks or be exported as JSON. Step records are
//! stored in tree pre-order and carry their child sequences verbatim, so
//! identifiers left dangling by node-only removal survive a round trip.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{ChartConfig, GanttChart};
use crate::{
    error::{GanttError, Result},
    models::{BackgroundColor, Step, StepId},
};

/// One step with its parent reference and child sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub uid: StepId,
    pub caption: String,
    pub start: Timestamp,
    pub end: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<BackgroundColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predecessor: Option<StepId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<StepId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<StepId>,
}

impl From<&Step> for StepRecord {
    fn from(step: &Step) -> Self {
        Self {
            uid: step.uid().clone(),
            caption: step.caption.clone(),
            start: step.start,
            end: step.end,
            background_color: step.background_color.clone(),
            predecessor: step.predecessor().cloned(),
            parent: step.parent().cloned(),
            children: step.children().to_vec(),
        }
    }
}

impl StepRecord {
    fn into_step(self) -> Step {
        let mut step = Step::with_uid(self.uid, self.caption, self.start, self.end);
        step.background_color = self.background_color;
        step.predecessor = self.predecessor;
        step
    }
}

/// Everything needed to rebuild a chart, minus its observers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    #[serde(default)]
    pub config: ChartConfig,
    pub steps: Vec<StepRecord>,
    pub visible_rows: Vec<StepId>,
    #[serde(default)]
    pub expanded: Vec<StepId>,
}

impl GanttChart {
    /// Captures the chart state.
    ///
    /// Steps reachable from the roots come first, in pre-order. Steps whose
    /// parent was removed under the node-only policy follow, each with its
    /// own subtree, ordered by identifier.
    pub fn snapshot(&self) -> ChartSnapshot {
        let mut steps = Vec::with_capacity(self.tree.len());

        let mut orphans: Vec<&Step> = self
            .tree
            .iter()
            .filter(|step| step.parent().is_some_and(|parent| !self.tree.contains(parent)))
            .collect();
        orphans.sort_by(|a, b| a.uid().cmp(b.uid()));

        for top in self.tree.root_steps().chain(orphans) {
            steps.push(StepRecord::from(top));
            steps.extend(self.tree.descendants(top.uid()).map(StepRecord::from));
        }

        ChartSnapshot {
            config: self.config,
            steps,
            visible_rows: self.rows.as_slice().to_vec(),
            expanded: self.expanded_steps().into_iter().cloned().collect(),
        }
    }

    /// Rebuilds a chart from a snapshot. Observers are not part of a
    /// snapshot and must be registered again.
    ///
    /// # Errors
    ///
    /// Returns `GanttError::DuplicateStep` if a step appears twice.
    /// Returns `GanttError::InvalidInput` if a visible row or expanded step
    /// names an unknown step, or if the recorded links disagree or loop.
    pub fn from_snapshot(snapshot: ChartSnapshot) -> Result<Self> {
        let mut chart = Self::with_config(snapshot.config);

        // All steps first: links may point forward in the record order.
        let mut links = Vec::with_capacity(snapshot.steps.len());
        for mut record in snapshot.steps {
            let parent = record.parent.take();
            let children = std::mem::take(&mut record.children);
            let step = record.into_step();
            links.push((step.uid().clone(), parent, children));
            chart.tree.insert_root(step)?;
        }
        for (uid, parent, children) in &links {
            chart.tree.restore_links(uid, parent.clone(), children.clone());
        }

        // Records without a child sequence rebuild it from parent references
        for (uid, parent, _) in &links {
            let Some(parent) = parent else {
                continue;
            };
            if chart.tree.contains(parent) && !chart.tree.children(parent).contains(uid) {
                chart.tree.append_child_link(parent, uid);
            }
        }
        chart.tree.verify_links()?;

        for uid in snapshot.visible_rows {
            if !chart.tree.contains(&uid) {
                return Err(GanttError::invalid_input("visible_rows")
                    .with_reason(format!("row {uid} does not name a known step")));
            }
            chart.rows.push(uid)?;
        }

        for uid in snapshot.expanded {
            if !chart.tree.contains(&uid) {
                return Err(GanttError::invalid_input("expanded")
                    .with_reason(format!("expanded step {uid} does not name a known step")));
            }
            chart.expanded.insert(uid);
        }

        Ok(chart)
    }

    /// Serializes the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    /// Rebuilds a chart from [`to_json`](Self::to_json) output.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: ChartSnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }
}
