//! Expand/collapse state machine.

use log::debug;

use super::{ChartEvent, GanttChart};
use crate::{
    error::{GanttError, Result},
    models::StepId,
};

impl GanttChart {
    pub fn is_expanded(&self, uid: &str) -> bool {
        self.expanded.contains(uid)
    }

    /// Expanded steps, sorted by identifier.
    pub fn expanded_steps(&self) -> Vec<&StepId> {
        let mut expanded: Vec<_> = self.expanded.iter().collect();
        expanded.sort();
        expanded
    }

    /// Reveals the immediate children of `uid` directly below it, in child
    /// order. Grandchildren stay hidden until their own parent is expanded.
    ///
    /// Expanding an already expanded step does nothing.
    ///
    /// # Errors
    ///
    /// Returns `GanttError::StepNotFound` if the step is unknown.
    /// Returns `GanttError::InvalidOperation` if the step has no children or
    /// is not a visible row.
    pub fn expand(&mut self, uid: &str) -> Result<()> {
        let step = self.tree.require(uid)?;
        let uid = step.uid().clone();

        // Children removed under the node-only policy leave stale ids behind.
        let children: Vec<StepId> = step
            .children()
            .iter()
            .filter(|child| self.tree.contains(child))
            .cloned()
            .collect();
        if children.is_empty() {
            return Err(GanttError::invalid_operation(format!(
                "step {uid} has no children to expand"
            )));
        }
        let Some(position) = self.rows.index_of(&uid) else {
            return Err(GanttError::invalid_operation(format!(
                "step {uid} is not a visible row and cannot be expanded"
            )));
        };
        if self.expanded.contains(&uid) {
            return Ok(());
        }

        self.rows.insert_many_at(position + 1, children.clone())?;
        self.expanded.insert(uid.clone());
        debug!("Expanded step {uid}, {} rows revealed", children.len());

        for child in &children {
            self.notify_added(child)?;
        }
        self.emit(ChartEvent::Expanded(uid))?;
        self.emit(ChartEvent::DataChanged)
    }

    /// Hides every descendant of `uid` (not only its children) in one batch.
    /// The step itself keeps its row. Descendants lose their expanded state,
    /// so a later [`expand`](Self::expand) reveals one level again.
    ///
    /// Collapsing a step that is neither expanded nor showing descendants
    /// does nothing.
    pub fn collapse(&mut self, uid: &str) -> Result<()> {
        let uid = self.tree.require(uid)?.uid().clone();
        let descendants: Vec<StepId> = self
            .tree
            .descendants(&uid)
            .map(|step| step.uid().clone())
            .collect();

        let was_expanded = self.expanded.remove(&uid);
        for descendant in &descendants {
            self.expanded.remove(descendant);
        }
        let removed = self.rows.remove_all(&descendants);

        if !was_expanded && removed == 0 {
            return Ok(());
        }
        debug!("Collapsed step {uid}, {removed} rows hidden");

        self.emit(ChartEvent::Collapsed(uid))?;
        self.emit(ChartEvent::DataChanged)
    }

    /// Expands a collapsed step or collapses an expanded one. Returns the new
    /// state (`true` when expanded).
    pub fn toggle(&mut self, uid: &str) -> Result<bool> {
        if self.is_expanded(uid) {
            self.collapse(uid)?;
            Ok(false)
        } else {
            self.expand(uid)?;
            Ok(true)
        }
    }

    /// Removes `uid` and all its descendants from the visible rows and clears
    /// their expanded state. Returns whether any row disappeared.
    pub(crate) fn hide_subtree(&mut self, uid: &StepId) -> bool {
        let mut hidden: Vec<StepId> = self
            .tree
            .descendants(uid)
            .map(|step| step.uid().clone())
            .collect();
        hidden.push(uid.clone());

        for step in &hidden {
            self.expanded.remove(step);
        }
        self.rows.remove_all(&hidden) > 0
    }

    /// Row index right after the last visible descendant of `parent`.
    pub(crate) fn visible_block_end(&self, parent: &str) -> Option<usize> {
        let position = self.rows.index_of(parent)?;
        let last = self
            .tree
            .descendants(parent)
            .filter_map(|step| self.rows.index_of(step.uid()))
            .max()
            .unwrap_or(position);
        Some(last.max(position) + 1)
    }

    /// Whether a new child of `parent` should get a row right away.
    pub(crate) fn reveals_children(&self, parent: &str) -> bool {
        self.is_expanded(parent) && self.rows.contains(parent)
    }
}
