//! Structural and data mutations of a chart.

use std::collections::HashSet;

use jiff::Timestamp;
use log::debug;

use super::{ChartEvent, GanttChart, RemovalPolicy};
use crate::{
    error::{GanttError, Result},
    models::{BackgroundColor, Step, StepId},
    params::CreateStep,
};

impl GanttChart {
    /// Appends a root step as the last visible row.
    ///
    /// The step-added observer runs once with the new step, then a
    /// [`ChartEvent::DataChanged`] is emitted.
    pub fn add_step(&mut self, step: Step) -> Result<StepId> {
        let index = self.rows.len();
        self.insert_step(index, step)
    }

    /// Inserts a root step so that it becomes visible row `index`.
    ///
    /// # Errors
    ///
    /// Returns `GanttError::IndexOutOfRange` if `index` is past the end.
    /// Returns `GanttError::DuplicateStep` if the identifier is taken.
    /// Returns `GanttError::InvalidOperation` if the step ends before it
    /// starts or names an unknown predecessor.
    pub fn insert_step(&mut self, index: usize, step: Step) -> Result<StepId> {
        let uid = self.insert_root_row(index, step)?;
        self.notify_added(&uid)?;
        self.emit(ChartEvent::DataChanged)?;
        Ok(uid)
    }

    /// Attaches a new step as the last child of `parent`.
    ///
    /// The step gets a row (after the parent's last visible descendant) only
    /// when the parent is expanded and visible; in that case the step-added
    /// observer runs and [`ChartEvent::DataChanged`] is emitted. Otherwise
    /// the parent is reported through [`ChartEvent::StepUpdated`] so views
    /// can show its expander.
    pub fn add_child_step(&mut self, parent: &str, step: Step) -> Result<StepId> {
        let parent = self.tree.require(parent)?.uid().clone();
        self.validate_new_step(&step, &HashSet::new())?;

        let row = if self.reveals_children(&parent) {
            self.visible_block_end(&parent)
        } else {
            None
        };

        let uid = step.uid().clone();
        self.tree.insert_child(&parent, step)?;
        debug!("Added step {uid} under {parent}");

        match row {
            Some(index) => {
                self.rows.insert_at(index, uid.clone())?;
                self.notify_added(&uid)?;
                self.emit(ChartEvent::DataChanged)?;
            }
            None => self.emit(ChartEvent::StepUpdated(parent))?,
        }
        Ok(uid)
    }

    /// Creates a step from parameters, as a child when `parent` is set, at a
    /// visible index when `index` is set, or appended otherwise.
    pub fn create_step(&mut self, params: CreateStep) -> Result<StepId> {
        match (params.parent.clone(), params.index) {
            (Some(_), Some(_)) => Err(GanttError::invalid_input("index")
                .with_reason("a row index cannot be combined with a parent step")),
            (Some(parent), None) => self.add_child_step(&parent, params.into_step()),
            (None, Some(index)) => self.insert_step(index, params.into_step()),
            (None, None) => self.add_step(params.into_step()),
        }
    }

    /// Appends a materialized batch of root steps in input order.
    ///
    /// The whole batch is validated before anything is inserted. The
    /// step-added observer runs once per step, in input order; a single
    /// [`ChartEvent::DataChanged`] follows the batch.
    pub fn add_steps(&mut self, steps: Vec<Step>) -> Result<Vec<StepId>> {
        let mut pending = HashSet::new();
        for step in &steps {
            self.validate_new_step(step, &pending)?;
            pending.insert(step.uid().clone());
        }
        if steps.is_empty() {
            return Ok(Vec::new());
        }

        let mut added = Vec::with_capacity(steps.len());
        for step in steps {
            let index = self.rows.len();
            added.push(self.insert_root_row(index, step)?);
        }
        for uid in &added {
            self.notify_added(uid)?;
        }
        self.emit(ChartEvent::DataChanged)?;
        Ok(added)
    }

    /// Appends root steps from a one-pass sequence.
    ///
    /// # Errors
    ///
    /// Returns `GanttError::UnsupportedOperation`, without consuming the
    /// sequence, while a step-added observer is registered: per-step
    /// notification cannot be honored without buffering. Collect the
    /// sequence and use [`add_steps`](Self::add_steps) instead.
    ///
    /// A step failing validation stops the sequence; the steps appended
    /// before it stay in the chart and are announced by a
    /// [`ChartEvent::DataChanged`] before the error is returned.
    pub fn add_steps_from_iter<I>(&mut self, steps: I) -> Result<Vec<StepId>>
    where
        I: IntoIterator<Item = Step>,
    {
        if self.on_add_step.is_some() {
            return Err(GanttError::UnsupportedOperation {
                reason: "cannot add a lazy step sequence while a step-added observer is registered"
                    .to_string(),
            });
        }

        let mut added = Vec::new();
        let mut failure = None;
        for step in steps {
            let index = self.rows.len();
            match self.insert_root_row(index, step) {
                Ok(uid) => added.push(uid),
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        if !added.is_empty() {
            self.emit(ChartEvent::DataChanged)?;
        }
        match failure {
            Some(e) => Err(e),
            None => Ok(added),
        }
    }

    /// Moves a visible step to row `new_index` without changing its parent
    /// and without moving its children.
    ///
    /// # Errors
    ///
    /// Returns `GanttError::InvalidOperation` if moving between rows is
    /// disabled.
    /// Returns `GanttError::StepNotFound` if the step is unknown or hidden.
    /// Returns `GanttError::IndexOutOfRange` if `new_index` is not an
    /// existing row.
    pub fn move_step(&mut self, new_index: usize, uid: &str) -> Result<()> {
        if !self.config.movable_steps_between_rows {
            return Err(GanttError::invalid_operation("moving steps between rows is disabled"));
        }
        let uid = self.tree.require(uid)?.uid().clone();
        if self.rows.index_of(&uid) == Some(new_index) {
            return Ok(());
        }

        self.rows.move_to(new_index, &uid)?;
        debug!("Moved step {uid} to row {new_index}");
        self.emit(ChartEvent::DataChanged)
    }

    /// Removes a step according to the configured [`RemovalPolicy`] and
    /// returns the removed steps (the step first, then any removed
    /// descendants in pre-order).
    ///
    /// Under [`RemovalPolicy::DetachNode`] the tree links around the step are
    /// left as they are: the parent still lists the step and the children
    /// still name it as their parent.
    pub fn remove_step(&mut self, uid: &StepId) -> Result<Vec<Step>> {
        self.tree.require(uid)?;

        let (removed, rows_changed): (Vec<Step>, bool) = match self.config.removal_policy {
            RemovalPolicy::DetachNode => {
                let rows_changed = self.rows.remove(uid).is_some();
                self.expanded.remove(uid);
                let removed = self.tree.remove_node(uid).into_iter().collect();
                (removed, rows_changed)
            }
            RemovalPolicy::DetachSubtree => {
                let rows_changed = self.hide_subtree(uid);
                let doomed: Vec<StepId> = std::iter::once(uid.clone())
                    .chain(self.tree.descendants(uid).map(|step| step.uid().clone()))
                    .collect();
                self.tree.unlink(uid);
                let removed = doomed
                    .iter()
                    .filter_map(|step| self.tree.remove_node(step))
                    .collect();
                (removed, rows_changed)
            }
        };

        debug!(
            "Removed step {uid} ({} steps, policy {})",
            removed.len(),
            self.config.removal_policy.as_str()
        );
        if rows_changed {
            self.emit(ChartEvent::DataChanged)?;
        }
        Ok(removed)
    }

    /// Removes a step given its raw identifier string.
    pub fn remove_any_step(&mut self, uid: &str) -> Result<Vec<Step>> {
        let uid: StepId = uid.parse()?;
        self.remove_step(&uid)
    }

    /// Re-parents an existing step.
    ///
    /// The step's subtree is hidden and collapsed; the step itself gets a
    /// row after the new parent's visible block when that parent is
    /// expanded and visible.
    ///
    /// # Errors
    ///
    /// Returns `GanttError::InvalidOperation` if `parent` is the step itself
    /// or one of its descendants; nothing is changed in that case.
    pub fn set_parent(&mut self, uid: &str, parent: &str) -> Result<()> {
        let uid = self.tree.require(uid)?.uid().clone();
        let parent = self.tree.require(parent)?.uid().clone();
        if self.tree.get(&uid).and_then(Step::parent) == Some(&parent) {
            return Ok(());
        }

        self.tree.set_parent(&uid, &parent)?;
        let mut rows_changed = self.hide_subtree(&uid);

        let revealed = if self.reveals_children(&parent) {
            self.visible_block_end(&parent)
        } else {
            None
        };
        if let Some(index) = revealed {
            self.rows.insert_at(index, uid.clone())?;
            self.notify_added(&uid)?;
            rows_changed = true;
        }

        if rows_changed {
            self.emit(ChartEvent::DataChanged)?;
        }
        self.emit(ChartEvent::StepUpdated(parent))
    }

    /// Turns a step into the last root. Its subtree is collapsed and the step
    /// gets the last visible row.
    pub fn detach(&mut self, uid: &str) -> Result<()> {
        let uid = self.tree.require(uid)?.uid().clone();
        if self.tree.is_root(&uid) {
            return Ok(());
        }

        self.tree.detach(&uid)?;
        self.hide_subtree(&uid);
        self.rows.push(uid.clone())?;
        self.notify_added(&uid)?;
        self.emit(ChartEvent::DataChanged)
    }

    /// Changes both dates after a drag along the timeline.
    pub fn reschedule_step(&mut self, uid: &str, start: Timestamp, end: Timestamp) -> Result<()> {
        if !self.config.movable_steps {
            return Err(GanttError::invalid_operation("moving steps is disabled"));
        }
        self.set_span(uid, start, end)
    }

    /// Changes the dates after a resize of the step bar.
    pub fn resize_step(&mut self, uid: &str, start: Timestamp, end: Timestamp) -> Result<()> {
        if !self.config.resizable_steps {
            return Err(GanttError::invalid_operation("resizing steps is disabled"));
        }
        self.set_span(uid, start, end)
    }

    /// Sets or clears the predecessor of a step.
    pub fn set_predecessor(&mut self, uid: &str, predecessor: Option<&str>) -> Result<()> {
        let uid = self.tree.require(uid)?.uid().clone();
        let predecessor = match predecessor {
            Some(pred) => {
                let pred = self.tree.require(pred)?.uid().clone();
                if pred == uid {
                    return Err(GanttError::invalid_operation(format!(
                        "step {uid} cannot be its own predecessor"
                    )));
                }
                Some(pred)
            }
            None => None,
        };

        if let Some(step) = self.tree.get_mut(&uid) {
            step.predecessor = predecessor;
        }
        self.emit(ChartEvent::StepUpdated(uid))
    }

    pub fn rename_step(&mut self, uid: &str, caption: impl Into<String>) -> Result<()> {
        let step = self
            .tree
            .get_mut(uid)
            .ok_or_else(|| GanttError::step_not_found(uid))?;
        step.caption = caption.into();
        let uid = step.uid().clone();
        self.emit(ChartEvent::StepUpdated(uid))
    }

    pub fn set_background_color(&mut self, uid: &str, color: Option<BackgroundColor>) -> Result<()> {
        let step = self
            .tree
            .get_mut(uid)
            .ok_or_else(|| GanttError::step_not_found(uid))?;
        step.background_color = color;
        let uid = step.uid().clone();
        self.emit(ChartEvent::StepUpdated(uid))
    }

    fn set_span(&mut self, uid: &str, start: Timestamp, end: Timestamp) -> Result<()> {
        let step = self
            .tree
            .get_mut(uid)
            .ok_or_else(|| GanttError::step_not_found(uid))?;
        Step::ensure_span(step.uid(), start, end)?;
        step.start = start;
        step.end = end;
        let uid = step.uid().clone();
        debug!("Rescheduled step {uid} to {start} .. {end}");
        self.emit(ChartEvent::StepUpdated(uid))
    }

    /// Checks everything that can make inserting `step` fail. `pending`
    /// holds identifiers of earlier steps of the same batch.
    fn validate_new_step(&self, step: &Step, pending: &HashSet<StepId>) -> Result<()> {
        let uid = step.uid();
        // Dangling links from node-only removal keep an identifier taken.
        if self.tree.contains(uid) || self.tree.is_referenced(uid) || pending.contains(uid) {
            return Err(GanttError::DuplicateStep { uid: uid.to_string() });
        }
        Step::ensure_span(uid, step.start, step.end)?;
        if let Some(pred) = step.predecessor() {
            if pred == uid {
                return Err(GanttError::invalid_operation(format!(
                    "step {uid} cannot be its own predecessor"
                )));
            }
            if !self.tree.contains(pred) && !pending.contains(pred) {
                return Err(GanttError::invalid_operation(format!(
                    "predecessor {pred} of step {uid} is not part of the chart"
                )));
            }
        }
        Ok(())
    }

    /// Inserts a root into the tree and at visible row `index`, without
    /// notifications. Root order follows the visible order of the roots.
    fn insert_root_row(&mut self, index: usize, step: Step) -> Result<StepId> {
        if index > self.rows.len() {
            return Err(GanttError::IndexOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        self.validate_new_step(&step, &HashSet::new())?;

        let root_position = self.rows.as_slice()[..index]
            .iter()
            .filter(|uid| self.tree.is_root(uid))
            .count();
        let uid = step.uid().clone();
        self.tree.insert_root_at(root_position, step)?;
        self.rows.insert_at(index, uid.clone())?;
        debug!("Added root step {uid} at row {index}");
        Ok(uid)
    }
}
