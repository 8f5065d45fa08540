//! The chart state and its mutation engine.
//!
//! A [`GanttChart`] owns three pieces of state that must always agree:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    StepTree     │    │  Expanded set   │    │  RowProjection  │
//! │ (parent/child,  │───▶│ (per-node       │───▶│ (visible rows,  │
//! │  all steps)     │    │  expand state)  │    │  index lookup)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!     Logical tree         View state             Caption/timeline rows
//! ```
//!
//! Every structural command (add, remove, move, reparent, expand, collapse)
//! validates first, then updates the tree, then recomputes the affected slice
//! of the projection, then notifies listeners. Nothing is suspended midway
//! and nothing runs in the background.
//!
//! A step is visible when it is a root, or when every ancestor up to its root
//! is expanded. The only documented exception is the orphan left behind by
//! [`RemovalPolicy::DetachNode`].
//!
//! # Examples
//!
//! ```rust
//! use gantt_core::{GanttChart, Step};
//! use jiff::Timestamp;
//!
//! # fn main() -> gantt_core::Result<()> {
//! let start = Timestamp::from_second(1_700_000_000).unwrap();
//! let end = Timestamp::from_second(1_700_086_400).unwrap();
//!
//! let mut chart = GanttChart::new();
//! let a = chart.add_step(Step::new("A", start, end))?;
//! let b = chart.add_child_step(&a, Step::new("B", start, end))?;
//! let c = chart.add_child_step(&a, Step::new("C", start, end))?;
//! assert_eq!(chart.visible_ids(), &[a.clone()]);
//!
//! chart.expand(&a)?;
//! assert_eq!(chart.visible_ids(), &[a.clone(), b, c]);
//!
//! chart.collapse(&a)?;
//! assert_eq!(chart.visible_ids(), &[a]);
//! # Ok(())
//! # }
//! ```

use std::{collections::HashSet, fmt};

use jiff::Timestamp;

use crate::{
    error::{GanttError, Result},
    models::{Step, StepId},
    rows::RowProjection,
    tree::{Descendants, StepTree},
};

pub mod config;
pub mod events;
mod expansion;
mod mutations;
pub mod snapshot;


pub use config::{ChartConfig, ConfigUpdate, RemovalPolicy};
pub use events::{ChartEvent, Listener, ListenerId, StepObserver};
pub use snapshot::{ChartSnapshot, StepRecord};

use events::Listeners;

/// One chart instance: step tree, expand state, visible rows and observers.
#[derive(Default)]
pub struct GanttChart {
    tree: StepTree,
    rows: RowProjection,
    expanded: HashSet<StepId>,
    config: ChartConfig,
    listeners: Listeners,
    on_add_step: Option<StepObserver>,
}

impl fmt::Debug for GanttChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GanttChart")
            .field("steps", &self.tree.len())
            .field("visible_rows", &self.rows.as_slice())
            .field("expanded", &self.expanded)
            .field("config", &self.config)
            .field("listeners", &self.listeners.len())
            .field("on_add_step", &self.on_add_step.is_some())
            .finish()
    }
}

impl GanttChart {
    /// Creates an empty chart with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ChartConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ChartConfig) {
        self.config = config;
    }

    /// The underlying tree, for read-only hierarchical queries.
    pub fn tree(&self) -> &StepTree {
        &self.tree
    }

    /// Number of steps in the chart, visible or not.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.tree.contains(uid)
    }

    pub fn step(&self, uid: &str) -> Option<&Step> {
        self.tree.get(uid)
    }

    /// Like [`step`](Self::step) but fails with [`GanttError::StepNotFound`].
    pub fn require_step(&self, uid: &str) -> Result<&Step> {
        self.tree.require(uid)
    }

    // ------------------------------------------------------------------
    // Visible rows
    // ------------------------------------------------------------------

    pub fn visible_ids(&self) -> &[StepId] {
        self.rows.as_slice()
    }

    pub fn visible_steps(&self) -> impl Iterator<Item = &Step> + '_ {
        self.rows.iter().filter_map(|uid| self.tree.get(uid))
    }

    pub fn visible_len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_visible(&self, uid: &str) -> bool {
        self.rows.contains(uid)
    }

    /// Visible position of `uid`; `None` when the step is hidden or unknown.
    pub fn index_of(&self, uid: &str) -> Option<usize> {
        self.rows.index_of(uid)
    }

    pub fn step_at(&self, index: usize) -> Option<&Step> {
        self.rows.get(index).and_then(|uid| self.tree.get(uid))
    }

    // ------------------------------------------------------------------
    // Tree queries
    // ------------------------------------------------------------------

    pub fn root_steps(&self) -> impl Iterator<Item = &Step> + '_ {
        self.tree.root_steps()
    }

    pub fn children_of(&self, uid: &str) -> impl Iterator<Item = &Step> + '_ {
        self.tree
            .children(uid)
            .iter()
            .filter_map(|child| self.tree.get(child))
    }

    pub fn descendants(&self, uid: &str) -> Descendants<'_> {
        self.tree.descendants(uid)
    }

    pub fn is_root(&self, uid: &str) -> bool {
        self.tree.is_root(uid)
    }

    pub fn has_children(&self, uid: &str) -> bool {
        self.tree.has_children(uid)
    }

    pub fn depth(&self, uid: &str) -> usize {
        self.tree.depth(uid)
    }

    /// Resolves the predecessor of `uid`. The relation is weak: a predecessor
    /// that has been removed resolves to `None`.
    pub fn predecessor_of(&self, uid: &str) -> Option<&Step> {
        self.tree
            .get(uid)
            .and_then(Step::predecessor)
            .and_then(|pred| self.tree.get(pred))
    }

    /// Earliest start and latest end over all steps, `None` for an empty
    /// chart. Used to clamp the displayed timeline range.
    pub fn time_span(&self) -> Option<(Timestamp, Timestamp)> {
        let start = self.tree.iter().map(|s| s.start).min()?;
        let end = self.tree.iter().map(|s| s.end).max()?;
        Some((start, end))
    }

    /// Finds a step by full identifier or by unique identifier prefix.
    ///
    /// # Errors
    ///
    /// Returns `GanttError::StepNotFound` if nothing matches.
    /// Returns `GanttError::InvalidInput` if the prefix is empty or ambiguous.
    pub fn resolve_step(&self, reference: &str) -> Result<StepId> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(GanttError::invalid_input("step").with_reason("step reference cannot be empty"));
        }
        if let Some(step) = self.tree.get(reference) {
            return Ok(step.uid().clone());
        }

        let mut matches = self
            .tree
            .iter()
            .map(Step::uid)
            .filter(|uid| uid.starts_with(reference));
        match (matches.next(), matches.next()) {
            (Some(uid), None) => Ok(uid.clone()),
            (Some(_), Some(_)) => Err(GanttError::invalid_input("step")
                .with_reason(format!("'{reference}' matches more than one step"))),
            (None, _) => Err(GanttError::step_not_found(reference)),
        }
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    /// Registers a listener for every [`ChartEvent`].
    pub fn add_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ChartEvent) -> Result<()> + 'static,
    {
        self.listeners.add(Box::new(listener))
    }

    /// Registers a listener for [`ChartEvent::DataChanged`] only.
    pub fn add_data_change_listener<F>(&mut self, mut listener: F) -> ListenerId
    where
        F: FnMut() -> Result<()> + 'static,
    {
        self.add_listener(move |event| match event {
            ChartEvent::DataChanged => listener(),
            _ => Ok(()),
        })
    }

    /// Registers a listener for [`ChartEvent::Expanded`] and
    /// [`ChartEvent::Collapsed`]; the flag is `true` for expansion.
    pub fn add_expand_collapse_listener<F>(&mut self, mut listener: F) -> ListenerId
    where
        F: FnMut(&StepId, bool) -> Result<()> + 'static,
    {
        self.add_listener(move |event| match event {
            ChartEvent::Expanded(uid) => listener(uid, true),
            ChartEvent::Collapsed(uid) => listener(uid, false),
            _ => Ok(()),
        })
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Sets the observer called, synchronously and in order, for each step
    /// that becomes a visible row. Replaces any previous observer.
    pub fn on_add_step<F>(&mut self, observer: F)
    where
        F: FnMut(&Step) -> Result<()> + 'static,
    {
        self.on_add_step = Some(Box::new(observer));
    }

    pub fn clear_add_step_observer(&mut self) {
        self.on_add_step = None;
    }

    pub fn has_add_step_observer(&self) -> bool {
        self.on_add_step.is_some()
    }

    pub(crate) fn emit(&mut self, event: ChartEvent) -> Result<()> {
        self.listeners.emit(&event)
    }

    pub(crate) fn notify_added(&mut self, uid: &str) -> Result<()> {
        if let Some(observer) = self.on_add_step.as_mut() {
            if let Some(step) = self.tree.get(uid) {
                observer(step)?;
            }
        }
        Ok(())
    }
}
