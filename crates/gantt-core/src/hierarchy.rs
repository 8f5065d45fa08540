//! Read-only hierarchical data access.
//!
//! Front ends that render a tree (the caption outline, exporters) only need
//! to walk roots and children. [`HierarchicalData`] is that narrow view; it is
//! implemented by [`StepTree`] and by [`GanttChart`], which forwards to its
//! tree.

use crate::{chart::GanttChart, models::Step, tree::StepTree};

/// Lazy access to a forest of steps.
pub trait HierarchicalData {
    /// Root steps in root order.
    fn fetch_roots(&self) -> Vec<&Step>;

    /// Children of `parent` in child order. Unknown parents have none.
    fn fetch_children(&self, parent: &str) -> Vec<&Step>;

    /// Number of children of `parent`, or of roots when `parent` is `None`.
    fn child_count(&self, parent: Option<&str>) -> usize {
        match parent {
            Some(parent) => self.fetch_children(parent).len(),
            None => self.fetch_roots().len(),
        }
    }

    fn has_any_children(&self, parent: &str) -> bool {
        self.child_count(Some(parent)) > 0
    }
}

impl HierarchicalData for StepTree {
    fn fetch_roots(&self) -> Vec<&Step> {
        self.root_steps().collect()
    }

    fn fetch_children(&self, parent: &str) -> Vec<&Step> {
        self.children(parent)
            .iter()
            .filter_map(|child| self.get(child))
            .collect()
    }
}

impl HierarchicalData for GanttChart {
    fn fetch_roots(&self) -> Vec<&Step> {
        self.tree().fetch_roots()
    }

    fn fetch_children(&self, parent: &str) -> Vec<&Step> {
        self.tree().fetch_children(parent)
    }
}
