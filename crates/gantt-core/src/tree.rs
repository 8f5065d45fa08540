//! Arena-backed step tree.
//!
//! Steps are stored by identifier; every link is an identifier, never a
//! reference, so parent/child back-references cannot form ownership cycles.
//! Structural cycles are rejected by walking both directions of the link
//! graph before any link is written.

use std::collections::HashMap;

use log::debug;

use crate::{
    error::{GanttError, Result},
    models::{Step, StepId},
};

/// Owner of every step of a chart and of their parent/child relation.
#[derive(Debug, Default, Clone)]
pub struct StepTree {
    steps: HashMap<StepId, Step>,
    roots: Vec<StepId>,
}

impl StepTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.steps.contains_key(uid)
    }

    pub fn get(&self, uid: &str) -> Option<&Step> {
        self.steps.get(uid)
    }

    /// Mutable access to a step's data fields. Links stay private to the tree.
    pub fn get_mut(&mut self, uid: &str) -> Option<&mut Step> {
        self.steps.get_mut(uid)
    }

    /// Like [`get`](Self::get) but fails with [`GanttError::StepNotFound`].
    pub fn require(&self, uid: &str) -> Result<&Step> {
        self.get(uid).ok_or_else(|| GanttError::step_not_found(uid))
    }

    /// Root identifiers in tree order.
    pub fn roots(&self) -> &[StepId] {
        &self.roots
    }

    pub fn root_steps(&self) -> impl Iterator<Item = &Step> + '_ {
        self.roots.iter().filter_map(|uid| self.get(uid))
    }

    /// All steps, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Step> + '_ {
        self.steps.values()
    }

    /// Immediate children of `uid`, in insertion order. Empty for unknown ids.
    pub fn children(&self, uid: &str) -> &[StepId] {
        self.get(uid).map(Step::children).unwrap_or_default()
    }

    pub fn is_root(&self, uid: &str) -> bool {
        self.get(uid).is_some_and(Step::is_root)
    }

    pub fn has_children(&self, uid: &str) -> bool {
        self.get(uid).is_some_and(Step::has_children)
    }

    /// Number of ancestors between `uid` and its root.
    pub fn depth(&self, uid: &str) -> usize {
        self.ancestors(uid).count()
    }

    /// Walks the parent chain upwards, stopping at a root or at a parent
    /// identifier that is no longer part of the tree.
    pub fn ancestors<'a>(&'a self, uid: &str) -> impl Iterator<Item = &'a StepId> + 'a {
        let mut current = self.get(uid).and_then(Step::parent);
        let mut remaining = self.steps.len();
        std::iter::from_fn(move || {
            let parent = current.take()?;
            if remaining == 0 {
                return None;
            }
            remaining -= 1;
            current = self.get(parent).and_then(Step::parent);
            Some(parent)
        })
    }

    /// Pre-order enumeration of every transitive child of `uid`, excluding
    /// `uid` itself. Identifiers that are no longer in the tree are skipped.
    pub fn descendants(&self, uid: &str) -> Descendants<'_> {
        Descendants::new(self, uid)
    }

    /// Adds a detached step as the last root.
    pub fn insert_root(&mut self, step: Step) -> Result<()> {
        let position = self.roots.len();
        self.insert_root_at(position, step)
    }

    /// Adds a detached step as a root at `position` in root order. Positions
    /// past the end append.
    pub fn insert_root_at(&mut self, position: usize, step: Step) -> Result<()> {
        let step = self.admit(step)?;
        let uid = step.uid().clone();
        let position = position.min(self.roots.len());
        self.roots.insert(position, uid.clone());
        self.steps.insert(uid, step);
        Ok(())
    }

    /// Adds a detached step as the last child of `parent`.
    pub fn insert_child(&mut self, parent: &str, step: Step) -> Result<()> {
        self.require(parent)?;
        let mut step = self.admit(step)?;
        let uid = step.uid().clone();
        let parent_id = self.require(parent)?.uid().clone();

        step.parent = Some(parent_id.clone());
        self.steps.insert(uid.clone(), step);
        if let Some(parent) = self.steps.get_mut(&parent_id) {
            parent.children.push(uid);
        }
        Ok(())
    }

    /// Attaches `child` under `parent`.
    ///
    /// The child is appended to the parent's children unless it is already
    /// there, in which case the child sequence is left untouched. A previous
    /// parent (or the root list) loses the child.
    ///
    /// # Errors
    ///
    /// Returns `GanttError::StepNotFound` if either step is unknown.
    /// Returns `GanttError::InvalidOperation` if `parent` is `child` itself
    /// or one of its descendants.
    pub fn set_parent(&mut self, child: &str, parent: &str) -> Result<()> {
        let child_id = self.require(child)?.uid().clone();
        let parent_id = self.require(parent)?.uid().clone();

        if child_id == parent_id
            || self.ancestors(&parent_id).any(|a| *a == child_id)
            || self.descendants(&child_id).any(|d| *d.uid() == parent_id)
        {
            return Err(GanttError::invalid_operation(format!(
                "attaching {child_id} under {parent_id} would create a cycle"
            )));
        }

        if self.get(&child_id).and_then(Step::parent) != Some(&parent_id) {
            self.unlink(&child_id);
        }

        if let Some(parent) = self.steps.get_mut(&parent_id) {
            if !parent.children.contains(&child_id) {
                parent.children.push(child_id.clone());
            }
        }
        if let Some(child) = self.steps.get_mut(&child_id) {
            child.parent = Some(parent_id.clone());
        }

        debug!("Attached step {child_id} under {parent_id}");
        Ok(())
    }

    /// Parent-side entry point: no-op when `child` is already one of
    /// `parent`'s children, otherwise [`set_parent`](Self::set_parent).
    pub fn add_child(&mut self, parent: &str, child: &str) -> Result<()> {
        if self.children(parent).iter().any(|c| c.as_str() == child) {
            return Ok(());
        }
        self.set_parent(child, parent)
    }

    /// Turns `child` into the last root. Detaching a root is a no-op.
    pub fn detach(&mut self, child: &str) -> Result<()> {
        let child_id = self.require(child)?.uid().clone();
        if self.is_root(&child_id) {
            return Ok(());
        }
        self.unlink(&child_id);
        self.roots.push(child_id.clone());
        debug!("Detached step {child_id}");
        Ok(())
    }

    /// Removes a single step from the arena without touching any link that
    /// points at it: its parent keeps it in the child sequence and its
    /// children keep it as their parent.
    pub(crate) fn remove_node(&mut self, uid: &str) -> Option<Step> {
        let step = self.steps.remove(uid)?;
        self.roots.retain(|r| r.as_str() != uid);
        Some(step)
    }

    /// Removes `uid` from its parent's children (or from the root list) and
    /// clears its parent reference.
    pub(crate) fn unlink(&mut self, uid: &str) {
        let parent = self.steps.get_mut(uid).and_then(|step| step.parent.take());
        match parent {
            Some(parent) => {
                if let Some(parent) = self.steps.get_mut(&parent) {
                    parent.children.retain(|c| c.as_str() != uid);
                }
            }
            None => self.roots.retain(|r| r.as_str() != uid),
        }
    }

    /// Overwrites both links of `uid` with recorded values, dangling
    /// identifiers included. A step with a parent leaves the root list.
    pub(crate) fn restore_links(
        &mut self,
        uid: &str,
        parent: Option<StepId>,
        children: Vec<StepId>,
    ) {
        if parent.is_some() {
            self.roots.retain(|r| r.as_str() != uid);
        }
        if let Some(step) = self.steps.get_mut(uid) {
            step.parent = parent;
            step.children = children;
        }
    }

    pub(crate) fn append_child_link(&mut self, parent: &str, child: &StepId) {
        if let Some(parent) = self.steps.get_mut(parent) {
            parent.children.push(child.clone());
        }
    }

    /// Checks restored links: every live child must point back at the step
    /// listing it, and no parent chain may loop.
    pub(crate) fn verify_links(&self) -> Result<()> {
        for step in self.steps.values() {
            let uid = step.uid();
            if self.ancestors(uid).any(|a| a == uid) {
                return Err(GanttError::invalid_input("steps")
                    .with_reason(format!("step {uid} is its own ancestor")));
            }
            for child in step.children() {
                let Some(child) = self.get(child) else {
                    continue;
                };
                if child.parent() != Some(uid) {
                    return Err(GanttError::invalid_input("steps").with_reason(format!(
                        "step {uid} lists {} as a child but its parent differs",
                        child.uid()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Whether a step in the tree still names `uid` as a child or parent.
    /// Links left behind by node-only removal keep an identifier taken.
    pub(crate) fn is_referenced(&self, uid: &str) -> bool {
        self.steps.values().any(|step| {
            step.parent().is_some_and(|p| p.as_str() == uid)
                || step.children().iter().any(|c| c.as_str() == uid)
        })
    }

    fn admit(&self, mut step: Step) -> Result<Step> {
        let uid = step.uid().as_str();
        if self.contains(uid) || self.is_referenced(uid) {
            return Err(GanttError::DuplicateStep {
                uid: step.uid().to_string(),
            });
        }
        step.parent = None;
        step.children.clear();
        Ok(step)
    }
}

/// Pre-order iterator over the descendants of a step.
///
/// A clone continues from the same position; call
/// [`StepTree::descendants`] again for a fresh traversal.
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    tree: &'a StepTree,
    stack: Vec<&'a StepId>,
}

impl<'a> Descendants<'a> {
    fn new(tree: &'a StepTree, uid: &str) -> Self {
        // Push children in reverse order for left-to-right traversal
        let stack = tree.children(uid).iter().rev().collect();
        Self { tree, stack }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Step;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(uid) = self.stack.pop() {
            if let Some(step) = self.tree.get(uid) {
                self.stack.extend(step.children().iter().rev());
                return Some(step);
            }
        }
        None
    }
}
