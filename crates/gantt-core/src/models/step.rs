//! Step model definition and related functionality.

use std::{borrow::Borrow, fmt, ops::Deref, str::FromStr};

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::BackgroundColor;
use crate::error::{GanttError, Result};

/// Stable identifier of a step.
///
/// Identifiers are never empty. A fresh identifier is a random UUID; restored
/// identifiers go through [`StepId::from_str`], which rejects blank input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StepId(String);

impl StepId {
    /// Generates a new random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, used in compact listings.
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl FromStr for StepId {
    type Err = GanttError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(GanttError::invalid_input("uid").with_reason("step identifier cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl TryFrom<String> for StepId {
    type Error = GanttError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<StepId> for String {
    fn from(value: StepId) -> Self {
        value.0
    }
}

impl Borrow<str> for StepId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Deref for StepId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StepId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A step inside a Gantt chart.
///
/// The tree links (`parent`, `children`) are owned by
/// [`StepTree`](crate::tree::StepTree); they are readable here but can only be
/// changed through the tree so that the ancestry checks always run.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    uid: StepId,

    /// Text shown in the caption column
    pub caption: String,

    /// Start of the step on the timeline (UTC)
    pub start: Timestamp,

    /// End of the step on the timeline (UTC)
    pub end: Timestamp,

    /// Optional bar color
    pub background_color: Option<BackgroundColor>,

    pub(crate) predecessor: Option<StepId>,
    pub(crate) parent: Option<StepId>,
    pub(crate) children: Vec<StepId>,
}

impl Step {
    /// Creates a detached step with a freshly generated identifier.
    pub fn new(caption: impl Into<String>, start: Timestamp, end: Timestamp) -> Self {
        Self::with_uid(StepId::generate(), caption, start, end)
    }

    /// Creates a detached step with a known identifier.
    pub fn with_uid(uid: StepId, caption: impl Into<String>, start: Timestamp, end: Timestamp) -> Self {
        Self {
            uid,
            caption: caption.into(),
            start,
            end,
            background_color: None,
            predecessor: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_background_color(mut self, color: BackgroundColor) -> Self {
        self.background_color = Some(color);
        self
    }

    /// Sets the predecessor before the step is added to a chart. Once the
    /// step is part of a chart use
    /// [`GanttChart::set_predecessor`](crate::chart::GanttChart::set_predecessor).
    pub fn with_predecessor(mut self, predecessor: StepId) -> Self {
        self.predecessor = Some(predecessor);
        self
    }

    pub fn uid(&self) -> &StepId {
        &self.uid
    }

    pub fn predecessor(&self) -> Option<&StepId> {
        self.predecessor.as_ref()
    }

    pub fn parent(&self) -> Option<&StepId> {
        self.parent.as_ref()
    }

    pub fn children(&self) -> &[StepId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    pub fn is_root(&self) -> bool {
        !self.has_parent()
    }

    /// Length of the step on the timeline.
    pub fn duration(&self) -> SignedDuration {
        self.end.duration_since(self.start)
    }

    /// Fails with [`GanttError::InvalidOperation`] when `end` precedes `start`.
    pub(crate) fn ensure_span(uid: &StepId, start: Timestamp, end: Timestamp) -> Result<()> {
        if end < start {
            return Err(GanttError::invalid_operation(format!(
                "step {uid} would end ({end}) before it starts ({start})"
            )));
        }
        Ok(())
    }
}
