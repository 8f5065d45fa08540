//! Parameter structures for chart operations
//!
//! Shared parameter structures used by the command line front end and by
//! anything else that drives a [`GanttChart`](crate::GanttChart). They carry
//! no framework-specific derives; interface layers wrap them and convert.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │  Core Params    │    │   GanttChart    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│   operations    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ```ignore
//! #[derive(Args)]
//! pub struct AddStepArgs {
//!     pub caption: String,
//!     // ... clap-specific attributes
//! }
//!
//! impl From<AddStepArgs> for CreateStep {
//!     fn from(args: AddStepArgs) -> Self {
//!         // ...
//!     }
//! }
//! ```

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    error::{GanttError, Result},
    models::{BackgroundColor, Step, StepId},
};

/// Parameters for creating a new step.
///
/// Without `parent` and `index` the step is appended as the last root row.
/// `parent` and `index` are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateStep {
    /// Caption shown in the caption column (required)
    pub caption: String,
    /// Start of the step bar
    pub start: Timestamp,
    /// End of the step bar, not before `start`
    pub end: Timestamp,
    /// Optional CSS color of the step bar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<BackgroundColor>,
    /// Parent step; the new step becomes its last child
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<StepId>,
    /// Visible row of a new root step (0-indexed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// Step this one depends on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predecessor: Option<StepId>,
}

impl CreateStep {
    pub fn new(caption: impl Into<String>, start: Timestamp, end: Timestamp) -> Self {
        Self {
            caption: caption.into(),
            start,
            end,
            background_color: None,
            parent: None,
            index: None,
            predecessor: None,
        }
    }

    /// Builds the detached step with a fresh identifier.
    pub fn into_step(self) -> Step {
        let mut step = Step::new(self.caption, self.start, self.end);
        if let Some(color) = self.background_color {
            step = step.with_background_color(color);
        }
        if let Some(predecessor) = self.predecessor {
            step = step.with_predecessor(predecessor);
        }
        step
    }
}

/// New dates for an existing step.
///
/// Used by both timeline drags (`reschedule_step`) and bar resizes
/// (`resize_step`). Either bound may be omitted to keep its current value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSpan {
    /// Step to change
    pub uid: StepId,
    /// New start, or `None` to keep the current start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Timestamp>,
    /// New end, or `None` to keep the current end
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Timestamp>,
}

impl StepSpan {
    /// Resolves the requested bounds against the step's current dates.
    ///
    /// # Errors
    ///
    /// * `GanttError::InvalidInput` - When neither bound is given
    pub fn resolve(&self, current: &Step) -> Result<(Timestamp, Timestamp)> {
        if self.start.is_none() && self.end.is_none() {
            return Err(GanttError::invalid_input("span")
                .with_reason("at least one of start or end must be given"));
        }
        Ok((
            self.start.unwrap_or(current.start),
            self.end.unwrap_or(current.end),
        ))
    }
}
