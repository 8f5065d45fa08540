//! Change notifications emitted by a chart.
//!
//! Listeners and the step-added observer are plain synchronous callbacks.
//! They run inline on the mutating call, after the mutation has been applied
//! and before the call returns. A callback error aborts the remaining
//! notifications and is returned to the caller of the mutation; the mutation
//! itself is not rolled back.

use crate::{
    error::Result,
    models::{Step, StepId},
};

/// A notification about a change of the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartEvent {
    /// The visible row list changed; attached views should refresh.
    DataChanged,
    /// A step was expanded.
    Expanded(StepId),
    /// A step was collapsed.
    Collapsed(StepId),
    /// A step's data (dates, caption, color, predecessor, expander) changed
    /// without altering the visible row list.
    StepUpdated(StepId),
}

/// Handle returned by listener registration, used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type Listener = Box<dyn FnMut(&ChartEvent) -> Result<()>>;

/// Observer called each time a step becomes a visible row.
pub type StepObserver = Box<dyn FnMut(&Step) -> Result<()>>;

#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Listener)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Calls every listener in registration order.
    pub(crate) fn emit(&mut self, event: &ChartEvent) -> Result<()> {
        for (_, listener) in &mut self.entries {
            listener(event)?;
        }
        Ok(())
    }
}
