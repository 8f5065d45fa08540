//! Demo dataset.

use gantt_core::{GanttChart, Result, Step, StepId};
use jiff::Timestamp;

use crate::cli::days_after;

/// Children per root step and grandchildren per child.
pub const SUBSET_COUNT: i64 = 3;

/// Adds two root steps of `SUBSET_COUNT²` days each, the second one
/// following the first. Every root gets `SUBSET_COUNT` children of
/// `SUBSET_COUNT` days and every child `SUBSET_COUNT` one-day grandchildren.
///
/// Returns the number of steps added. Children are added below collapsed
/// roots, so only the roots become visible rows.
pub fn populate(chart: &mut GanttChart, start: Timestamp) -> Result<usize> {
    let root_days = SUBSET_COUNT * SUBSET_COUNT;
    let first_end = days_after(start, root_days)?;
    let first = chart.add_step(Step::new("Base-Step-1", start, first_end))?;
    let mut added = 1 + add_children(chart, &first)?;

    let second = Step::new("Base-Step-2", first_end, days_after(first_end, root_days)?)
        .with_predecessor(first);
    let second = chart.add_step(second)?;
    added += 1 + add_children(chart, &second)?;

    Ok(added)
}

fn add_children(chart: &mut GanttChart, parent: &StepId) -> Result<usize> {
    let (caption, mut date) = {
        let parent = chart.require_step(parent)?;
        (parent.caption.clone(), parent.start)
    };

    let mut added = 0;
    for i in 1..=SUBSET_COUNT {
        let end = days_after(date, SUBSET_COUNT)?;
        let child = chart.add_child_step(parent, Step::new(format!("{caption}-{i}"), date, end))?;
        added += 1 + add_grandchildren(chart, &child)?;
        date = end;
    }
    Ok(added)
}

fn add_grandchildren(chart: &mut GanttChart, parent: &StepId) -> Result<usize> {
    let (caption, mut date) = {
        let parent = chart.require_step(parent)?;
        (parent.caption.clone(), parent.start)
    };

    for i in 1..=SUBSET_COUNT {
        let end = days_after(date, 1)?;
        chart.add_child_step(parent, Step::new(format!("{caption}-{i}"), date, end))?;
        date = end;
    }
    Ok(SUBSET_COUNT as usize)
}
