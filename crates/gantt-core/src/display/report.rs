//! Summary of the notifications emitted while running a command.

use std::fmt;

use crate::chart::{ChartEvent, GanttChart};

/// Markdown summary of collected [`ChartEvent`]s.
///
/// Repeated `DataChanged` and `StepUpdated` notifications for the same step
/// are reported once. Steps that no longer exist are shown by identifier.
pub struct ChangeReport<'a> {
    pub chart: &'a GanttChart,
    pub events: &'a [ChartEvent],
}

impl<'a> ChangeReport<'a> {
    pub fn new(chart: &'a GanttChart, events: &'a [ChartEvent]) -> Self {
        Self { chart, events }
    }

    fn caption(&self, uid: &str) -> String {
        self.chart
            .step(uid)
            .map(|step| step.caption.clone())
            .unwrap_or_else(|| uid.to_string())
    }
}

impl fmt::Display for ChangeReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.events.is_empty() {
            return writeln!(f, "No changes.");
        }

        let mut rows_changed = false;
        let mut updated = Vec::new();
        for event in self.events {
            match event {
                ChartEvent::DataChanged => rows_changed = true,
                ChartEvent::Expanded(uid) => writeln!(f, "- Expanded **{}**", self.caption(uid))?,
                ChartEvent::Collapsed(uid) => writeln!(f, "- Collapsed **{}**", self.caption(uid))?,
                ChartEvent::StepUpdated(uid) => {
                    if !updated.contains(&uid) {
                        updated.push(uid);
                        writeln!(f, "- Updated **{}**", self.caption(uid))?;
                    }
                }
            }
        }
        if rows_changed {
            writeln!(f, "- Visible rows changed")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::{Step, StepId};

    #[test]
    fn test_change_report() {
        let ts = Timestamp::from_second(1_704_067_200).unwrap();
        let mut chart = GanttChart::new();
        let a = chart.add_step(Step::new("Alpha", ts, ts)).unwrap();
        let gone: StepId = "gone".parse().unwrap();

        let events = vec![
            ChartEvent::Expanded(a.clone()),
            ChartEvent::DataChanged,
            ChartEvent::StepUpdated(a.clone()),
            ChartEvent::StepUpdated(a),
            ChartEvent::Collapsed(gone),
            ChartEvent::DataChanged,
        ];
        let output = ChangeReport::new(&chart, &events).to_string();

        assert_eq!(
            output,
            "- Expanded **Alpha**\n- Updated **Alpha**\n- Collapsed **gone**\n- Visible rows changed\n"
        );
    }

    #[test]
    fn test_change_report_empty() {
        let chart = GanttChart::new();
        assert_eq!(ChangeReport::new(&chart, &[]).to_string(), "No changes.\n");
    }
}
