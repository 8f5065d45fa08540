//! Row and outline views of a chart.

use std::fmt;

use super::datetime::{HumanDuration, LocalDateTime};
use crate::{chart::GanttChart, hierarchy::HierarchicalData, models::Step};

/// Marker for an expanded step.
pub const EXPANDED_MARKER: &str = "▾";
/// Marker for a collapsed step that has children.
pub const COLLAPSED_MARKER: &str = "▸";

/// The visible rows of a chart as a markdown table, in row order.
///
/// Each row shows its index, an expander marker, the caption indented by
/// tree depth, the short identifier, both dates and the duration. A footer
/// gives the time span over all steps.
pub struct VisibleRows<'a>(pub &'a GanttChart);

impl VisibleRows<'_> {
    fn marker(&self, step: &Step) -> &'static str {
        let chart = self.0;
        if chart.is_expanded(step.uid()) {
            EXPANDED_MARKER
        } else if chart.children_of(step.uid()).next().is_some() {
            COLLAPSED_MARKER
        } else {
            " "
        }
    }
}

impl fmt::Display for VisibleRows<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chart = self.0;
        if chart.visible_len() == 0 {
            return writeln!(f, "No steps in chart.");
        }

        writeln!(f, "| # | Step | ID | Start | End | Duration |")?;
        writeln!(f, "|--:|:-----|:---|:------|:----|---------:|")?;
        for (index, step) in chart.visible_steps().enumerate() {
            let indent = "· ".repeat(chart.depth(step.uid()));
            writeln!(
                f,
                "| {index} | {indent}{} {} | `{}` | {} | {} | {} |",
                self.marker(step),
                step.caption,
                step.uid().short(),
                LocalDateTime(&step.start),
                LocalDateTime(&step.end),
                HumanDuration(step.duration()),
            )?;
        }

        writeln!(f)?;
        if let Some((start, end)) = chart.time_span() {
            writeln!(
                f,
                "Time span: {} → {}",
                LocalDateTime(&start),
                LocalDateTime(&end)
            )?;
        }
        writeln!(
            f,
            "{} of {} steps visible",
            chart.visible_len(),
            chart.len()
        )
    }
}

/// Nested markdown outline of every step reachable from the roots,
/// regardless of expand state.
pub struct TreeOutline<'a, H: ?Sized>(pub &'a H);

impl<H: HierarchicalData + ?Sized> TreeOutline<'_, H> {
    fn fmt_level(&self, f: &mut fmt::Formatter<'_>, steps: Vec<&Step>, depth: usize) -> fmt::Result {
        for step in steps {
            writeln!(
                f,
                "{}- {} (`{}`)",
                "  ".repeat(depth),
                step.caption,
                step.uid().short()
            )?;
            self.fmt_level(f, self.0.fetch_children(step.uid()), depth + 1)?;
        }
        Ok(())
    }
}

impl<H: HierarchicalData + ?Sized> fmt::Display for TreeOutline<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let roots = self.0.fetch_roots();
        if roots.is_empty() {
            return writeln!(f, "No steps in chart.");
        }
        self.fmt_level(f, roots, 0)
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;

    fn step(caption: &str) -> Step {
        let start = Timestamp::from_second(1_704_067_200).unwrap();
        let end = Timestamp::from_second(1_704_153_600).unwrap();
        Step::new(caption, start, end)
    }

    fn create_test_chart() -> GanttChart {
        let mut chart = GanttChart::new();
        let a = chart.add_step(step("Alpha")).unwrap();
        let b = chart.add_child_step(&a, step("Beta")).unwrap();
        chart.add_child_step(&b, step("Gamma")).unwrap();
        chart.add_step(step("Omega")).unwrap();
        chart
    }

    #[test]
    fn test_visible_rows_empty() {
        let chart = GanttChart::new();
        assert_eq!(VisibleRows(&chart).to_string(), "No steps in chart.\n");
    }

    #[test]
    fn test_visible_rows_collapsed() {
        let chart = create_test_chart();
        let output = VisibleRows(&chart).to_string();

        assert!(output.contains("| 0 | ▸ Alpha |"));
        assert!(output.contains("| 1 |   Omega |"));
        assert!(!output.contains("Beta"));
        assert!(output.contains("| 1d |"));
        assert!(output.contains("2 of 4 steps visible"));
        assert!(output.contains("Time span:"));
    }

    #[test]
    fn test_visible_rows_expanded_indents_by_depth() {
        let mut chart = create_test_chart();
        let alpha = chart.visible_ids()[0].clone();
        chart.expand(&alpha).unwrap();
        let output = VisibleRows(&chart).to_string();

        assert!(output.contains("| 0 | ▾ Alpha |"));
        assert!(output.contains("| 1 | · ▸ Beta |"));
        assert!(output.contains("| 2 |   Omega |"));
    }

    #[test]
    fn test_tree_outline() {
        let chart = create_test_chart();
        let output = TreeOutline(&chart).to_string();
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("- Alpha"));
        assert!(lines[1].starts_with("  - Beta"));
        assert!(lines[2].starts_with("    - Gamma"));
        assert!(lines[3].starts_with("- Omega"));
    }

    #[test]
    fn test_tree_outline_over_tree() {
        let chart = GanttChart::new();
        assert_eq!(TreeOutline(chart.tree()).to_string(), "No steps in chart.\n");
    }
}
