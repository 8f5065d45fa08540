//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::models::Step;

/// Wrapper type for displaying a newly created step.
///
/// # Examples
///
/// ```rust
/// use gantt_core::{display::CreateResult, Step};
/// use jiff::Timestamp;
///
/// let ts = Timestamp::from_second(1_700_000_000).unwrap();
/// let step = Step::new("Kickoff", ts, ts);
/// let output = CreateResult::new(&step).to_string();
/// assert!(output.starts_with("Created step with ID: "));
/// ```
pub struct CreateResult<'a> {
    pub step: &'a Step,
}

impl<'a> CreateResult<'a> {
    pub fn new(step: &'a Step) -> Self {
        Self { step }
    }
}

impl fmt::Display for CreateResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created step with ID: {}", self.step.uid())?;
        writeln!(f)?;
        write!(f, "{}", self.step)
    }
}

/// Wrapper type for displaying an updated step with the list of changes.
pub struct UpdateResult<'a> {
    pub step: &'a Step,
    pub changes: Vec<String>,
}

impl<'a> UpdateResult<'a> {
    pub fn new(step: &'a Step) -> Self {
        Self {
            step,
            changes: Vec::new(),
        }
    }

    pub fn with_changes(step: &'a Step, changes: Vec<String>) -> Self {
        Self { step, changes }
    }
}

impl fmt::Display for UpdateResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated step with ID: {}", self.step.uid())?;

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.step)
    }
}

/// Wrapper type for displaying removed steps, the requested step first.
pub struct DeleteResult<'a> {
    pub removed: &'a [Step],
}

impl<'a> DeleteResult<'a> {
    pub fn new(removed: &'a [Step]) -> Self {
        Self { removed }
    }
}

impl fmt::Display for DeleteResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some((first, rest)) = self.removed.split_first() else {
            return writeln!(f, "No steps removed.");
        };
        writeln!(f, "Removed step '{}' (ID: {})", first.caption, first.uid())?;
        if !rest.is_empty() {
            writeln!(f, "Also removed {} descendant steps:", rest.len())?;
            for step in rest {
                writeln!(f, "- {} (`{}`)", step.caption, step.uid().short())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;

    fn step(caption: &str) -> Step {
        let ts = Timestamp::from_second(1_704_067_200).unwrap();
        Step::new(caption, ts, ts)
    }

    #[test]
    fn test_update_result_lists_changes() {
        let s = step("Alpha");
        let output = UpdateResult::with_changes(&s, vec!["Rescheduled".to_string()]).to_string();

        assert!(output.contains("Changes made:\n- Rescheduled"));
        assert!(output.contains("### Alpha"));
        assert!(!UpdateResult::new(&s).to_string().contains("Changes made"));
    }

    #[test]
    fn test_delete_result() {
        let removed = vec![step("Parent"), step("Child")];
        let output = DeleteResult::new(&removed).to_string();

        assert!(output.starts_with("Removed step 'Parent'"));
        assert!(output.contains("Also removed 1 descendant steps:"));
        assert!(output.contains("- Child"));
        assert_eq!(DeleteResult::new(&[]).to_string(), "No steps removed.\n");
    }
}
