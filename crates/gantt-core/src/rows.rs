//! Flat projection of the visible rows.
//!
//! The projection is the authoritative visible order shared by the caption
//! list and the timeline. It keeps a position cache next to the row vector so
//! that [`RowProjection::index_of`] is a hash lookup; mutations re-number only
//! the rows at or after the first changed position.

use std::collections::HashMap;

use crate::{
    error::{GanttError, Result},
    models::StepId,
};

/// Ordered, indexable sequence of visible step identifiers.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RowProjection {
    rows: Vec<StepId>,
    positions: HashMap<StepId, usize>,
}

impl RowProjection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.positions.contains_key(uid)
    }

    /// Position of `uid`, or `None` when the step is not visible.
    pub fn index_of(&self, uid: &str) -> Option<usize> {
        self.positions.get(uid).copied()
    }

    pub fn get(&self, index: usize) -> Option<&StepId> {
        self.rows.get(index)
    }

    pub fn as_slice(&self) -> &[StepId] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StepId> {
        self.rows.iter()
    }

    /// Inserts `uid` so that it ends up at `index`.
    ///
    /// # Errors
    ///
    /// Returns `GanttError::IndexOutOfRange` if `index > len`.
    /// Returns `GanttError::InvalidOperation` if `uid` is already visible.
    pub fn insert_at(&mut self, index: usize, uid: StepId) -> Result<()> {
        self.insert_many_at(index, vec![uid])
    }

    /// Appends `uid` as the last row.
    pub fn push(&mut self, uid: StepId) -> Result<()> {
        self.insert_at(self.rows.len(), uid)
    }

    /// Inserts a contiguous block of rows starting at `index`, preserving the
    /// order of `uids`. Either every row is inserted or none is.
    pub fn insert_many_at(&mut self, index: usize, uids: Vec<StepId>) -> Result<()> {
        if index > self.rows.len() {
            return Err(GanttError::IndexOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        for (n, uid) in uids.iter().enumerate() {
            if self.contains(uid) || uids[..n].contains(uid) {
                return Err(GanttError::invalid_operation(format!(
                    "step {uid} is already a visible row"
                )));
            }
        }
        if uids.is_empty() {
            return Ok(());
        }

        self.rows.splice(index..index, uids);
        self.reindex_from(index);
        Ok(())
    }

    /// Removes every given row. Identifiers that are not visible are ignored.
    /// Returns the number of rows actually removed.
    pub fn remove_all<'a, I>(&mut self, uids: I) -> usize
    where
        I: IntoIterator<Item = &'a StepId>,
    {
        let mut first_removed = self.rows.len();
        for uid in uids {
            if let Some(position) = self.positions.remove(uid.as_str()) {
                first_removed = first_removed.min(position);
            }
        }
        if first_removed == self.rows.len() {
            return 0;
        }

        let before = self.rows.len();
        let positions = &self.positions;
        let mut index = 0;
        self.rows.retain(|uid| {
            let keep = index < first_removed || positions.contains_key(uid.as_str());
            index += 1;
            keep
        });
        self.reindex_from(first_removed);
        before - self.rows.len()
    }

    /// Removes a single row, returning its former position.
    pub fn remove(&mut self, uid: &str) -> Option<usize> {
        let position = self.index_of(uid)?;
        self.rows.remove(position);
        self.positions.remove(uid);
        self.reindex_from(position);
        Some(position)
    }

    /// Relocates a visible row so that it ends up at `new_index`.
    ///
    /// # Errors
    ///
    /// Returns `GanttError::StepNotFound` if `uid` is not visible.
    /// Returns `GanttError::IndexOutOfRange` if `new_index >= len`.
    pub fn move_to(&mut self, new_index: usize, uid: &str) -> Result<()> {
        let current = self
            .index_of(uid)
            .ok_or_else(|| GanttError::step_not_found(uid))?;
        if new_index >= self.rows.len() {
            return Err(GanttError::IndexOutOfRange {
                index: new_index,
                len: self.rows.len(),
            });
        }
        if current == new_index {
            return Ok(());
        }

        let row = self.rows.remove(current);
        self.rows.insert(new_index, row);
        self.reindex_from(current.min(new_index));
        Ok(())
    }

    fn reindex_from(&mut self, start: usize) {
        for (position, uid) in self.rows.iter().enumerate().skip(start) {
            self.positions.insert(uid.clone(), position);
        }
    }
}

impl<'a> IntoIterator for &'a RowProjection {
    type Item = &'a StepId;
    type IntoIter = std::slice::Iter<'a, StepId>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> StepId {
        s.parse().unwrap()
    }

    fn projection(ids: &[&str]) -> RowProjection {
        let mut rows = RowProjection::new();
        for s in ids {
            rows.push(id(s)).unwrap();
        }
        rows
    }

    fn order(rows: &RowProjection) -> Vec<&str> {
        rows.iter().map(StepId::as_str).collect()
    }

    fn assert_positions_consistent(rows: &RowProjection) {
        for (position, uid) in rows.iter().enumerate() {
            assert_eq!(rows.index_of(uid), Some(position), "stale position for {uid}");
        }
        assert_eq!(rows.positions.len(), rows.len());
    }

    #[test]
    fn test_index_of() {
        let rows = projection(&["a", "b", "c"]);
        assert_eq!(rows.index_of("a"), Some(0));
        assert_eq!(rows.index_of("c"), Some(2));
        assert_eq!(rows.index_of("z"), None);
    }

    #[test]
    fn test_insert_at_bounds() {
        let mut rows = projection(&["a", "b"]);
        rows.insert_at(2, id("c")).unwrap();
        rows.insert_at(0, id("z")).unwrap();
        assert_eq!(order(&rows), vec!["z", "a", "b", "c"]);

        let err = rows.insert_at(5, id("y")).unwrap_err();
        assert!(matches!(err, GanttError::IndexOutOfRange { index: 5, len: 4 }));
        assert_eq!(rows.len(), 4);
        assert_positions_consistent(&rows);
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut rows = projection(&["a", "b"]);
        assert!(matches!(
            rows.insert_at(0, id("b")),
            Err(GanttError::InvalidOperation { .. })
        ));
        assert!(rows.insert_many_at(1, vec![id("x"), id("x")]).is_err());
        assert_eq!(order(&rows), vec!["a", "b"]);
    }

    #[test]
    fn test_insert_many_keeps_order() {
        let mut rows = projection(&["a", "d"]);
        rows.insert_many_at(1, vec![id("b"), id("c")]).unwrap();
        assert_eq!(order(&rows), vec!["a", "b", "c", "d"]);
        assert_positions_consistent(&rows);
    }

    #[test]
    fn test_remove_all_is_idempotent() {
        let mut rows = projection(&["a", "b", "c", "d"]);
        let removed = rows.remove_all(&[id("b"), id("d"), id("missing")]);
        assert_eq!(removed, 2);
        assert_eq!(order(&rows), vec!["a", "c"]);

        assert_eq!(rows.remove_all(&[id("b"), id("d")]), 0);
        assert_eq!(order(&rows), vec!["a", "c"]);
        assert_positions_consistent(&rows);
    }

    #[test]
    fn test_remove_single() {
        let mut rows = projection(&["a", "b", "c"]);
        assert_eq!(rows.remove("a"), Some(0));
        assert_eq!(rows.remove("a"), None);
        assert_eq!(order(&rows), vec!["b", "c"]);
        assert_positions_consistent(&rows);
    }

    #[test]
    fn test_move_to() {
        let mut rows = projection(&["a", "b", "c", "d"]);
        rows.move_to(3, "a").unwrap();
        assert_eq!(order(&rows), vec!["b", "c", "d", "a"]);
        rows.move_to(0, "d").unwrap();
        assert_eq!(order(&rows), vec!["d", "b", "c", "a"]);
        assert_positions_consistent(&rows);
    }

    #[test]
    fn test_move_to_out_of_range_leaves_rows_unchanged() {
        let mut rows = projection(&["a", "b", "c"]);
        let err = rows.move_to(3, "a").unwrap_err();
        assert!(matches!(err, GanttError::IndexOutOfRange { index: 3, len: 3 }));
        assert!(matches!(rows.move_to(0, "z"), Err(GanttError::StepNotFound { .. })));
        assert_eq!(order(&rows), vec!["a", "b", "c"]);
    }
}
