use std::collections::BTreeSet;

/// Index value reported when nothing is selected.
pub const NO_SELECTION: i64 = -1;

/// Which record is open for editing and which are marked for deletion.
///
/// A record is never both selected and marked: selecting a marked record
/// unmarks it, and marking the selected record drops the selection. Other
/// records keep their marks when the selection moves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<usize>,
    marked: BTreeSet<usize>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Selected index, or [`NO_SELECTION`].
    pub fn selected_sentinel(&self) -> i64 {
        self.selected.map_or(NO_SELECTION, |index| index as i64)
    }

    pub fn select(&mut self, index: usize) {
        self.marked.remove(&index);
        self.selected = Some(index);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected == Some(index)
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.marked.contains(&index)
    }

    /// Flips the deletion mark on `index` and returns the new state.
    pub fn toggle_mark(&mut self, index: usize) -> bool {
        if self.marked.remove(&index) {
            return false;
        }
        if self.selected == Some(index) {
            self.selected = None;
        }
        self.marked.insert(index);
        true
    }

    pub fn marked(&self) -> impl Iterator<Item = usize> + '_ {
        self.marked.iter().copied()
    }

    pub fn has_marked(&self) -> bool {
        !self.marked.is_empty()
    }

    pub fn clear_marks(&mut self) {
        self.marked.clear();
    }

    /// A record was inserted at index 0; every index moves down by one.
    pub(crate) fn shift_for_insert(&mut self) {
        self.selected = self.selected.map(|index| index + 1);
        self.marked = self.marked.iter().map(|index| index + 1).collect();
    }

    /// The marked records were removed. Clears the marks and moves the
    /// selection to the record's new index.
    pub(crate) fn compact_after_removal(&mut self) {
        let removed = std::mem::take(&mut self.marked);
        self.selected = self
            .selected
            .map(|index| index - removed.range(..index).count());
    }
}
