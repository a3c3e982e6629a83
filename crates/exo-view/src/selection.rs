/// The currently selected body, if any.
///
/// Holding a single `Option` makes "at most one selected" structural:
/// selecting a new body replaces the old one in the same write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    current: Option<usize>,
}

impl Selection {
    /// Select `index`, returning the previously selected body.
    pub fn select(&mut self, index: usize) -> Option<usize> {
        self.current.replace(index)
    }

    /// Clear the selection, returning what was selected.
    pub fn clear(&mut self) -> Option<usize> {
        self.current.take()
    }

    pub fn get(&self) -> Option<usize> {
        self.current
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.current == Some(index)
    }
}
