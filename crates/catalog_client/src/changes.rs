/// Observable field of the catalog that a command touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Change {
    Books,
    Selection,
    SortMode,
    Connected,
    EditSession,
    EditError,
}

/// Set of change tags produced by a state update, in first-touched order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changes(Vec<Change>);

impl Changes {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn of(change: Change) -> Self {
        Self(vec![change])
    }

    pub fn mark(&mut self, change: Change) {
        if !self.0.contains(&change) {
            self.0.push(change);
        }
    }

    pub fn merge(&mut self, other: Changes) {
        for change in other.0 {
            self.mark(change);
        }
    }

    pub fn contains(&self, change: Change) -> bool {
        self.0.contains(&change)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Change> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Change> for Changes {
    fn from_iter<I: IntoIterator<Item = Change>>(iter: I) -> Self {
        let mut changes = Changes::none();
        for change in iter {
            changes.mark(change);
        }
        changes
    }
}
