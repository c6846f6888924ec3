use kernel::FileRecord;

/// Record ids picked for a bulk action, kept in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<String>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: &str) {
        if let Some(ix) = self.ids.iter().position(|x| x == id) {
            self.ids.remove(ix);
        } else {
            self.ids.push(id.to_owned());
        }
    }

    /// Select-all relative to what is currently visible: when every visible
    /// record is already picked the selection is cleared, otherwise it becomes
    /// exactly the visible records.
    pub fn toggle_all(&mut self, visible: &[&FileRecord]) {
        if self.all_selected(visible) {
            self.clear();
        } else {
            self.ids = visible.iter().map(|r| r.id.clone()).collect();
        }
    }

    #[must_use]
    pub fn all_selected(&self, visible: &[&FileRecord]) -> bool {
        visible.is_empty() || visible.iter().all(|r| self.contains(&r.id))
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|x| x == id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
