//! Joins database records to storage objects.
//!
//! Records that carry an explicit `storage_path` resolve to it directly. Older
//! records only know their display name, and the upload flow prefixes object
//! names (typically with a timestamp), so those fall back to the first listed
//! object whose name contains the filename. Two records with overlapping
//! names can resolve to the same object.

use kernel::{FileRecord, StorageObject};

/// Storage objects of one user, listed once and reused for several records.
pub struct ObjectIndex<'a> {
    user_id: &'a str,
    objects: Vec<StorageObject>,
}

impl<'a> ObjectIndex<'a> {
    #[must_use]
    pub fn new(user_id: &'a str, objects: Vec<StorageObject>) -> Self {
        Self { user_id, objects }
    }

    /// Full object path of the record, `None` when no object matches.
    #[must_use]
    pub fn resolve(&self, record: &FileRecord) -> Option<String> {
        if let Some(path) = record.storage_path.as_deref().filter(|p| !p.is_empty()) {
            return Some(path.to_owned());
        }
        if record.filename.is_empty() {
            return None;
        }
        self.objects
            .iter()
            .find(|o| o.name.contains(&record.filename))
            .map(|o| object_path(self.user_id, &o.name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Folder holding all objects of a user.
#[must_use]
pub fn user_prefix(user_id: &str) -> String {
    user_id.to_owned()
}

#[must_use]
pub fn object_path(user_id: &str, name: &str) -> String {
    format!("{user_id}/{name}")
}
