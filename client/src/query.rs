//! Search and ordering of the loaded file list.
//!
//! Both operate on borrowed views so the loaded list keeps the order the
//! backend returned it in.

use std::cmp::Ordering;

use kernel::{FileRecord, SortDirection, SortKey};

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::Date,
            direction: SortDirection::Desc,
        }
    }
}

impl SortState {
    #[must_use]
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Clicking the active key flips the direction, any other key starts ascending.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.reversed();
        } else {
            self.key = key;
            self.direction = SortDirection::Asc;
        }
    }

    #[must_use]
    pub fn compare(&self, a: &FileRecord, b: &FileRecord) -> Ordering {
        let ordering = compare_by(self.key, a, b);
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Case-insensitive substring match against filename or content identifier.
#[must_use]
pub fn matches(record: &FileRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    record.filename.to_lowercase().contains(&query) || record.cid.to_lowercase().contains(&query)
}

#[must_use]
pub fn filter<'a>(records: &'a [FileRecord], query: &str) -> Vec<&'a FileRecord> {
    records.iter().filter(|r| matches(r, query)).collect()
}

/// Filters then sorts. The sort is stable.
#[must_use]
pub fn view<'a>(records: &'a [FileRecord], query: &str, sort: SortState) -> Vec<&'a FileRecord> {
    let mut visible = filter(records, query);
    visible.sort_by(|a, b| sort.compare(a, b));
    visible
}

fn compare_by(key: SortKey, a: &FileRecord, b: &FileRecord) -> Ordering {
    match key {
        SortKey::Name => compare_names(&a.filename, &b.filename),
        SortKey::Date => a.created_at.cmp(&b.created_at),
        SortKey::Size => a.file_size.cmp(&b.file_size),
        // verified first
        SortKey::Verified => b.blockchain_verified.cmp(&a.blockchain_verified),
    }
}

/// Collation close to what users expect from a file manager: letters compare
/// without regard to case and on a case-only tie lowercase sorts first, which
/// keeps the result a total order.
fn compare_names(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn record(id: &str, filename: &str, size: u64, day: u32, verified: bool) -> FileRecord {
        FileRecord {
            id: id.to_owned(),
            filename: filename.to_owned(),
            file_size: size,
            file_type: "application/pdf".to_owned(),
            cid: format!("bafy{id}"),
            created_at: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
            blockchain_verified: verified,
            storage_path: None,
        }
    }

    fn names(view: &[&FileRecord]) -> Vec<String> {
        view.iter().map(|r| r.filename.clone()).collect()
    }

    #[test]
    fn search_report() {
        // Arrange
        let records = vec![
            record("1", "Q1_report.pdf", 10, 1, false),
            record("2", "notes.txt", 10, 2, false),
        ];

        // Act
        let found = filter(&records, "report");

        // Assert
        assert_eq!(names(&found), vec!["Q1_report.pdf"]);
    }

    #[rstest]
    #[case("REPORT", 1)]
    #[case("bafy2", 1)]
    #[case("BAFY", 2)]
    #[case("", 2)]
    #[case("missing", 0)]
    #[trace]
    fn search_case_insensitive(#[case] query: &str, #[case] expected: usize) {
        // Arrange
        let records = vec![
            record("1", "Q1_report.pdf", 10, 1, false),
            record("2", "notes.txt", 10, 2, false),
        ];

        // Act
        let found = filter(&records, query);

        // Assert
        assert_eq!(found.len(), expected);
    }

    #[test]
    fn filtered_records_are_exact_subset() {
        // Arrange
        let records = vec![
            record("1", "alpha.png", 1, 1, false),
            record("2", "Beta.png", 1, 2, false),
            record("3", "gamma.txt", 1, 3, false),
        ];

        // Act
        let found = filter(&records, "A.P");

        // Assert
        let expected: Vec<&FileRecord> = records
            .iter()
            .filter(|r| r.filename.to_lowercase().contains("a.p"))
            .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn sort_by_size_ascending() {
        // Arrange
        let records = vec![
            record("1", "a", 500, 1, false),
            record("2", "b", 100, 2, false),
            record("3", "c", 300, 3, false),
        ];
        let sort = SortState::new(SortKey::Size, SortDirection::Asc);

        // Act
        let sorted = view(&records, "", sort);

        // Assert
        let sizes: Vec<u64> = sorted.iter().map(|r| r.file_size).collect();
        assert_eq!(sizes, vec![100, 300, 500]);
    }

    #[test]
    fn sort_by_name_ignores_case() {
        // Arrange
        let records = vec![
            record("1", "zeta.txt", 1, 1, false),
            record("2", "Alpha.txt", 1, 2, false),
            record("3", "beta.txt", 1, 3, false),
        ];
        let sort = SortState::new(SortKey::Name, SortDirection::Asc);

        // Act
        let sorted = view(&records, "", sort);

        // Assert
        assert_eq!(names(&sorted), vec!["Alpha.txt", "beta.txt", "zeta.txt"]);
    }

    #[test]
    fn sort_by_name_total_on_case_ties() {
        // Arrange
        let records = vec![record("1", "A.txt", 1, 1, false), record("2", "a.txt", 1, 2, false)];
        let sort = SortState::new(SortKey::Name, SortDirection::Asc);

        // Act
        let sorted = view(&records, "", sort);

        // Assert
        assert_eq!(names(&sorted), vec!["a.txt", "A.txt"]);
    }

    #[test]
    fn default_sort_is_newest_first() {
        // Arrange
        let records = vec![
            record("1", "old", 1, 1, false),
            record("2", "new", 1, 9, false),
            record("3", "mid", 1, 5, false),
        ];

        // Act
        let sorted = view(&records, "", SortState::default());

        // Assert
        assert_eq!(names(&sorted), vec!["new", "mid", "old"]);
    }

    #[test]
    fn verified_first_when_ascending() {
        // Arrange
        let records = vec![
            record("1", "pending", 1, 1, false),
            record("2", "done", 1, 2, true),
        ];
        let sort = SortState::new(SortKey::Verified, SortDirection::Asc);

        // Act
        let sorted = view(&records, "", sort);

        // Assert
        assert_eq!(names(&sorted), vec!["done", "pending"]);
    }

    #[test]
    fn toggle_same_key_reverses_order() {
        // Arrange
        let records = vec![
            record("1", "a", 500, 1, false),
            record("2", "b", 100, 2, false),
            record("3", "c", 300, 3, false),
        ];
        let mut sort = SortState::default();
        sort.toggle(SortKey::Size);
        let ascending = names(&view(&records, "", sort));

        // Act
        sort.toggle(SortKey::Size);
        let descending = names(&view(&records, "", sort));

        // Assert
        let mut reversed = ascending.clone();
        reversed.reverse();
        assert_eq!(descending, reversed);
        assert_eq!(sort.direction, SortDirection::Desc);
    }

    #[rstest]
    #[case(SortKey::Name)]
    #[case(SortKey::Size)]
    #[case(SortKey::Verified)]
    #[trace]
    fn new_key_starts_ascending(#[case] key: SortKey) {
        // Arrange
        let mut sort = SortState::default();

        // Act
        sort.toggle(key);

        // Assert
        assert_eq!(sort, SortState::new(key, SortDirection::Asc));
    }

    #[test]
    fn toggle_active_date_flips_to_ascending() {
        // Arrange
        let mut sort = SortState::default();

        // Act
        sort.toggle(SortKey::Date);

        // Assert
        assert_eq!(sort.direction, SortDirection::Asc);
    }

    #[test]
    fn view_keeps_loaded_order() {
        // Arrange
        let records = vec![record("1", "b", 2, 1, false), record("2", "a", 1, 2, false)];

        // Act
        let _ = view(&records, "", SortState::new(SortKey::Name, SortDirection::Asc));

        // Assert
        assert_eq!(records[0].filename, "b");
    }
}
