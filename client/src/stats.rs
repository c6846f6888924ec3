use std::collections::BTreeMap;
use std::fmt;

use kernel::FileRecord;

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
const K: u64 = 1024;

/// Coarse grouping of media types shown in the overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Images,
    Pdfs,
    Documents,
    Spreadsheets,
    Presentations,
    Videos,
    Audio,
    Other,
}

impl Category {
    #[must_use]
    pub fn of(file_type: &str) -> Self {
        if file_type.starts_with("image/") {
            Category::Images
        } else if file_type == "application/pdf" {
            Category::Pdfs
        } else if file_type.contains("word") || file_type.contains("document") {
            Category::Documents
        } else if file_type.contains("sheet") || file_type.contains("excel") {
            Category::Spreadsheets
        } else if file_type.contains("presentation") || file_type.contains("powerpoint") {
            Category::Presentations
        } else if file_type.starts_with("video/") {
            Category::Videos
        } else if file_type.starts_with("audio/") {
            Category::Audio
        } else {
            Category::Other
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Category::Images => "Images",
            Category::Pdfs => "PDFs",
            Category::Documents => "Documents",
            Category::Spreadsheets => "Spreadsheets",
            Category::Presentations => "Presentations",
            Category::Videos => "Videos",
            Category::Audio => "Audio",
            Category::Other => "Other",
        };
        f.write_str(s)
    }
}

/// Overview of everything loaded, independent of search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub total_files: usize,
    pub total_bytes: u64,
    pub breakdown: BTreeMap<Category, usize>,
}

impl Stats {
    #[must_use]
    pub fn collect(records: &[FileRecord]) -> Self {
        records.iter().fold(Stats::default(), |mut acc, r| {
            acc.total_files += 1;
            acc.total_bytes = acc.total_bytes.saturating_add(r.file_size);
            *acc.breakdown.entry(Category::of(&r.file_type)).or_insert(0) += 1;
            acc
        })
    }
}

/// Human readable size with at most two decimals, e.g. `1.5 KB`.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return String::from("0 Bytes");
    }
    let mut unit = 0;
    let mut scale = 1u64;
    while unit + 1 < UNITS.len() && bytes >= scale * K {
        scale *= K;
        unit += 1;
    }
    #[allow(clippy::cast_precision_loss)]
    let value = bytes as f64 / scale as f64;
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn record(file_type: &str, size: u64) -> FileRecord {
        FileRecord {
            id: "1".to_owned(),
            filename: "f".to_owned(),
            file_size: size,
            file_type: file_type.to_owned(),
            cid: String::new(),
            created_at: Utc::now(),
            blockchain_verified: false,
            storage_path: None,
        }
    }

    #[rstest]
    #[case(0, "0 Bytes")]
    #[case(500, "500 Bytes")]
    #[case(1024, "1 KB")]
    #[case(1536, "1.5 KB")]
    #[case(1_048_576, "1 MB")]
    #[case(1_234_567, "1.18 MB")]
    #[case(5 * 1024 * 1024 * 1024, "5 GB")]
    #[case(3 * 1024 * 1024 * 1024 * 1024, "3072 GB")]
    #[trace]
    fn format_size_tests(#[case] bytes: u64, #[case] expected: &str) {
        assert_eq!(format_size(bytes), expected);
    }

    #[rstest]
    #[case("image/png", Category::Images)]
    #[case("application/pdf", Category::Pdfs)]
    #[case(
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Category::Documents
    )]
    #[case("application/vnd.ms-excel", Category::Spreadsheets)]
    #[case("application/vnd.ms-powerpoint", Category::Presentations)]
    #[case("video/mp4", Category::Videos)]
    #[case("audio/mpeg", Category::Audio)]
    #[case("application/zip", Category::Other)]
    #[trace]
    fn category_of(#[case] file_type: &str, #[case] expected: Category) {
        assert_eq!(Category::of(file_type), expected);
    }

    #[test]
    fn collect_totals() {
        // Arrange
        let records = vec![
            record("image/png", 100),
            record("image/jpeg", 200),
            record("text/plain", 50),
        ];

        // Act
        let stats = Stats::collect(&records);

        // Assert
        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.total_bytes, 350);
        assert_eq!(stats.breakdown.get(&Category::Images), Some(&2));
        assert_eq!(stats.breakdown.get(&Category::Other), Some(&1));
    }
}
