//! Terminal rendering of the browser state.

use comfy_table::{presets::UTF8_HORIZONTAL_ONLY, Attribute, Cell, ContentArrangement, Table};
use kernel::{FileRecord, SortDirection, SortKey};

use crate::backend::Backend;
use crate::browser::FileBrowser;
use crate::query::SortState;
use crate::stats::{format_size, Stats};
use crate::surface::Surface;

const TABLE_WIDTH: u16 = 120;

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_HORIZONTAL_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(TABLE_WIDTH)
        .set_header(
            header
                .into_iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<Cell>>(),
        );
    table
}

#[must_use]
pub fn stats_table(stats: &Stats) -> Table {
    let mut table = table(vec!["Total Files", "Total Storage"]);
    table.add_row(vec![
        Cell::new(stats.total_files),
        Cell::new(format_size(stats.total_bytes)),
    ]);
    table
}

#[must_use]
pub fn breakdown_table(stats: &Stats) -> Table {
    let mut table = table(vec!["File Types", "Count"]);
    for (category, count) in &stats.breakdown {
        table.add_row(vec![Cell::new(category), Cell::new(count)]);
    }
    table
}

/// Header label of a sortable column with its direction marker.
#[must_use]
pub fn sort_label(title: &str, key: SortKey, sort: SortState) -> String {
    if sort.key != key {
        return format!("{title} ↕");
    }
    match sort.direction {
        SortDirection::Asc => format!("{title} ↑"),
        SortDirection::Desc => format!("{title} ↓"),
    }
}

#[must_use]
pub fn status(record: &FileRecord) -> &'static str {
    if record.blockchain_verified {
        "verified"
    } else {
        "pending"
    }
}

#[must_use]
pub fn files_table<B: Backend, S: Surface>(browser: &FileBrowser<B, S>) -> Table {
    let sort = browser.sort();
    let name = sort_label("Name", SortKey::Name, sort);
    let size = sort_label("Size", SortKey::Size, sort);
    let date = sort_label("Uploaded", SortKey::Date, sort);
    let state = sort_label("Status", SortKey::Verified, sort);
    let mut table = table(vec!["", "Id", &name, &size, &date, &state, "CID", "Preview"]);

    for record in browser.visible() {
        let mark = if browser.selection().contains(&record.id) {
            "[x]"
        } else {
            "[ ]"
        };
        let preview = match (record.is_image(), browser.thumbnail(&record.id)) {
            (true, Some(_)) => "yes",
            (true, None) => "unavailable",
            (false, _) => "",
        };
        table.add_row(vec![
            Cell::new(mark),
            Cell::new(&record.id),
            Cell::new(&record.filename),
            Cell::new(format_size(record.file_size)),
            Cell::new(record.created_at.format("%Y-%m-%d")),
            Cell::new(status(record)),
            Cell::new(&record.cid),
            Cell::new(preview),
        ]);
    }
    table
}

/// Whole view as text: overview, breakdown, bulk action bar and the list or
/// its placeholder.
#[must_use]
pub fn view<B: Backend, S: Surface>(browser: &FileBrowser<B, S>) -> String {
    if browser.is_loading() {
        return String::from("Loading...");
    }
    let stats = browser.stats();
    let mut out = format!("My Files\n{}\n", stats_table(&stats));
    if stats.total_files > 0 {
        out.push_str(&format!("{}\n", breakdown_table(&stats)));
    }
    if let Some(message) = browser.empty_message() {
        out.push_str(message);
        out.push('\n');
        return out;
    }
    let mut actions = browser.select_all_label().to_owned();
    if !browser.selection().is_empty() {
        actions.push_str(&format!("  Delete ({})", browser.selection().len()));
    }
    out.push_str(&format!("{actions}\n{}\n", files_table(browser)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryBackend, RecordingSurface};
    use chrono::Utc;
    use rstest::rstest;

    fn record(id: &str, filename: &str, file_type: &str) -> FileRecord {
        FileRecord {
            id: id.to_owned(),
            filename: filename.to_owned(),
            file_size: 2048,
            file_type: file_type.to_owned(),
            cid: format!("bafy{id}"),
            created_at: Utc::now(),
            blockchain_verified: id == "1",
            storage_path: None,
        }
    }

    #[rstest]
    #[case(SortState::default(), "Name ↕")]
    #[case(SortState::new(SortKey::Name, SortDirection::Asc), "Name ↑")]
    #[case(SortState::new(SortKey::Name, SortDirection::Desc), "Name ↓")]
    #[trace]
    fn sort_label_marks_active_column(#[case] sort: SortState, #[case] expected: &str) {
        // Act
        let label = sort_label("Name", SortKey::Name, sort);

        // Assert
        assert_eq!(label, expected);
    }

    #[tokio::test]
    async fn view_lists_files_with_selection() {
        // Arrange
        let backend = MemoryBackend::new();
        backend.login("u1");
        backend.insert_record(record("1", "report.pdf", "application/pdf"), "u1");
        backend.insert_record(record("2", "cat.png", "image/png"), "u1");
        let mut browser = FileBrowser::new(backend, RecordingSurface::new(), "http://x");
        browser.mount().await;
        browser.toggle_selection("2");

        // Act
        let text = view(&browser);

        // Assert
        assert!(text.contains("report.pdf"));
        assert!(text.contains("verified"));
        assert!(text.contains("pending"));
        assert!(text.contains("unavailable"));
        assert!(text.contains("4 KB"));
        assert!(text.contains("Delete (1)"));
        assert!(text.contains("Select All"));
    }

    #[tokio::test]
    async fn view_shows_placeholder() {
        // Arrange
        let backend = MemoryBackend::new();
        backend.login("u1");
        let mut browser = FileBrowser::new(backend, RecordingSurface::new(), "http://x");

        // Act
        let loading = view(&browser);
        browser.mount().await;
        let empty = view(&browser);

        // Assert
        assert_eq!(loading, "Loading...");
        assert!(empty.contains("No files uploaded yet"));
    }
}
