//! Terminal and JSON rendering of the visible page.

use casetable_lib::Record;
use casetable_lib::TableEngine;
use casetable_lib::pagination::PageInfo;
use casetable_lib::query::Direction;
use casetable_lib::query::FilterChip;
use casetable_lib::state::ViewState;
use comfy_table::ContentArrangement;
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;
use serde::Serialize;

#[derive(Serialize)]
struct JsonOutput<'a> {
    rows: Vec<&'a Record>,
    page: PageInfo,
    state: ViewState,
}

/// Visible rows, page window and view state as pretty JSON.
pub fn render_json(table: &TableEngine<Record>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonOutput {
        rows: table.visible_rows(),
        page: table.page_info(),
        state: table.state(),
    })
}

/// Visible page as a text table, followed by the filter summary and footer.
pub fn render_table(table: &TableEngine<Record>, narrow: bool) -> String {
    let columns = table.visible_columns(narrow);
    let sort = table.sort_state();

    let mut header = vec![selection_marker(
        table.is_all_visible_selected(),
        table.is_partially_selected(),
    )];
    header.extend(columns.iter().map(|column| {
        if sort.field.as_deref() == Some(column.accessor_key.as_str()) {
            let arrow = match sort.direction {
                Direction::Asc => "\u{2191}",
                Direction::Desc => "\u{2193}",
            };
            format!("{} {arrow}", column.header)
        } else {
            column.header.clone()
        }
    }));

    let mut grid = Table::new();
    grid.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for row in table.visible_rows() {
        let marker = selection_marker(table.is_selected(&table.id_of(row)), false);
        let mut cells = vec![marker];
        cells.extend(columns.iter().map(|column| table.cell_text(row, column)));
        grid.add_row(cells);
    }

    let mut out = grid.to_string();
    let chips = table.filter_summary();
    if !chips.is_empty() {
        out.push_str(&format!("\nFilters: {}", summarize(&chips)));
    }
    if !table.search().is_empty() {
        out.push_str(&format!("\nSearch: {:?}", table.search()));
    }
    out.push('\n');
    out.push_str(&footer(&table.page_info(), table.selected_ids().len()));
    out
}

fn selection_marker(selected: bool, partial: bool) -> String {
    match (selected, partial) {
        (true, _) => "[x]",
        (false, true) => "[-]",
        (false, false) => "[ ]",
    }
    .to_string()
}

fn summarize(chips: &[FilterChip]) -> String {
    chips
        .iter()
        .map(|chip| format!("{}: {}", chip.filter_label, chip.label))
        .collect::<Vec<_>>()
        .join(", ")
}

fn footer(info: &PageInfo, selected: usize) -> String {
    let mut line = if info.total == 0 {
        "No matching rows".to_string()
    } else {
        format!("Showing {}-{} of {}", info.first, info.last, info.total)
    };
    if info.page_size.is_some() && info.total_pages > 1 {
        line.push_str(&format!(" (page {}/{})", info.current_page, info.total_pages));
    }
    if info.has_more {
        line.push_str(" (more available)");
    }
    if selected > 0 {
        line.push_str(&format!(", {selected} selected"));
    }
    line
}
