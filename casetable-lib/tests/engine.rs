//! Integration tests for the table engine.
//!
//! These drive the public API the way a list page would: build a config,
//! feed records, then mutate search, filters, sort, paging and selection.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use casetable_lib::ColumnDef;
use casetable_lib::Record;
use casetable_lib::TableConfig;
use casetable_lib::TableEngine;
use casetable_lib::pagination::PaginationConfig;
use casetable_lib::query::ActiveFilters;
use casetable_lib::query::FilterDef;
use casetable_lib::query::SortState;
use serde_json::json;

fn names(rows: Vec<&Record>) -> Vec<String> {
    rows.into_iter()
        .map(|row| row.get_string("name").unwrap().unwrap_or_default().to_string())
        .collect()
}

fn status_config() -> TableConfig {
    TableConfig::new()
        .with_columns(vec![
            ColumnDef::new("name", "Name").sortable(),
            ColumnDef::new("status", "Status"),
        ])
        .with_filters(vec![
            FilterDef::new("status", "Status")
                .option("active", "Active")
                .option("inactive", "Inactive"),
        ])
        .with_search_keys(["name"])
}

fn alice_bob_carol() -> Vec<Record> {
    vec![
        Record::new().set("id", "1").set("name", "Alice").set("status", "active"),
        Record::new().set("id", "2").set("name", "Bob").set("status", "inactive"),
        Record::new().set("id", "3").set("name", "Carol").set("status", "active"),
    ]
}

fn numbered(count: usize) -> Vec<Record> {
    (1..=count)
        .map(|i| {
            Record::new()
                .set("id", i.to_string())
                .set("name", format!("Client {i:02}"))
                .set("status", if i % 3 == 0 { "inactive" } else { "active" })
        })
        .collect()
}

#[test]
fn test_end_to_end_search_filter_sort() {
    let mut table = TableEngine::new(status_config(), alice_bob_carol()).unwrap();

    table.set_search("A");
    assert_eq!(names(table.visible_rows()), vec!["Alice", "Carol"]);

    table.toggle_filter_value("status", "active");
    assert_eq!(names(table.visible_rows()), vec!["Alice", "Carol"]);

    table.toggle_sort("name");
    table.toggle_sort("name");
    assert_eq!(table.sort_state(), &SortState::desc("name"));
    assert_eq!(names(table.visible_rows()), vec!["Carol", "Alice"]);
}

#[test]
fn test_search_is_substring_and_case_insensitive() {
    let mut table = TableEngine::new(
        status_config(),
        vec![Record::new().set("id", "1").set("name", "John Doe")],
    )
    .unwrap();

    table.set_search("doe");
    assert_eq!(table.filtered_count(), 1);
    table.set_search("doex");
    assert_eq!(table.filtered_count(), 0);
    table.set_search("xyz");
    assert_eq!(table.filtered_count(), 0);
    table.set_search("doe ");
    assert_eq!(table.filtered_count(), 0);
    table.set_search("   ");
    assert_eq!(table.filtered_count(), 0);
    table.set_search("");
    assert_eq!(table.filtered_count(), 1);
}

#[test]
fn test_pagination_bounds() {
    let mut table = TableEngine::new(status_config(), numbered(15)).unwrap();
    assert_eq!(table.total_pages(), 2);
    assert_eq!(table.visible_rows().len(), 10);

    assert_eq!(table.set_page(3), 2);
    assert_eq!(table.visible_rows().len(), 5);
    assert!(!table.next_page());

    assert_eq!(table.set_page(0), 1);
    assert!(!table.prev_page());
    assert!(table.next_page());
    assert_eq!(table.current_page(), 2);

    let info = table.page_info();
    assert_eq!((info.first, info.last, info.total), (11, 15, 15));
}

#[test]
fn test_mutations_reset_to_first_page() {
    let mut table = TableEngine::new(status_config(), numbered(30)).unwrap();

    table.set_page(2);
    table.toggle_filter_value("status", "active");
    assert_eq!(table.current_page(), 1);

    table.set_page(2);
    table.set_search("Client");
    assert_eq!(table.current_page(), 1);

    table.set_page(2);
    table.toggle_sort("name");
    assert_eq!(table.current_page(), 1);

    table.set_page(2);
    table.clear_filter_group("status");
    assert_eq!(table.current_page(), 1);
}

#[test]
fn test_page_size_change_returns_to_first_page() {
    let mut table = TableEngine::new(status_config(), numbered(30)).unwrap();
    table.set_page(3);
    table.set_page_size(25).unwrap();
    assert_eq!(table.current_page(), 1);
    assert_eq!(table.total_pages(), 2);
    assert!(table.set_page_size(0).is_err());
}

#[test]
fn test_select_all_round_trip() {
    let mut table = TableEngine::new(status_config(), numbered(15)).unwrap();

    table.toggle_selection("2");
    let before = table.selected_ids();

    assert!(table.toggle_all_visible());
    assert_eq!(table.selected_ids().len(), 10);
    assert!(table.is_all_visible_selected());

    assert!(!table.toggle_all_visible());
    assert!(table.selected_ids().is_empty());

    // From "all visible selected", two toggles restore the set.
    table.toggle_all_visible();
    let all = table.selected_ids();
    table.toggle_all_visible();
    table.toggle_all_visible();
    assert_eq!(table.selected_ids(), all);
    assert_ne!(all, before);
}

#[test]
fn test_select_all_scopes_to_page_in_fixed_mode() {
    let mut table = TableEngine::new(status_config(), numbered(15)).unwrap();
    table.set_page(2);
    table.toggle_all_visible();
    assert_eq!(table.selected_ids().len(), 5);
    assert!(table.is_selected("15"));
    assert!(!table.is_selected("1"));
}

#[test]
fn test_select_all_scopes_to_filtered_rows_in_infinite_mode() {
    let config = status_config().with_pagination(PaginationConfig::Infinite { has_more: true });
    let mut table = TableEngine::new(config, numbered(15)).unwrap();
    table.toggle_filter_value("status", "active");

    table.toggle_all_visible();
    assert_eq!(table.selected_ids().len(), 10);
    assert!(!table.is_selected("3"));
}

#[test]
fn test_partial_selection_and_filtered_out_rows_stay_selected() {
    let mut table = TableEngine::new(status_config(), alice_bob_carol()).unwrap();
    table.toggle_selection("2");
    assert!(table.is_partially_selected());

    table.toggle_filter_value("status", "active");
    assert!(table.is_selected("2"));
    assert!(!table.is_partially_selected());
    assert_eq!(names(table.selected_rows()), vec!["Bob"]);
}

#[test]
fn test_infinite_scroll_load_more() {
    let config = status_config().with_pagination(PaginationConfig::Infinite { has_more: true });
    let mut table = TableEngine::new(config, numbered(20)).unwrap();
    assert_eq!(table.visible_rows().len(), 20);

    let loads = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&loads);
    table.on_load_more(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    assert!(table.set_sentinel_visible(true));
    assert!(!table.set_sentinel_visible(true));
    assert_eq!(loads.load(Ordering::SeqCst), 1);

    // Caller fetches the next batch.
    table.set_loading_more(true);
    table.set_sentinel_visible(false);
    assert!(!table.set_sentinel_visible(true));
    table.append_records(numbered(25).into_iter().skip(20));
    table.set_loading_more(false);
    table.set_has_more(false);
    assert_eq!(table.filtered_count(), 25);

    table.set_sentinel_visible(false);
    assert!(!table.set_sentinel_visible(true));
    assert_eq!(loads.load(Ordering::SeqCst), 1);

    let info = table.page_info();
    assert_eq!(info.page_size, None);
    assert!(!info.has_more);
}

#[test]
fn test_change_listeners() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut table = TableEngine::new(status_config(), alice_bob_carol()).unwrap();

    let log = Arc::clone(&events);
    table.on_search_change(move |query| log.lock().unwrap().push(format!("search {query}")));
    let log = Arc::clone(&events);
    table.on_filters_change(move |filters: &ActiveFilters| {
        log.lock()
            .unwrap()
            .push(format!("filters {}", filters.active_count()))
    });
    let log = Arc::clone(&events);
    table.on_sort_change(move |sort: &SortState| {
        log.lock()
            .unwrap()
            .push(format!("sort {:?}", sort.direction))
    });

    table.set_search("al");
    table.toggle_filter_value("status", "active");
    table.toggle_sort("name");
    table.toggle_sort("name");
    assert!(!table.clear_filter_group("missing"));
    table.clear_all();

    assert_eq!(
        *events.lock().unwrap(),
        vec![
            "search al",
            "filters 1",
            "sort Asc",
            "sort Desc",
            "search ",
            "filters 0",
        ]
    );
}

#[test]
fn test_records_from_json() {
    let records: Vec<Record> = serde_json::from_value(json!([
        {"id": "a", "name": "Acme", "risk": {"level": 3}, "tags": ["pep"]},
        {"id": "b", "name": "Beta", "risk": {"level": 1}, "tags": []},
        {"id": "c", "name": "Cobalt", "risk": null}
    ]))
    .unwrap();

    let config = TableConfig::new()
        .with_columns(vec![
            ColumnDef::new("name", "Name"),
            ColumnDef::new("risk", "Risk").accessor("risk.level").sortable(),
        ])
        .with_filters(vec![FilterDef::new("tags", "Tags").option("pep", "PEP")]);
    let mut table = TableEngine::new(config, records).unwrap();

    table.toggle_sort_column("risk");
    table.toggle_sort_column("risk");
    assert_eq!(names(table.visible_rows()), vec!["Acme", "Beta", "Cobalt"]);

    let risk = table.column("risk").unwrap().clone();
    let cells: Vec<_> = table
        .visible_rows()
        .into_iter()
        .map(|row| table.cell_text(row, &risk))
        .collect();
    assert_eq!(cells, vec!["3", "1", ""]);

    table.toggle_filter_value("tags", "pep");
    assert_eq!(names(table.visible_rows()), vec!["Acme"]);
    let counts = table.option_counts("tags").unwrap();
    assert_eq!(counts[0].count, 1);
}

#[test]
fn test_json_values_as_rows() {
    let rows = vec![
        json!({"id": 1, "client": {"name": "Zed"}}),
        json!({"id": 2, "client": {"name": "amy"}}),
        json!({"id": 3}),
    ];
    let config = TableConfig::new().with_search_keys(["client.name"]);
    let mut table = TableEngine::new(config, rows).unwrap();

    table.toggle_sort("client.name");
    let ids: Vec<_> = table
        .visible_rows()
        .into_iter()
        .map(|row| table.id_of(row))
        .collect();
    assert_eq!(ids, vec!["2", "1", "3"]);

    table.set_search("ZE");
    assert_eq!(table.filtered_count(), 1);
}

#[test]
fn test_state_snapshot_restores_view() {
    let mut table = TableEngine::new(status_config(), numbered(30)).unwrap();
    table.toggle_filter_value("status", "active");
    table.toggle_sort("name");
    table.set_page(2);
    let state = table.state();

    let json = serde_json::to_string(&state).unwrap();
    let config = TableConfig {
        initial: serde_json::from_str(&json).unwrap(),
        ..status_config()
    };
    let restored = TableEngine::new(config, numbered(30)).unwrap();
    assert_eq!(restored.state(), state);
    assert_eq!(names(restored.visible_rows()), names(table.visible_rows()));
}

#[test]
fn test_filter_summary_chips() {
    let mut table = TableEngine::new(status_config(), alice_bob_carol()).unwrap();
    table.set_filter_group("status", ["inactive", "active"]);
    let labels: Vec<_> = table
        .filter_summary()
        .into_iter()
        .map(|chip| chip.label)
        .collect();
    assert_eq!(labels, vec!["Active", "Inactive"]);
    assert_eq!(table.filtered_count(), 3);
}

#[test]
fn test_filter_without_definition_applies_by_path() {
    let rows = vec![
        Record::new().set("id", "1").set("status", "active"),
        Record::new().set("id", "2").set("status", "pending"),
    ];
    let mut table = TableEngine::new(TableConfig::new(), rows).unwrap();

    table.toggle_filter_value("status", "active");
    assert_eq!(table.filtered_count(), 1);
    assert_eq!(table.visible_ids(), vec!["1"]);

    let chips = table.filter_summary();
    assert_eq!(chips.len(), 1);
    assert_eq!((chips[0].filter_label.as_str(), chips[0].label.as_str()), ("status", "active"));
}
