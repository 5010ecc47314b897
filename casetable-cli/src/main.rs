mod output;

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use casetable_lib::ColumnDef;
use casetable_lib::Record;
use casetable_lib::TableConfig;
use casetable_lib::TableEngine;
use casetable_lib::pagination::PaginationConfig;
use casetable_lib::query::SortState;
use clap::Parser;
use log::debug;
use log::info;
use serde::de::DeserializeOwned;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::WriteLogger;

/// Search, filter, sort and page a JSON array of records
#[derive(Parser, Debug)]
#[command(name = "casetable")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file holding an array of records
    #[arg(short, long)]
    records: PathBuf,

    /// JSON table configuration (columns, filters, search keys, pagination)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Free-text search query
    #[arg(short, long)]
    search: Option<String>,

    /// Filter value as `filter_id=value` (repeatable)
    #[arg(short, long = "filter", value_parser = parse_filter)]
    filters: Vec<(String, String)>,

    /// Sort as `field` or `field:asc` / `field:desc`
    #[arg(long, value_parser = parse_sort)]
    sort: Option<SortState>,

    /// Page to show (1-based)
    #[arg(short, long)]
    page: Option<usize>,

    /// Rows per page (switches to fixed pagination)
    #[arg(long)]
    page_size: Option<usize>,

    /// Row id to mark as selected (repeatable)
    #[arg(long = "select")]
    selected: Vec<String>,

    /// Hide columns flagged for narrow viewports
    #[arg(long)]
    narrow: bool,

    /// Print the visible rows and view state as JSON
    #[arg(long)]
    json: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    WriteLogger::init(args.log_level, Config::default(), std::io::stderr())
        .context("Failed to initialize logger")?;

    let records: Vec<Record> = read_json(&args.records)?;
    let mut config: TableConfig = match &args.config {
        Some(path) => read_json(path)?,
        None => TableConfig::new(),
    };
    info!(
        "Loaded {} records from {}",
        records.len(),
        args.records.display()
    );

    if config.columns.is_empty() {
        config.columns = infer_columns(&records);
        debug!("Inferred {} columns", config.columns.len());
    }
    if config.search_keys.is_empty() {
        config.search_keys = config
            .columns
            .iter()
            .map(|c| c.accessor_key.clone())
            .collect();
    }
    if let Some(page_size) = args.page_size {
        config.pagination = PaginationConfig::Fixed { page_size };
    }

    let mut table = TableEngine::new(config, records).context("Invalid table configuration")?;

    if let Some(query) = &args.search {
        table.set_search(query.as_str());
    }
    for (filter_id, value) in &args.filters {
        if !table.active_filters().is_active(filter_id, value) {
            table.toggle_filter_value(filter_id, value);
        }
    }
    if let Some(sort) = args.sort {
        table.set_sort(sort);
    }
    if let Some(page) = args.page {
        table.set_page(page);
    }
    for id in &args.selected {
        if !table.is_selected(id) {
            table.toggle_selection(id);
        }
    }

    if args.json {
        println!("{}", output::render_json(&table)?);
    } else {
        println!("{}", output::render_table(&table, args.narrow));
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// One sortable column per field of the first record, alphabetically.
fn infer_columns(records: &[Record]) -> Vec<ColumnDef> {
    let Some(first) = records.first() else {
        return Vec::new();
    };
    let mut keys: Vec<&String> = first.fields().keys().collect();
    keys.sort();
    keys.into_iter()
        .map(|key| ColumnDef::new(key.as_str(), key.as_str()).sortable())
        .collect()
}

fn parse_filter(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((id, value)) if !id.is_empty() => Ok((id.to_string(), value.to_string())),
        _ => Err(format!("expected filter_id=value, got '{s}'")),
    }
}

fn parse_sort(s: &str) -> Result<SortState, String> {
    let (field, direction) = s.split_once(':').unwrap_or((s, "asc"));
    if field.is_empty() {
        return Err("sort field must not be empty".to_string());
    }
    match direction.to_lowercase().as_str() {
        "asc" => Ok(SortState::asc(field)),
        "desc" => Ok(SortState::desc(field)),
        other => Err(format!("unknown sort direction '{other}'")),
    }
}
