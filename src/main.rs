//! Searchdeck GSC Metrics Store
//!
//! Command-line report surface over the metrics store:
//! - loads the Search Console export CSVs from a data directory
//! - normalizes them into an immutable snapshot (through the cache)
//! - prints the KPI summary, top slices, and correlation matrix
//!
//! Missing required files surface the awaiting-input state rather
//! than a partial report.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{info, warn};

use query_engine::{
    correlation_matrix, filter_by_date_range, top_n, top_n_by, totals, CorrelationCell,
};
use session_store::SessionStore;
use store_core::{Error as StoreError, MetricsSnapshot, RawTable, RawTables, TableKind};
use telemetry::{init_tracing_from_env, StoreMetrics};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    /// Directory containing the export CSVs
    #[serde(default = "default_data_dir")]
    data_dir: String,

    /// Rows shown in the top-queries / top-pages sections
    #[serde(default = "default_top_n")]
    top_n: usize,

    /// Optional report window (inclusive)
    #[serde(default)]
    from: Option<NaiveDate>,
    #[serde(default)]
    to: Option<NaiveDate>,
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_top_n() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            top_n: default_top_n(),
            from: None,
            to: None,
        }
    }
}

/// Candidate file names per table, tried in order.
const TABLE_FILES: [(TableKind, &[&str]); 6] = [
    (TableKind::Dates, &["Dates.csv"]),
    (TableKind::Queries, &["Queries.csv"]),
    (TableKind::Pages, &["Pages.csv"]),
    (TableKind::Devices, &["Devices.csv"]),
    (TableKind::Countries, &["Countries.csv"]),
    (
        TableKind::SearchAppearance,
        &["Search appearance.csv", "SearchAppearance.csv"],
    ),
];

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    info!("Starting Searchdeck metrics store v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;
    info!(data_dir = %config.data_dir, "Loading export tables");

    let raw = read_tables(Path::new(&config.data_dir))?;

    let metrics = StoreMetrics::new();
    let store = SessionStore::new();
    let session = store.open();
    metrics.active_sessions.set(store.active_sessions() as u64);

    let snapshot = match store.load(session, &raw) {
        Ok(snapshot) => snapshot,
        Err(StoreError::MissingInput { missing }) => {
            metrics.uploads_failed.inc();
            warn!(?missing, "required tables absent");
            println!("Awaiting input: upload the missing Search Console CSVs:");
            for table in missing {
                println!("  - {table}");
            }
            return Ok(());
        }
        Err(e) => {
            metrics.uploads_failed.inc();
            return Err(e).context("Failed to load export tables");
        }
    };

    record_load(&metrics, &snapshot);
    print_report(&snapshot, &config)?;

    info!(stats = ?metrics.snapshot(), "Report complete");
    Ok(())
}

fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("SEARCHDECK")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    config
        .try_deserialize()
        .context("Failed to parse configuration")
}

/// Read every export file that exists; absent files stay `None` and
/// the store decides whether that is fatal.
fn read_tables(dir: &Path) -> Result<RawTables> {
    let mut raw = RawTables::default();
    for (kind, candidates) in TABLE_FILES {
        let table = read_first_present(dir, kind, candidates)?;
        match kind {
            TableKind::Dates => raw.dates = table,
            TableKind::Queries => raw.queries = table,
            TableKind::Pages => raw.pages = table,
            TableKind::Devices => raw.devices = table,
            TableKind::Countries => raw.countries = table,
            TableKind::SearchAppearance => raw.search_appearance = table,
        }
    }
    Ok(raw)
}

fn read_first_present(
    dir: &Path,
    kind: TableKind,
    candidates: &[&str],
) -> Result<Option<RawTable>> {
    for name in candidates {
        let path = dir.join(name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()))
            }
        };
        let table = csv_io::read_table(kind, &bytes)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        return Ok(Some(table));
    }
    Ok(None)
}

fn record_load(metrics: &StoreMetrics, snapshot: &MetricsSnapshot) {
    metrics.uploads_loaded.inc();
    let ingested = snapshot.dates.len()
        + snapshot.queries.len()
        + snapshot.pages.len()
        + snapshot.devices.len()
        + snapshot.countries.len()
        + snapshot.search_appearance.as_deref().map_or(0, |t| t.len());
    metrics.rows_ingested.inc_by(ingested as u64);
    metrics.rows_rejected.inc_by(snapshot.dropped_rows() as u64);
    metrics
        .rows_flagged
        .inc_by(snapshot.issues.iter().filter(|i| !i.dropped).count() as u64);
}

fn print_report(snapshot: &MetricsSnapshot, config: &Config) -> Result<()> {
    // Report window: explicit bounds fall back to the snapshot's range.
    let dates = match (snapshot.dates.first(), snapshot.dates.last()) {
        (Some(first), Some(last)) => {
            let from = config.from.unwrap_or(first.date);
            let to = config.to.unwrap_or(last.date);
            let window = filter_by_date_range(&snapshot.dates, from, to)
                .context("Invalid report window")?;
            println!("Search performance report ({from} to {to})");
            window
        }
        _ => {
            println!("Search performance report (no dated rows)");
            Vec::new()
        }
    };
    println!();

    match totals(&dates) {
        Ok(t) => {
            println!("  Total clicks:      {}", t.total_clicks);
            println!("  Total impressions: {}", t.total_impressions);
            println!("  Average CTR:       {:.1}%", t.average_ctr);
            println!("  Average position:  {:.1}", t.average_position);
        }
        Err(e) => println!("  No daily rows in the selected window ({})", e.code()),
    }

    println!("\nTop queries by clicks:");
    for row in top_n(&snapshot.queries, config.top_n)? {
        println!("  {:>6}  {}", row.clicks, row.query);
    }

    println!("\nTop pages by clicks:");
    for row in top_n(&snapshot.pages, config.top_n)? {
        println!("  {:>6}  {}", row.clicks, row.page);
    }

    let device_clicks: u64 = snapshot.devices.iter().map(|d| d.clicks).sum();
    if device_clicks > 0 {
        println!("\nDevice click share:");
        for row in &snapshot.devices {
            let share = row.clicks as f64 / device_clicks as f64 * 100.0;
            println!("  {:>5.1}%  {}", share, row.device);
        }
    }

    println!("\nTop countries by impressions:");
    for row in top_n_by(&snapshot.countries, config.top_n, "impressions")? {
        println!("  {:>8}  {}", row.impressions, row.country);
    }

    if let Some(appearances) = snapshot.search_appearance.as_deref() {
        println!("\nSearch appearances by clicks:");
        for row in top_n(appearances, config.top_n)? {
            println!("  {:>6}  {}", row.clicks, row.appearance);
        }
    }

    if !dates.is_empty() {
        let columns = ["clicks", "impressions", "ctr", "position"];
        let matrix = correlation_matrix(&dates, &columns)?;
        println!("\nMetric correlation:");
        print!("  {:>12}", "");
        for name in &matrix.columns {
            print!(" {name:>11}");
        }
        println!();
        for (i, name) in matrix.columns.iter().enumerate() {
            print!("  {name:>12}");
            for j in 0..matrix.columns.len() {
                match matrix.get(i, j) {
                    CorrelationCell::Coefficient(r) => print!(" {r:>+11.3}"),
                    CorrelationCell::Undefined => print!(" {:>11}", "n/a"),
                }
            }
            println!();
        }
    }

    if !snapshot.issues.is_empty() {
        println!("\nData quality notes:");
        for issue in &snapshot.issues {
            let action = if issue.dropped { "dropped" } else { "kept" };
            println!("  [{}] row {}: {} ({action})", issue.table, issue.row, describe(issue));
        }
    }

    Ok(())
}

fn describe(issue: &store_core::RowIssue) -> String {
    use store_core::IssueKind::*;
    match &issue.issue {
        MalformedCtr { value } => format!("malformed CTR {value:?}"),
        MalformedDate { value } => format!("malformed date {value:?}"),
        MalformedNumber { column, value } => format!("malformed {column} {value:?}"),
        CtrOutOfRange { value } => format!("CTR out of range {value:?}"),
        FieldOutOfBounds { detail } => format!("field out of bounds: {detail}"),
        ClicksExceedImpressions {
            clicks,
            impressions,
        } => format!("clicks {clicks} exceed impressions {impressions}"),
        DuplicateDate { date } => format!("duplicate date {date}, superseded"),
    }
}
