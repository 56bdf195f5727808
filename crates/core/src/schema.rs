//! Header resolution and row assembly for raw export tables.
//!
//! A raw table is headers plus rows of untyped text, straight from the
//! CSV parse. Assembly resolves each table's required columns against
//! the headers (Search Console localizes some of them, so aliases are
//! accepted), normalizes every cell, and records a [`RowIssue`] for
//! each row that had to be dropped or flagged. Malformed data is
//! isolated to its row; only a missing column or an oversized table
//! fails the whole load.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{Error, Result};
use crate::limits::MAX_TABLE_ROWS;
use crate::normalize::{parse_count, parse_ctr, parse_date, parse_position, ParseError};
use crate::tables::{
    AppearanceRow, CountryRow, DateRow, DeviceRow, PageRow, QueryRow, TableKind,
};

/// An unnormalized table: trimmed headers plus rows of raw cell text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }
}

/// What went wrong with a single row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum IssueKind {
    /// CTR cell failed to parse; row dropped.
    MalformedCtr { value: String },
    /// Date cell failed to parse; row dropped.
    MalformedDate { value: String },
    /// A count or position cell failed to parse; row dropped.
    MalformedNumber { column: &'static str, value: String },
    /// CTR parsed but fell outside [0, 100]; row dropped.
    CtrOutOfRange { value: String },
    /// A field violated its declared bounds; row dropped.
    FieldOutOfBounds { detail: String },
    /// Clicks exceed impressions. The source does not enforce this
    /// invariant, so the row is kept and flagged.
    ClicksExceedImpressions { clicks: u64, impressions: u64 },
    /// A later row carries the same date; this row was superseded.
    DuplicateDate { date: NaiveDate },
}

impl IssueKind {
    /// Whether this issue removes the row from the snapshot.
    pub fn drops_row(&self) -> bool {
        !matches!(self, Self::ClicksExceedImpressions { .. })
    }
}

/// A recorded per-row rejection or flag.
///
/// `row` is the zero-based data row index, header excluded — the same
/// index a presentation layer would show next to the offending line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowIssue {
    pub table: TableKind,
    pub row: usize,
    #[serde(flatten)]
    pub issue: IssueKind,
    pub dropped: bool,
}

impl RowIssue {
    pub fn new(table: TableKind, row: usize, issue: IssueKind) -> Self {
        let dropped = issue.drops_row();
        Self {
            table,
            row,
            issue,
            dropped,
        }
    }
}

// Accepted header spellings per column, lowercase. GSC renamed the key
// column of the query/page reports across export versions.
const DATE_ALIASES: &[&str] = &["date"];
const QUERY_ALIASES: &[&str] = &["top queries", "query", "queries"];
const PAGE_ALIASES: &[&str] = &["top pages", "page", "pages"];
const DEVICE_ALIASES: &[&str] = &["device"];
const COUNTRY_ALIASES: &[&str] = &["country"];
const APPEARANCE_ALIASES: &[&str] = &["search appearance"];
const CLICKS_ALIASES: &[&str] = &["clicks"];
const IMPRESSIONS_ALIASES: &[&str] = &["impressions"];
const CTR_ALIASES: &[&str] = &["ctr"];
const POSITION_ALIASES: &[&str] = &["position"];

/// Find the index of a column among the headers, matching any alias
/// case-insensitively on the trimmed header text.
fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = h.trim();
        aliases.iter().any(|a| h.eq_ignore_ascii_case(a))
    })
}

/// Like [`find_column`] but a required column: absence fails the load.
fn require_column(
    raw: &RawTable,
    table: TableKind,
    canonical: &'static str,
    aliases: &[&str],
) -> Result<usize> {
    find_column(&raw.headers, aliases).ok_or_else(|| Error::missing_column(table, canonical))
}

fn check_row_limit(table: TableKind, raw: &RawTable) -> Result<()> {
    if raw.rows.len() > MAX_TABLE_ROWS {
        return Err(Error::table_too_large(
            table,
            format!("{} rows exceeds {} row limit", raw.rows.len(), MAX_TABLE_ROWS),
        ));
    }
    Ok(())
}

/// Cell text at a column index; short (flexible) rows read as empty.
fn cell<'a>(row: &'a [String], idx: usize) -> &'a str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

/// Outcome of assembling one table: surviving rows plus every issue.
type Assembled<R> = (Vec<R>, Vec<RowIssue>);

/// Assemble the dates table.
///
/// Duplicate dates keep the last occurrence (superseded rows are
/// recorded), and the result is ordered by date.
pub fn build_dates(raw: &RawTable) -> Result<Assembled<DateRow>> {
    const TABLE: TableKind = TableKind::Dates;
    check_row_limit(TABLE, raw)?;

    let date_idx = require_column(raw, TABLE, "Date", DATE_ALIASES)?;
    let clicks_idx = require_column(raw, TABLE, "Clicks", CLICKS_ALIASES)?;
    let impressions_idx = require_column(raw, TABLE, "Impressions", IMPRESSIONS_ALIASES)?;
    let ctr_idx = require_column(raw, TABLE, "CTR", CTR_ALIASES)?;
    let position_idx = require_column(raw, TABLE, "Position", POSITION_ALIASES)?;

    let mut issues = Vec::new();
    let mut parsed: Vec<(usize, DateRow)> = Vec::with_capacity(raw.rows.len());

    for (i, rec) in raw.rows.iter().enumerate() {
        let date = match parse_date(cell(rec, date_idx)) {
            Ok(d) => d,
            Err(_) => {
                issues.push(RowIssue::new(
                    TABLE,
                    i,
                    IssueKind::MalformedDate {
                        value: cell(rec, date_idx).to_string(),
                    },
                ));
                continue;
            }
        };

        let Some(clicks) = parse_count_cell(rec, clicks_idx, "clicks", TABLE, i, &mut issues)
        else {
            continue;
        };
        let Some(impressions) =
            parse_count_cell(rec, impressions_idx, "impressions", TABLE, i, &mut issues)
        else {
            continue;
        };
        let Some(ctr) = parse_ctr_cell(rec, ctr_idx, TABLE, i, &mut issues) else {
            continue;
        };
        let Some(position) = parse_position_cell(rec, position_idx, TABLE, i, &mut issues) else {
            continue;
        };

        let row = DateRow {
            date,
            clicks,
            impressions,
            ctr,
            position,
        };
        if !validate_bounds(&row, TABLE, i, &mut issues) {
            continue;
        }
        flag_click_excess(clicks, impressions, TABLE, i, &mut issues);
        parsed.push((i, row));
    }

    // Keep-last for duplicate dates.
    let mut last_for_date: HashMap<NaiveDate, usize> = HashMap::with_capacity(parsed.len());
    for (pos, (_, row)) in parsed.iter().enumerate() {
        last_for_date.insert(row.date, pos);
    }

    let mut rows = Vec::with_capacity(parsed.len());
    for (pos, (raw_idx, row)) in parsed.iter().enumerate() {
        if last_for_date[&row.date] == pos {
            rows.push(row.clone());
        } else {
            issues.push(RowIssue::new(
                TableKind::Dates,
                *raw_idx,
                IssueKind::DuplicateDate { date: row.date },
            ));
        }
    }
    rows.sort_by_key(|r| r.date);

    Ok((rows, issues))
}

/// Assemble the queries table, preserving input order.
pub fn build_queries(raw: &RawTable) -> Result<Assembled<QueryRow>> {
    build_keyed_full(raw, TableKind::Queries, "Top queries", QUERY_ALIASES, |key, m| {
        QueryRow {
            query: key,
            clicks: m.clicks,
            impressions: m.impressions,
            ctr: m.ctr,
            position: m.position,
        }
    })
}

/// Assemble the pages table, preserving input order.
pub fn build_pages(raw: &RawTable) -> Result<Assembled<PageRow>> {
    build_keyed_full(raw, TableKind::Pages, "Top pages", PAGE_ALIASES, |key, m| PageRow {
        page: key,
        clicks: m.clicks,
        impressions: m.impressions,
        ctr: m.ctr,
        position: m.position,
    })
}

/// Assemble the search-appearance table, preserving input order.
pub fn build_search_appearance(raw: &RawTable) -> Result<Assembled<AppearanceRow>> {
    build_keyed_full(
        raw,
        TableKind::SearchAppearance,
        "Search Appearance",
        APPEARANCE_ALIASES,
        |key, m| AppearanceRow {
            appearance: key,
            clicks: m.clicks,
            impressions: m.impressions,
            ctr: m.ctr,
            position: m.position,
        },
    )
}

/// Assemble the devices table. CTR and position columns are optional.
pub fn build_devices(raw: &RawTable) -> Result<Assembled<DeviceRow>> {
    const TABLE: TableKind = TableKind::Devices;
    check_row_limit(TABLE, raw)?;

    let key_idx = require_column(raw, TABLE, "Device", DEVICE_ALIASES)?;
    let clicks_idx = require_column(raw, TABLE, "Clicks", CLICKS_ALIASES)?;
    let impressions_idx = require_column(raw, TABLE, "Impressions", IMPRESSIONS_ALIASES)?;
    let ctr_idx = find_column(&raw.headers, CTR_ALIASES);
    let position_idx = find_column(&raw.headers, POSITION_ALIASES);

    let mut issues = Vec::new();
    let mut rows = Vec::with_capacity(raw.rows.len());

    for (i, rec) in raw.rows.iter().enumerate() {
        let Some(clicks) = parse_count_cell(rec, clicks_idx, "clicks", TABLE, i, &mut issues)
        else {
            continue;
        };
        let Some(impressions) =
            parse_count_cell(rec, impressions_idx, "impressions", TABLE, i, &mut issues)
        else {
            continue;
        };
        let Some(ctr) = parse_optional_ctr(rec, ctr_idx, TABLE, i, &mut issues) else {
            continue;
        };
        let Some(position) = parse_optional_position(rec, position_idx, TABLE, i, &mut issues)
        else {
            continue;
        };

        let row = DeviceRow {
            device: cell(rec, key_idx).trim().to_string(),
            clicks,
            impressions,
            ctr,
            position,
        };
        if !validate_bounds(&row, TABLE, i, &mut issues) {
            continue;
        }
        flag_click_excess(clicks, impressions, TABLE, i, &mut issues);
        rows.push(row);
    }

    Ok((rows, issues))
}

/// Assemble the countries table. Clicks, CTR, and position are optional.
pub fn build_countries(raw: &RawTable) -> Result<Assembled<CountryRow>> {
    const TABLE: TableKind = TableKind::Countries;
    check_row_limit(TABLE, raw)?;

    let key_idx = require_column(raw, TABLE, "Country", COUNTRY_ALIASES)?;
    let impressions_idx = require_column(raw, TABLE, "Impressions", IMPRESSIONS_ALIASES)?;
    let clicks_idx = find_column(&raw.headers, CLICKS_ALIASES);
    let ctr_idx = find_column(&raw.headers, CTR_ALIASES);
    let position_idx = find_column(&raw.headers, POSITION_ALIASES);

    let mut issues = Vec::new();
    let mut rows = Vec::with_capacity(raw.rows.len());

    for (i, rec) in raw.rows.iter().enumerate() {
        let Some(impressions) =
            parse_count_cell(rec, impressions_idx, "impressions", TABLE, i, &mut issues)
        else {
            continue;
        };
        let clicks = match clicks_idx {
            Some(idx) if !cell(rec, idx).trim().is_empty() => {
                match parse_count_cell(rec, idx, "clicks", TABLE, i, &mut issues) {
                    Some(c) => Some(c),
                    None => continue,
                }
            }
            _ => None,
        };
        let Some(ctr) = parse_optional_ctr(rec, ctr_idx, TABLE, i, &mut issues) else {
            continue;
        };
        let Some(position) = parse_optional_position(rec, position_idx, TABLE, i, &mut issues)
        else {
            continue;
        };

        let row = CountryRow {
            country: cell(rec, key_idx).trim().to_string(),
            clicks,
            impressions,
            ctr,
            position,
        };
        if !validate_bounds(&row, TABLE, i, &mut issues) {
            continue;
        }
        if let Some(clicks) = clicks {
            flag_click_excess(clicks, impressions, TABLE, i, &mut issues);
        }
        rows.push(row);
    }

    Ok((rows, issues))
}

/// Full metric quartet for the tables that always carry all four.
struct Metrics {
    clicks: u64,
    impressions: u64,
    ctr: f64,
    position: f64,
}

/// Shared assembly for the keyed tables with the full metric quartet
/// (queries, pages, search appearance). Input order is preserved:
/// exports arrive pre-sorted by clicks and top-N relies on it.
fn build_keyed_full<R: Validate>(
    raw: &RawTable,
    table: TableKind,
    key_column: &'static str,
    key_aliases: &[&str],
    make_row: impl Fn(String, Metrics) -> R,
) -> Result<Assembled<R>> {
    check_row_limit(table, raw)?;

    let key_idx = require_column(raw, table, key_column, key_aliases)?;
    let clicks_idx = require_column(raw, table, "Clicks", CLICKS_ALIASES)?;
    let impressions_idx = require_column(raw, table, "Impressions", IMPRESSIONS_ALIASES)?;
    let ctr_idx = require_column(raw, table, "CTR", CTR_ALIASES)?;
    let position_idx = require_column(raw, table, "Position", POSITION_ALIASES)?;

    let mut issues = Vec::new();
    let mut rows = Vec::with_capacity(raw.rows.len());

    for (i, rec) in raw.rows.iter().enumerate() {
        let Some(clicks) = parse_count_cell(rec, clicks_idx, "clicks", table, i, &mut issues)
        else {
            continue;
        };
        let Some(impressions) =
            parse_count_cell(rec, impressions_idx, "impressions", table, i, &mut issues)
        else {
            continue;
        };
        let Some(ctr) = parse_ctr_cell(rec, ctr_idx, table, i, &mut issues) else {
            continue;
        };
        let Some(position) = parse_position_cell(rec, position_idx, table, i, &mut issues) else {
            continue;
        };

        let row = make_row(
            cell(rec, key_idx).trim().to_string(),
            Metrics {
                clicks,
                impressions,
                ctr,
                position,
            },
        );
        if !validate_bounds(&row, table, i, &mut issues) {
            continue;
        }
        flag_click_excess(clicks, impressions, table, i, &mut issues);
        rows.push(row);
    }

    Ok((rows, issues))
}

fn parse_count_cell(
    rec: &[String],
    idx: usize,
    column: &'static str,
    table: TableKind,
    row: usize,
    issues: &mut Vec<RowIssue>,
) -> Option<u64> {
    match parse_count(cell(rec, idx)) {
        Ok(v) => Some(v),
        Err(_) => {
            issues.push(RowIssue::new(
                table,
                row,
                IssueKind::MalformedNumber {
                    column,
                    value: cell(rec, idx).to_string(),
                },
            ));
            None
        }
    }
}

fn parse_ctr_cell(
    rec: &[String],
    idx: usize,
    table: TableKind,
    row: usize,
    issues: &mut Vec<RowIssue>,
) -> Option<f64> {
    let raw = cell(rec, idx);
    match parse_ctr(raw) {
        Ok(v) => Some(v),
        Err(ParseError::OutOfRange) => {
            issues.push(RowIssue::new(
                table,
                row,
                IssueKind::CtrOutOfRange {
                    value: raw.to_string(),
                },
            ));
            None
        }
        Err(_) => {
            issues.push(RowIssue::new(
                table,
                row,
                IssueKind::MalformedCtr {
                    value: raw.to_string(),
                },
            ));
            None
        }
    }
}

fn parse_position_cell(
    rec: &[String],
    idx: usize,
    table: TableKind,
    row: usize,
    issues: &mut Vec<RowIssue>,
) -> Option<f64> {
    match parse_position(cell(rec, idx)) {
        Ok(v) => Some(v),
        Err(_) => {
            issues.push(RowIssue::new(
                table,
                row,
                IssueKind::MalformedNumber {
                    column: "position",
                    value: cell(rec, idx).to_string(),
                },
            ));
            None
        }
    }
}

/// Optional CTR column: absent column or empty cell reads as `None`;
/// a present, non-empty cell must still parse. Returns `None` in the
/// outer Option when the row must be dropped.
#[allow(clippy::option_option)]
fn parse_optional_ctr(
    rec: &[String],
    idx: Option<usize>,
    table: TableKind,
    row: usize,
    issues: &mut Vec<RowIssue>,
) -> Option<Option<f64>> {
    match idx {
        None => Some(None),
        Some(idx) if cell(rec, idx).trim().is_empty() => Some(None),
        Some(idx) => parse_ctr_cell(rec, idx, table, row, issues).map(Some),
    }
}

#[allow(clippy::option_option)]
fn parse_optional_position(
    rec: &[String],
    idx: Option<usize>,
    table: TableKind,
    row: usize,
    issues: &mut Vec<RowIssue>,
) -> Option<Option<f64>> {
    match idx {
        None => Some(None),
        Some(idx) if cell(rec, idx).trim().is_empty() => Some(None),
        Some(idx) => parse_position_cell(rec, idx, table, row, issues).map(Some),
    }
}

/// Run derive validations; a violation drops the row and records the
/// validator's message.
fn validate_bounds<R: Validate>(
    row: &R,
    table: TableKind,
    idx: usize,
    issues: &mut Vec<RowIssue>,
) -> bool {
    match row.validate() {
        Ok(()) => true,
        Err(e) => {
            issues.push(RowIssue::new(
                table,
                idx,
                IssueKind::FieldOutOfBounds {
                    detail: e.to_string(),
                },
            ));
            false
        }
    }
}

/// Cross-field check: clicks should never exceed impressions. The
/// source does not enforce it, so the row is kept and flagged.
fn flag_click_excess(
    clicks: u64,
    impressions: u64,
    table: TableKind,
    idx: usize,
    issues: &mut Vec<RowIssue>,
) {
    if clicks > impressions {
        issues.push(RowIssue::new(
            table,
            idx,
            IssueKind::ClicksExceedImpressions {
                clicks,
                impressions,
            },
        ));
    }
}
