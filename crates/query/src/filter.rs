//! Date-range and category filters.
//!
//! Only the dates table is date-stamped; categorical tables are not
//! affected by date filtering. That granularity mismatch is inherited
//! from the export format, not papered over here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use store_core::error::{Error, Result};
use store_core::tables::{resolve_column, TableRow};
use store_core::DateRow;

/// A categorical filter value. `All` passes every row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    All,
    Is(String),
}

impl Selection {
    /// Interpret a raw widget value: the `"All"` sentinel
    /// (case-insensitive) passes everything, anything else matches
    /// exactly.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Is(raw.to_string())
        }
    }
}

/// Rows of the dates table with `from <= date <= to`, both inclusive.
///
/// Idempotent: filtering an already-filtered result by the same range
/// returns the same rows.
pub fn filter_by_date_range(
    dates: &[DateRow],
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DateRow>> {
    if from > to {
        return Err(Error::invalid_range(from, to));
    }

    Ok(dates
        .iter()
        .filter(|r| from <= r.date && r.date <= to)
        .cloned()
        .collect())
}

/// Rows whose `column` value equals the selection, or the full table
/// for `Selection::All`. The column is validated either way; a name
/// the table does not have is `UnknownColumn` regardless of selection.
pub fn filter_by_category<R: TableRow>(
    rows: &[R],
    column: &str,
    selection: &Selection,
) -> Result<Vec<R>> {
    let canonical = resolve_column::<R>(column)
        .ok_or_else(|| Error::unknown_column(R::TABLE, column))?;

    match selection {
        Selection::All => Ok(rows.to_vec()),
        Selection::Is(value) => Ok(rows
            .iter()
            .filter(|r| r.text_field(canonical) == Some(value.as_str()))
            .cloned()
            .collect()),
    }
}
