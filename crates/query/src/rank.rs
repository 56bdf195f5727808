//! Top-N slices of categorical tables.

use std::cmp::Ordering;

use store_core::error::{Error, Result};
use store_core::tables::{resolve_column, TableRow};

/// First `n` rows by clicks.
///
/// Exports arrive pre-sorted by descending clicks, so this is a slice
/// of the stored order — re-sorting would break ties differently than
/// the source did.
pub fn top_n<R: TableRow>(rows: &[R], n: usize) -> Result<Vec<R>> {
    top_n_by(rows, n, "clicks")
}

/// First `n` rows by an arbitrary metric column.
///
/// `n` is clamped to the row count, never an error. Sorting only
/// happens when `sort_column` differs from the table's pre-sorted key;
/// the sort is stable and descending, with rows missing the metric
/// ordered last.
pub fn top_n_by<R: TableRow>(rows: &[R], n: usize, sort_column: &str) -> Result<Vec<R>> {
    let canonical = resolve_column::<R>(sort_column)
        .ok_or_else(|| Error::unknown_column(R::TABLE, sort_column))?;

    let n = n.min(rows.len());

    if R::PRESORTED_BY == Some(canonical) {
        return Ok(rows[..n].to_vec());
    }

    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        let a = a.numeric_field(canonical).unwrap_or(f64::NEG_INFINITY);
        let b = b.numeric_field(canonical).unwrap_or(f64::NEG_INFINITY);
        b.partial_cmp(&a).unwrap_or(Ordering::Equal)
    });
    sorted.truncate(n);
    Ok(sorted)
}
