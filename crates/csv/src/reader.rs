//! CSV parsing into raw tables.

use csv::ReaderBuilder;
use thiserror::Error;
use tracing::debug;

use store_core::limits::MAX_CSV_BYTES;
use store_core::{RawTable, TableKind};

/// Why a CSV payload could not be read at all.
///
/// Cell-level problems are not errors here; cells stay raw text and
/// store-core records per-row issues during normalization.
#[derive(Debug, Error)]
pub enum ReadError {
    /// Payload rejected before parsing to bound memory per load.
    #[error("{table}: payload is {len} bytes, exceeds {limit} byte limit")]
    TooLarge {
        table: TableKind,
        len: usize,
        limit: usize,
    },

    /// Structurally broken CSV (unbalanced quotes, bad UTF-8).
    #[error("{table}: malformed CSV: {source}")]
    Malformed {
        table: TableKind,
        #[source]
        source: csv::Error,
    },
}

/// Parse one CSV payload into a raw table.
///
/// Headers are trimmed; records may be shorter or longer than the
/// header row (GSC exports from some locales pad trailing columns).
pub fn read_table(table: TableKind, bytes: &[u8]) -> Result<RawTable, ReadError> {
    if bytes.len() > MAX_CSV_BYTES {
        return Err(ReadError::TooLarge {
            table,
            len: bytes.len(),
            limit: MAX_CSV_BYTES,
        });
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|source| ReadError::Malformed { table, source })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| ReadError::Malformed { table, source })?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }

    debug!(%table, rows = rows.len(), "parsed csv payload");
    Ok(RawTable::new(headers, rows))
}
