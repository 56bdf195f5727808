//! Unified error types for the metrics store.
//!
//! Diagnostic codes follow the store convention:
//! - LOAD_001-005: Ingestion errors
//! - QUERY_001-003: Query errors
//!
//! Every error is a recoverable value identifying the offending table,
//! row, or column; nothing unwinds across the store boundary.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::tables::TableKind;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the metrics store.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum Error {
    /// LOAD_001: One or more required tables were not supplied.
    ///
    /// `missing` enumerates every absent table, not just the first.
    #[error("awaiting input: missing required tables {missing:?}")]
    MissingInput { missing: Vec<TableKind> },

    /// LOAD_002: A CTR cell could not be parsed as a percentage.
    #[error("{table} row {row}: malformed CTR value {value:?}")]
    MalformedCtr {
        table: TableKind,
        row: usize,
        value: String,
    },

    /// LOAD_003: A date cell could not be parsed as a calendar date.
    #[error("{table} row {row}: malformed date {value:?}")]
    MalformedDate {
        table: TableKind,
        row: usize,
        value: String,
    },

    /// LOAD_004: A required column is absent from a table's header.
    #[error("{table}: missing required column {column:?}")]
    MissingColumn {
        table: TableKind,
        column: &'static str,
    },

    /// LOAD_005: A table exceeds the configured row or byte limits.
    #[error("{table}: {detail}")]
    TableTooLarge { table: TableKind, detail: String },

    /// QUERY_001: A date range with `from` after `to`.
    #[error("invalid date range: {from} is after {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    /// QUERY_002: A column name that does not exist on the target table.
    #[error("{table} has no column named {column:?}")]
    UnknownColumn { table: TableKind, column: String },

    /// QUERY_003: An aggregate (mean) over zero rows.
    #[error("cannot aggregate over empty {what}")]
    EmptyAggregate { what: &'static str },
}

impl Error {
    /// Create a missing-input error from the absent tables.
    pub fn missing_input(missing: Vec<TableKind>) -> Self {
        Self::MissingInput { missing }
    }

    /// Create a malformed-CTR error for a table row.
    pub fn malformed_ctr(table: TableKind, row: usize, value: impl Into<String>) -> Self {
        Self::MalformedCtr {
            table,
            row,
            value: value.into(),
        }
    }

    /// Create a malformed-date error for a table row.
    pub fn malformed_date(table: TableKind, row: usize, value: impl Into<String>) -> Self {
        Self::MalformedDate {
            table,
            row,
            value: value.into(),
        }
    }

    pub fn missing_column(table: TableKind, column: &'static str) -> Self {
        Self::MissingColumn { table, column }
    }

    pub fn table_too_large(table: TableKind, detail: impl Into<String>) -> Self {
        Self::TableTooLarge {
            table,
            detail: detail.into(),
        }
    }

    pub fn invalid_range(from: NaiveDate, to: NaiveDate) -> Self {
        Self::InvalidRange { from, to }
    }

    pub fn unknown_column(table: TableKind, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            table,
            column: column.into(),
        }
    }

    pub fn empty_aggregate(what: &'static str) -> Self {
        Self::EmptyAggregate { what }
    }

    /// Get the diagnostic code string for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingInput { .. } => "LOAD_001",
            Self::MalformedCtr { .. } => "LOAD_002",
            Self::MalformedDate { .. } => "LOAD_003",
            Self::MissingColumn { .. } => "LOAD_004",
            Self::TableTooLarge { .. } => "LOAD_005",
            Self::InvalidRange { .. } => "QUERY_001",
            Self::UnknownColumn { .. } => "QUERY_002",
            Self::EmptyAggregate { .. } => "QUERY_003",
        }
    }

    /// Whether this error arose during ingestion (as opposed to a query).
    pub fn is_load_error(&self) -> bool {
        self.code().starts_with("LOAD_")
    }
}
