//! Core tables, normalization, and validation for the Searchdeck metrics store.

pub mod error;
pub mod limits;
pub mod normalize;
pub mod schema;
pub mod snapshot;
pub mod tables;

pub use error::{Error, Result};
pub use schema::{IssueKind, RawTable, RowIssue};
pub use snapshot::{MetricsSnapshot, RawTables};
pub use tables::*;
