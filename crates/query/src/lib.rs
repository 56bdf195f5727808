//! Read-only queries over a loaded metrics snapshot.
//!
//! Every function here is a pure read: it borrows rows, never mutates,
//! and reports failures as store-core errors identifying the offending
//! table, column, or range.

pub mod aggregate;
pub mod correlate;
pub mod filter;
pub mod rank;

pub use aggregate::{totals, Totals};
pub use correlate::{correlation_matrix, CorrelationCell, CorrelationMatrix};
pub use filter::{filter_by_category, filter_by_date_range, Selection};
pub use rank::{top_n, top_n_by};
