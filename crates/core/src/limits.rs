//! Size limits for uploaded tables.
//!
//! MEMORY SAFETY: These limits bound the working set of a single load.
//! A Search Console export covers at most 16 months of daily rows and
//! caps each dimension report at 1000 rows, so real inputs sit far
//! below every limit here; hitting one means the upload is not a GSC
//! export.
//!
//! # Usage Note
//!
//! `MAX_CSV_BYTES` is enforced by the CSV reader before parsing;
//! the remaining limits are enforced during normalization.

// === Upload Limits ===

/// Maximum raw CSV payload size per table in bytes (8MB).
///
/// A 16-month daily export is under 30KB; 8MB leaves room for very
/// large query/page reports while keeping memory per load predictable.
pub const MAX_CSV_BYTES: usize = 8 * 1024 * 1024;

/// Maximum rows per table after parsing.
///
/// GSC dimension exports cap at 1000 rows; 100k tolerates stitched
/// exports from third-party tooling.
pub const MAX_TABLE_ROWS: usize = 100_000;

// === Field Limits (chars) ===

/// Query text max length.
/// Search queries are short; 2KB tolerates pathological exports.
pub const MAX_QUERY_LEN: usize = 2048;

/// Page URL max length.
/// Matches the common browser URL limit.
pub const MAX_URL_LEN: usize = 2048;

/// Device / country / search-appearance label max length.
pub const MAX_LABEL_LEN: usize = 256;

// === Metric Bounds ===

/// CTR is a percentage; values outside [0, 100] are malformed.
pub const MAX_CTR: f64 = 100.0;

/// Average position max (GSC reports positions well under 1000).
pub const MAX_POSITION: f64 = 1000.0;
