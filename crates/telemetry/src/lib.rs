//! Internal telemetry for the Searchdeck metrics store.
//!
//! Structured logging via `tracing` plus a small set of in-process
//! counters; there is no external metrics system to ship to.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::*;
pub use tracing_setup::*;
