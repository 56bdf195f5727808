//! CSV I/O for the Searchdeck metrics store.
//!
//! Reading produces raw tables only; normalization and validation are
//! store-core's job. Export re-serializes normalized tables for the
//! presentation layer's download buttons.

pub mod export;
pub mod reader;

pub use export::*;
pub use reader::*;
