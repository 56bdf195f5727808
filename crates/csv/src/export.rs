//! Re-serialization of normalized tables to CSV.
//!
//! This is the presentation collaborator's download surface. Output
//! uses the canonical export headers and renders CTR with the `%`
//! suffix, so exporting a loaded table and re-ingesting it reproduces
//! an equal table.

use csv::Writer;
use thiserror::Error;

use store_core::{AppearanceRow, CountryRow, DateRow, DeviceRow, PageRow, QueryRow};

/// A CSV serialization failure.
#[derive(Debug, Error)]
#[error("csv export failed: {source}")]
pub struct ExportError {
    #[from]
    source: csv::Error,
}

fn fmt_ctr(ctr: f64) -> String {
    format!("{ctr}%")
}

fn fmt_opt_ctr(ctr: Option<f64>) -> String {
    ctr.map(fmt_ctr).unwrap_or_default()
}

fn fmt_opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String, ExportError> {
    // into_inner flushes; flushing into a Vec cannot fail
    let bytes = writer.into_inner().map_err(|e| {
        let io = std::io::Error::new(e.error().kind(), e.error().to_string());
        ExportError::from(csv::Error::from(io))
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Serialize the dates table.
pub fn write_dates(rows: &[DateRow]) -> Result<String, ExportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(["Date", "Clicks", "Impressions", "CTR", "Position"])?;
    for row in rows {
        writer.write_record([
            row.date.format("%Y-%m-%d").to_string(),
            row.clicks.to_string(),
            row.impressions.to_string(),
            fmt_ctr(row.ctr),
            row.position.to_string(),
        ])?;
    }
    finish(writer)
}

/// Serialize the queries table.
pub fn write_queries(rows: &[QueryRow]) -> Result<String, ExportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(["Top queries", "Clicks", "Impressions", "CTR", "Position"])?;
    for row in rows {
        writer.write_record([
            row.query.clone(),
            row.clicks.to_string(),
            row.impressions.to_string(),
            fmt_ctr(row.ctr),
            row.position.to_string(),
        ])?;
    }
    finish(writer)
}

/// Serialize the pages table.
pub fn write_pages(rows: &[PageRow]) -> Result<String, ExportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(["Top pages", "Clicks", "Impressions", "CTR", "Position"])?;
    for row in rows {
        writer.write_record([
            row.page.clone(),
            row.clicks.to_string(),
            row.impressions.to_string(),
            fmt_ctr(row.ctr),
            row.position.to_string(),
        ])?;
    }
    finish(writer)
}

/// Serialize the devices table. Optional metrics render as empty cells.
pub fn write_devices(rows: &[DeviceRow]) -> Result<String, ExportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(["Device", "Clicks", "Impressions", "CTR", "Position"])?;
    for row in rows {
        writer.write_record([
            row.device.clone(),
            row.clicks.to_string(),
            row.impressions.to_string(),
            fmt_opt_ctr(row.ctr),
            fmt_opt(row.position),
        ])?;
    }
    finish(writer)
}

/// Serialize the countries table. Optional metrics render as empty cells.
pub fn write_countries(rows: &[CountryRow]) -> Result<String, ExportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(["Country", "Clicks", "Impressions", "CTR", "Position"])?;
    for row in rows {
        writer.write_record([
            row.country.clone(),
            fmt_opt(row.clicks),
            row.impressions.to_string(),
            fmt_opt_ctr(row.ctr),
            fmt_opt(row.position),
        ])?;
    }
    finish(writer)
}

/// Serialize the search-appearance table.
pub fn write_search_appearance(rows: &[AppearanceRow]) -> Result<String, ExportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(["Search Appearance", "Clicks", "Impressions", "CTR", "Position"])?;
    for row in rows {
        writer.write_record([
            row.appearance.clone(),
            row.clicks.to_string(),
            row.impressions.to_string(),
            fmt_ctr(row.ctr),
            row.position.to_string(),
        ])?;
    }
    finish(writer)
}
