//! Site-wide KPI aggregation over the dates table.

use serde::Serialize;

use store_core::error::{Error, Result};
use store_core::DateRow;

/// The four headline KPIs of a performance report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub total_clicks: u64,
    pub total_impressions: u64,
    /// Arithmetic mean of daily CTR percentages.
    pub average_ctr: f64,
    /// Arithmetic mean of daily average positions.
    pub average_position: f64,
}

/// Compute the headline totals over (optionally pre-filtered) date rows.
///
/// The mean of zero rows is undefined, so an empty input is
/// `EmptyAggregate` rather than NaN or a silent zero.
pub fn totals(dates: &[DateRow]) -> Result<Totals> {
    if dates.is_empty() {
        return Err(Error::empty_aggregate("dates table"));
    }

    let count = dates.len() as f64;
    let total_clicks = dates.iter().map(|r| r.clicks).sum();
    let total_impressions = dates.iter().map(|r| r.impressions).sum();
    let average_ctr = dates.iter().map(|r| r.ctr).sum::<f64>() / count;
    let average_position = dates.iter().map(|r| r.position).sum::<f64>() / count;

    Ok(Totals {
        total_clicks,
        total_impressions,
        average_ctr,
        average_position,
    })
}
