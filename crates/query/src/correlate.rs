//! Pearson correlation over the dates table.

use serde::Serialize;

use store_core::error::{Error, Result};
use store_core::tables::{resolve_column, TableRow};
use store_core::{DateRow, TableKind};

/// One entry of the correlation matrix.
///
/// A coefficient involving a zero-variance column is mathematically
/// undefined and reported as such, never as 0 or NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationCell {
    Coefficient(f64),
    Undefined,
}

/// Symmetric Pearson correlation matrix over named numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    /// Canonical column names, in request order.
    pub columns: Vec<String>,
    /// `cells[i][j]` correlates `columns[i]` with `columns[j]`.
    pub cells: Vec<Vec<CorrelationCell>>,
}

impl CorrelationMatrix {
    pub fn get(&self, i: usize, j: usize) -> CorrelationCell {
        self.cells[i][j]
    }
}

/// Compute the Pearson correlation matrix of the given numeric columns
/// over (optionally date-filtered) date rows.
///
/// The diagonal is exactly 1.0. A column name the dates table does not
/// carry as a numeric metric is `UnknownColumn`; zero rows are
/// `EmptyAggregate`.
pub fn correlation_matrix(dates: &[DateRow], columns: &[&str]) -> Result<CorrelationMatrix> {
    if dates.is_empty() {
        return Err(Error::empty_aggregate("dates table"));
    }

    let mut names = Vec::with_capacity(columns.len());
    let mut series = Vec::with_capacity(columns.len());
    for column in columns {
        let canonical = resolve_column::<DateRow>(column)
            .ok_or_else(|| Error::unknown_column(TableKind::Dates, *column))?;
        let values: Option<Vec<f64>> =
            dates.iter().map(|r| r.numeric_field(canonical)).collect();
        // A resolvable but non-numeric column ("date") lands here too.
        let values = values.ok_or_else(|| Error::unknown_column(TableKind::Dates, *column))?;
        names.push(canonical.to_string());
        series.push(Deviations::of(&values));
    }

    let n = series.len();
    let mut cells = vec![vec![CorrelationCell::Undefined; n]; n];
    for i in 0..n {
        for j in 0..n {
            cells[i][j] = if i == j {
                CorrelationCell::Coefficient(1.0)
            } else {
                series[i].pearson(&series[j])
            };
        }
    }

    Ok(CorrelationMatrix {
        columns: names,
        cells,
    })
}

/// A column's deviations from its mean, with the squared sum cached.
struct Deviations {
    deltas: Vec<f64>,
    sum_sq: f64,
}

impl Deviations {
    fn of(values: &[f64]) -> Self {
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let deltas: Vec<f64> = values.iter().map(|v| v - mean).collect();
        let sum_sq = deltas.iter().map(|d| d * d).sum();
        Self { deltas, sum_sq }
    }

    fn pearson(&self, other: &Self) -> CorrelationCell {
        if self.sum_sq == 0.0 || other.sum_sq == 0.0 {
            return CorrelationCell::Undefined;
        }
        let covariance: f64 = self
            .deltas
            .iter()
            .zip(&other.deltas)
            .map(|(a, b)| a * b)
            .sum();
        let r = covariance / (self.sum_sq * other.sum_sq).sqrt();
        // Floating error can push a perfect correlation past ±1.
        CorrelationCell::Coefficient(r.clamp(-1.0, 1.0))
    }
}
