//! Table and row type definitions for the metrics store.
//!
//! One row type per Search Console export table. Field limits are
//! duplicated in `#[validate]` attributes because the derive macro
//! requires literal values; keep them in sync with `limits.rs`.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// The tables a Search Console export consists of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Dates,
    Queries,
    Pages,
    Devices,
    Countries,
    SearchAppearance,
}

impl TableKind {
    /// Tables that must all be present for a load to produce a snapshot.
    ///
    /// Search appearance is optional; some exports omit it.
    pub const REQUIRED: [TableKind; 5] = [
        TableKind::Dates,
        TableKind::Queries,
        TableKind::Pages,
        TableKind::Devices,
        TableKind::Countries,
    ];

    /// Lowercase name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dates => "dates",
            Self::Queries => "queries",
            Self::Pages => "pages",
            Self::Devices => "devices",
            Self::Countries => "countries",
            Self::SearchAppearance => "search_appearance",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One day of site-wide performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DateRow {
    pub date: NaiveDate,
    pub clicks: u64,
    pub impressions: u64,
    /// Percentage in [0, 100], never a `%`-suffixed string.
    #[validate(range(min = 0.0, max = 100.0))]
    pub ctr: f64,
    /// Average ranking position (1.0 = top result).
    #[validate(range(min = 0.0, max = 1000.0))]
    pub position: f64,
}

/// Performance of a single search query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct QueryRow {
    #[validate(length(min = 1, max = 2048))]
    pub query: String,
    pub clicks: u64,
    pub impressions: u64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub ctr: f64,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub position: f64,
}

/// Performance of a single page URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PageRow {
    #[validate(length(min = 1, max = 2048))]
    pub page: String,
    pub clicks: u64,
    pub impressions: u64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub ctr: f64,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub position: f64,
}

/// Performance per device class (Desktop / Mobile / Tablet).
///
/// CTR and position columns are optional in device exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DeviceRow {
    #[validate(length(min = 1, max = 256))]
    pub device: String,
    pub clicks: u64,
    pub impressions: u64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub ctr: Option<f64>,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub position: Option<f64>,
}

/// Performance per country.
///
/// Some country exports carry impressions only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CountryRow {
    #[validate(length(min = 1, max = 256))]
    pub country: String,
    pub clicks: Option<u64>,
    pub impressions: u64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub ctr: Option<f64>,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub position: Option<f64>,
}

/// Performance per search appearance type (rich results etc.).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AppearanceRow {
    #[validate(length(min = 1, max = 256))]
    pub appearance: String,
    pub clicks: u64,
    pub impressions: u64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub ctr: f64,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub position: f64,
}

/// Named field access over table rows.
///
/// This is the seam the query layer works through: columns are
/// addressed by canonical lowercase name, text fields drive category
/// filtering, numeric fields drive sorting and correlation. Exports
/// arrive pre-sorted by `PRESORTED_BY`; top-N in that order must not
/// re-sort.
pub trait TableRow: Clone {
    /// Table this row type belongs to, for diagnostics.
    const TABLE: TableKind;

    /// Column the source export is pre-sorted by, if any.
    const PRESORTED_BY: Option<&'static str>;

    /// Canonical column names of this table, in export order.
    fn columns() -> &'static [&'static str];

    /// Text value of a categorical column, if `column` names one.
    fn text_field(&self, column: &str) -> Option<&str>;

    /// Numeric value of a metric column, if `column` names one and the
    /// row carries it.
    fn numeric_field(&self, column: &str) -> Option<f64>;
}

/// Resolve a caller-supplied column name against a table's canonical
/// columns. Matching is case-insensitive on the trimmed name.
pub fn resolve_column<R: TableRow>(column: &str) -> Option<&'static str> {
    let wanted = column.trim();
    R::columns()
        .iter()
        .find(|c| c.eq_ignore_ascii_case(wanted))
        .copied()
}

impl TableRow for DateRow {
    const TABLE: TableKind = TableKind::Dates;
    const PRESORTED_BY: Option<&'static str> = None;

    fn columns() -> &'static [&'static str] {
        &["date", "clicks", "impressions", "ctr", "position"]
    }

    fn text_field(&self, _column: &str) -> Option<&str> {
        None
    }

    fn numeric_field(&self, column: &str) -> Option<f64> {
        match column {
            "clicks" => Some(self.clicks as f64),
            "impressions" => Some(self.impressions as f64),
            "ctr" => Some(self.ctr),
            "position" => Some(self.position),
            _ => None,
        }
    }
}

impl TableRow for QueryRow {
    const TABLE: TableKind = TableKind::Queries;
    const PRESORTED_BY: Option<&'static str> = Some("clicks");

    fn columns() -> &'static [&'static str] {
        &["query", "clicks", "impressions", "ctr", "position"]
    }

    fn text_field(&self, column: &str) -> Option<&str> {
        (column == "query").then_some(self.query.as_str())
    }

    fn numeric_field(&self, column: &str) -> Option<f64> {
        match column {
            "clicks" => Some(self.clicks as f64),
            "impressions" => Some(self.impressions as f64),
            "ctr" => Some(self.ctr),
            "position" => Some(self.position),
            _ => None,
        }
    }
}

impl TableRow for PageRow {
    const TABLE: TableKind = TableKind::Pages;
    const PRESORTED_BY: Option<&'static str> = Some("clicks");

    fn columns() -> &'static [&'static str] {
        &["page", "clicks", "impressions", "ctr", "position"]
    }

    fn text_field(&self, column: &str) -> Option<&str> {
        (column == "page").then_some(self.page.as_str())
    }

    fn numeric_field(&self, column: &str) -> Option<f64> {
        match column {
            "clicks" => Some(self.clicks as f64),
            "impressions" => Some(self.impressions as f64),
            "ctr" => Some(self.ctr),
            "position" => Some(self.position),
            _ => None,
        }
    }
}

impl TableRow for DeviceRow {
    const TABLE: TableKind = TableKind::Devices;
    const PRESORTED_BY: Option<&'static str> = Some("clicks");

    fn columns() -> &'static [&'static str] {
        &["device", "clicks", "impressions", "ctr", "position"]
    }

    fn text_field(&self, column: &str) -> Option<&str> {
        (column == "device").then_some(self.device.as_str())
    }

    fn numeric_field(&self, column: &str) -> Option<f64> {
        match column {
            "clicks" => Some(self.clicks as f64),
            "impressions" => Some(self.impressions as f64),
            "ctr" => self.ctr,
            "position" => self.position,
            _ => None,
        }
    }
}

impl TableRow for CountryRow {
    const TABLE: TableKind = TableKind::Countries;
    const PRESORTED_BY: Option<&'static str> = Some("clicks");

    fn columns() -> &'static [&'static str] {
        &["country", "clicks", "impressions", "ctr", "position"]
    }

    fn text_field(&self, column: &str) -> Option<&str> {
        (column == "country").then_some(self.country.as_str())
    }

    fn numeric_field(&self, column: &str) -> Option<f64> {
        match column {
            "clicks" => self.clicks.map(|c| c as f64),
            "impressions" => Some(self.impressions as f64),
            "ctr" => self.ctr,
            "position" => self.position,
            _ => None,
        }
    }
}

impl TableRow for AppearanceRow {
    const TABLE: TableKind = TableKind::SearchAppearance;
    const PRESORTED_BY: Option<&'static str> = Some("clicks");

    fn columns() -> &'static [&'static str] {
        &["appearance", "clicks", "impressions", "ctr", "position"]
    }

    fn text_field(&self, column: &str) -> Option<&str> {
        (column == "appearance").then_some(self.appearance.as_str())
    }

    fn numeric_field(&self, column: &str) -> Option<f64> {
        match column {
            "clicks" => Some(self.clicks as f64),
            "impressions" => Some(self.impressions as f64),
            "ctr" => Some(self.ctr),
            "position" => Some(self.position),
            _ => None,
        }
    }
}
