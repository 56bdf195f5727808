//! Snapshot assembly: one load event, one immutable value.
//!
//! All required tables load as a unit. If any are absent the load
//! yields `MissingInput` naming every one of them and no snapshot
//! exists; there is no partially-loaded state.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::schema::{
    build_countries, build_dates, build_devices, build_pages, build_queries,
    build_search_appearance, RawTable, RowIssue,
};
use crate::tables::{AppearanceRow, CountryRow, DateRow, DeviceRow, PageRow, QueryRow, TableKind};

/// The raw tables of one upload, before normalization.
///
/// Absent tables stay `None`; `MetricsSnapshot::load` decides whether
/// that is acceptable (search appearance) or fails the load.
#[derive(Debug, Clone, Default)]
pub struct RawTables {
    pub dates: Option<RawTable>,
    pub queries: Option<RawTable>,
    pub pages: Option<RawTable>,
    pub devices: Option<RawTable>,
    pub countries: Option<RawTable>,
    pub search_appearance: Option<RawTable>,
}

impl RawTables {
    /// Tables from the required set that were not supplied.
    pub fn missing_required(&self) -> Vec<TableKind> {
        TableKind::REQUIRED
            .iter()
            .copied()
            .filter(|kind| self.get(*kind).is_none())
            .collect()
    }

    fn get(&self, kind: TableKind) -> Option<&RawTable> {
        match kind {
            TableKind::Dates => self.dates.as_ref(),
            TableKind::Queries => self.queries.as_ref(),
            TableKind::Pages => self.pages.as_ref(),
            TableKind::Devices => self.devices.as_ref(),
            TableKind::Countries => self.countries.as_ref(),
            TableKind::SearchAppearance => self.search_appearance.as_ref(),
        }
    }

    /// Deterministic fingerprint of the raw input content.
    ///
    /// Identical uploads hash identically, which is what keys the
    /// snapshot cache; any changed cell changes the fingerprint.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for kind in [
            TableKind::Dates,
            TableKind::Queries,
            TableKind::Pages,
            TableKind::Devices,
            TableKind::Countries,
            TableKind::SearchAppearance,
        ] {
            match self.get(kind) {
                Some(table) => {
                    kind.as_str().hash(&mut hasher);
                    table.headers.hash(&mut hasher);
                    table.rows.hash(&mut hasher);
                }
                None => {
                    0u8.hash(&mut hasher);
                }
            }
        }
        hasher.finish()
    }
}

/// An immutable, normalized view of one upload.
///
/// Queries over a snapshot are pure reads; a re-upload produces a new
/// snapshot and the old one is simply dropped.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub dates: Vec<DateRow>,
    pub queries: Vec<QueryRow>,
    pub pages: Vec<PageRow>,
    pub devices: Vec<DeviceRow>,
    pub countries: Vec<CountryRow>,
    pub search_appearance: Option<Vec<AppearanceRow>>,
    /// Every row-level rejection and flag recorded during assembly.
    pub issues: Vec<RowIssue>,
    pub loaded_at: DateTime<Utc>,
    pub fingerprint: u64,
}

impl MetricsSnapshot {
    /// Normalize one upload into a snapshot.
    ///
    /// Fails with `MissingInput` (no snapshot, no partial view) when
    /// any required table is absent, and with the table-level LOAD
    /// errors from schema assembly. Row-level problems never fail the
    /// load; they are recorded in `issues`.
    pub fn load(raw: &RawTables) -> Result<Self> {
        let (Some(raw_dates), Some(raw_queries), Some(raw_pages), Some(raw_devices), Some(raw_countries)) = (
            raw.dates.as_ref(),
            raw.queries.as_ref(),
            raw.pages.as_ref(),
            raw.devices.as_ref(),
            raw.countries.as_ref(),
        ) else {
            let missing = raw.missing_required();
            debug!(?missing, "load refused, required tables absent");
            return Err(Error::missing_input(missing));
        };

        let fingerprint = raw.fingerprint();
        let mut issues = Vec::new();

        let (dates, mut table_issues) = build_dates(raw_dates)?;
        issues.append(&mut table_issues);
        let (queries, mut table_issues) = build_queries(raw_queries)?;
        issues.append(&mut table_issues);
        let (pages, mut table_issues) = build_pages(raw_pages)?;
        issues.append(&mut table_issues);
        let (devices, mut table_issues) = build_devices(raw_devices)?;
        issues.append(&mut table_issues);
        let (countries, mut table_issues) = build_countries(raw_countries)?;
        issues.append(&mut table_issues);

        let search_appearance = match raw.search_appearance.as_ref() {
            Some(table) => {
                let (rows, mut table_issues) = build_search_appearance(table)?;
                issues.append(&mut table_issues);
                Some(rows)
            }
            None => None,
        };

        let snapshot = Self {
            dates,
            queries,
            pages,
            devices,
            countries,
            search_appearance,
            issues,
            loaded_at: Utc::now(),
            fingerprint,
        };

        info!(
            fingerprint,
            dates = snapshot.dates.len(),
            queries = snapshot.queries.len(),
            pages = snapshot.pages.len(),
            devices = snapshot.devices.len(),
            countries = snapshot.countries.len(),
            issues = snapshot.issues.len(),
            "snapshot loaded"
        );

        Ok(snapshot)
    }

    /// Number of rows dropped during assembly.
    pub fn dropped_rows(&self) -> usize {
        self.issues.iter().filter(|i| i.dropped).count()
    }

    /// Issues recorded for one table.
    pub fn issues_for(&self, table: TableKind) -> impl Iterator<Item = &RowIssue> {
        self.issues.iter().filter(move |i| i.table == table)
    }
}
