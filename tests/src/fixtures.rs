//! Test fixtures: canned Search Console export CSVs.
//!
//! The numbers are chosen so aggregate expectations are exact in
//! floating point (clicks sum to 60, CTR is a flat 10%).

use csv_io::read_table;
use store_core::{RawTables, TableKind};

/// A well-formed Dates.csv covering four days.
pub fn dates_csv() -> String {
    "\
Date,Clicks,Impressions,CTR,Position
2023-03-01,10,100,10.0%,5.0
2023-03-02,20,200,10.0%,3.0
2023-03-03,25,250,10.0%,4.0
2023-03-04,5,50,10.0%,8.0
"
    .to_string()
}

/// A well-formed Queries.csv, pre-sorted by descending clicks.
pub fn queries_csv() -> String {
    "\
Top queries,Clicks,Impressions,CTR,Position
seo dashboard,30,300,10.0%,1.5
search console export,15,150,10.0%,2.5
gsc csv,10,100,10.0%,4.0
rust metrics,4,40,10.0%,6.0
clickthrough rate,1,10,10.0%,9.0
"
    .to_string()
}

/// A well-formed Pages.csv, pre-sorted by descending clicks.
pub fn pages_csv() -> String {
    "\
Top pages,Clicks,Impressions,CTR,Position
https://example.com/,25,250,10.0%,2.0
https://example.com/blog,20,200,10.0%,3.0
https://example.com/docs,15,150,10.0%,5.0
"
    .to_string()
}

/// A Devices.csv without the optional CTR/Position columns.
pub fn devices_csv() -> String {
    "\
Device,Clicks,Impressions
Desktop,35,350
Mobile,20,200
Tablet,5,50
"
    .to_string()
}

/// A Countries.csv carrying the full metric set.
pub fn countries_csv() -> String {
    "\
Country,Clicks,Impressions,CTR,Position
United States,30,300,10.0%,3.0
Germany,20,200,10.0%,4.0
Japan,10,100,10.0%,5.0
"
    .to_string()
}

/// An optional Search appearance.csv.
pub fn search_appearance_csv() -> String {
    "\
Search Appearance,Clicks,Impressions,CTR,Position
Rich results,40,400,10.0%,2.0
Videos,20,200,10.0%,4.0
"
    .to_string()
}

/// Parse one fixture CSV into a raw table.
pub fn raw(kind: TableKind, csv: &str) -> store_core::RawTable {
    read_table(kind, csv.as_bytes()).expect("fixture CSV must parse")
}

/// A complete upload of the five required tables.
pub fn full_upload() -> RawTables {
    RawTables {
        dates: Some(raw(TableKind::Dates, &dates_csv())),
        queries: Some(raw(TableKind::Queries, &queries_csv())),
        pages: Some(raw(TableKind::Pages, &pages_csv())),
        devices: Some(raw(TableKind::Devices, &devices_csv())),
        countries: Some(raw(TableKind::Countries, &countries_csv())),
        search_appearance: None,
    }
}

/// A complete upload including the optional search-appearance table.
pub fn full_upload_with_appearance() -> RawTables {
    let mut upload = full_upload();
    upload.search_appearance = Some(raw(
        TableKind::SearchAppearance,
        &search_appearance_csv(),
    ));
    upload
}
