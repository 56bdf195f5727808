//! Export a loaded table, re-ingest it, and get the same table back.

use csv_io::{
    read_table, write_countries, write_dates, write_devices, write_pages, write_queries,
};
use integration_tests::fixtures;
use store_core::schema::{build_countries, build_dates, build_devices, build_pages, build_queries};
use store_core::{MetricsSnapshot, TableKind};

#[test]
fn dates_survive_an_export_cycle() {
    let snapshot = MetricsSnapshot::load(&fixtures::full_upload()).unwrap();

    let exported = write_dates(&snapshot.dates).unwrap();
    let raw = read_table(TableKind::Dates, exported.as_bytes()).unwrap();
    let (reloaded, issues) = build_dates(&raw).unwrap();

    assert!(issues.is_empty());
    assert_eq!(reloaded, snapshot.dates);
}

#[test]
fn queries_and_pages_survive_an_export_cycle() {
    let snapshot = MetricsSnapshot::load(&fixtures::full_upload()).unwrap();

    let exported = write_queries(&snapshot.queries).unwrap();
    let raw = read_table(TableKind::Queries, exported.as_bytes()).unwrap();
    let (reloaded, issues) = build_queries(&raw).unwrap();
    assert!(issues.is_empty());
    assert_eq!(reloaded, snapshot.queries);

    let exported = write_pages(&snapshot.pages).unwrap();
    let raw = read_table(TableKind::Pages, exported.as_bytes()).unwrap();
    let (reloaded, issues) = build_pages(&raw).unwrap();
    assert!(issues.is_empty());
    assert_eq!(reloaded, snapshot.pages);
}

#[test]
fn devices_with_absent_optional_metrics_round_trip() {
    let snapshot = MetricsSnapshot::load(&fixtures::full_upload()).unwrap();
    assert!(snapshot.devices.iter().all(|d| d.ctr.is_none()));

    let exported = write_devices(&snapshot.devices).unwrap();
    let raw = read_table(TableKind::Devices, exported.as_bytes()).unwrap();
    let (reloaded, issues) = build_devices(&raw).unwrap();

    assert!(issues.is_empty());
    assert_eq!(reloaded, snapshot.devices);
}

#[test]
fn countries_round_trip() {
    let snapshot = MetricsSnapshot::load(&fixtures::full_upload()).unwrap();

    let exported = write_countries(&snapshot.countries).unwrap();
    let raw = read_table(TableKind::Countries, exported.as_bytes()).unwrap();
    let (reloaded, issues) = build_countries(&raw).unwrap();

    assert!(issues.is_empty());
    assert_eq!(reloaded, snapshot.countries);
}

#[test]
fn exported_queries_carry_percent_suffixed_ctr() {
    let snapshot = MetricsSnapshot::load(&fixtures::full_upload()).unwrap();
    let exported = write_queries(&snapshot.queries).unwrap();
    for line in exported.lines().skip(1) {
        assert!(line.contains('%'), "line without CTR suffix: {line}");
    }
}
